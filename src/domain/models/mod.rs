pub mod auth;
pub mod booking;
pub mod change;
pub mod pricing;
pub mod profile;
pub mod slot;
pub mod timing;
pub mod venue;
