pub mod admin;
pub mod booking;
pub mod changes;
pub mod health;
pub mod slot;
pub mod sport;
pub mod venue;
