pub mod booking_writer;
pub mod defaults;
pub mod pricing;
pub mod reconciler;
pub mod slot_generator;
