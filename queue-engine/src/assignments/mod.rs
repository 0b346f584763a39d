//! Employee ↔ station assignment scheduling

pub mod range;
pub mod scheduler;

pub use range::{DateRange, ShiftWindow};
pub use scheduler::AssignmentScheduler;
