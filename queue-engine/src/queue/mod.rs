//! Patient queue
//!
//! - [`code`] - slot mapping and `DDMMYY-SLOT-SEQ` codes
//! - [`machine`] - status transitions
//! - [`service`] - [`QueueService`], the transactional operations

pub mod code;
pub mod machine;
pub mod service;

pub use code::TimeSlot;
pub use machine::QueueTransition;
pub use service::QueueService;
