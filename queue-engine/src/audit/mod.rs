//! Audit trails
//!
//! Two append-only, SHA-256 hash-chained logs:
//!
//! - `queue_log` - every queue entry transition
//! - `assignment_log` - every assignment schedule change
//!
//! Appends are best-effort: a failed append is reported as an integrity
//! error and the primary transition still commits. The periodic integrity
//! check surfaces the resulting gaps.

pub mod chain;
pub mod scheduler;
pub mod service;
pub mod storage;
pub mod types;

pub use scheduler::AuditIntegrityScheduler;
pub use service::AuditService;
pub use types::{
    AssignmentLogInput, AuditChainBreak, AuditChainVerification, AuditIntegrityReport, AuditLogKind,
    ChainBreakKind, QueueLogInput,
};
