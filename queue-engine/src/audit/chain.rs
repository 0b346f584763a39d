//! SHA-256 hash chain
//!
//! Each row hashes its predecessor's hash plus every stored field. Strings
//! are `\x00`-terminated, integers are little-endian, optional fields carry
//! a tag byte so `None` and `Some("")` differ.

use sha2::{Digest, Sha256};
use shared::models::{AssignmentLog, QueueLog};

use super::types::{AuditChainBreak, AuditChainVerification, AuditLogKind, ChainBreakKind};

/// `prev_hash` of the first row of every chain
pub const GENESIS_HASH: &str = "genesis";

/// A row that takes part in a hash chain
pub trait ChainedRecord {
    fn sequence(&self) -> i64;
    fn prev_hash(&self) -> &str;
    fn curr_hash(&self) -> &str;
    /// Hash recomputed from the stored fields
    fn compute_hash(&self) -> String;
}

impl ChainedRecord for QueueLog {
    fn sequence(&self) -> i64 {
        self.sequence
    }

    fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    fn curr_hash(&self) -> &str {
        &self.curr_hash
    }

    fn compute_hash(&self) -> String {
        queue_log_hash(self)
    }
}

impl ChainedRecord for AssignmentLog {
    fn sequence(&self) -> i64 {
        self.sequence
    }

    fn prev_hash(&self) -> &str {
        &self.prev_hash
    }

    fn curr_hash(&self) -> &str {
        &self.curr_hash
    }

    fn compute_hash(&self) -> String {
        assignment_log_hash(self)
    }
}

pub fn queue_log_hash(log: &QueueLog) -> String {
    let mut hasher = Sha256::new();

    hasher.update(log.prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(log.sequence.to_le_bytes());
    hasher.update(log.queue_entry_id.to_le_bytes());
    hasher.update(log.created_at.to_le_bytes());

    hasher.update(log.action.as_str().as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, log.old_status.map(|s| s.as_str()));
    hasher.update(log.new_status.as_str().as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, log.remarks.as_deref());
    hash_optional_int(&mut hasher, log.performed_by);

    format!("{:x}", hasher.finalize())
}

pub fn assignment_log_hash(log: &AssignmentLog) -> String {
    let mut hasher = Sha256::new();

    hasher.update(log.prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(log.sequence.to_le_bytes());
    hasher.update(log.schedule_id.to_le_bytes());
    hasher.update(log.station_id.to_le_bytes());
    hasher.update(log.employee_id.to_le_bytes());
    hasher.update(log.created_at.to_le_bytes());

    hasher.update(log.action.as_str().as_bytes());
    hasher.update(b"\x00");

    hasher.update(log.details.as_bytes());
    hasher.update(b"\x00");

    hash_optional_int(&mut hasher, log.performed_by);

    format!("{:x}", hasher.finalize())
}

fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

fn hash_optional_int(hasher: &mut Sha256, value: Option<i64>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.to_le_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

/// Walk a chain in sequence order and collect every break
pub fn verify_records<R: ChainedRecord>(log: AuditLogKind, records: &[R]) -> AuditChainVerification {
    let mut breaks = Vec::new();
    let mut expected_prev = GENESIS_HASH.to_string();
    let mut expected_sequence = 1;

    for record in records {
        if record.sequence() != expected_sequence {
            breaks.push(AuditChainBreak {
                sequence: record.sequence(),
                kind: ChainBreakKind::SequenceGap,
                expected: expected_sequence.to_string(),
                actual: record.sequence().to_string(),
            });
        }
        if record.prev_hash() != expected_prev {
            breaks.push(AuditChainBreak {
                sequence: record.sequence(),
                kind: ChainBreakKind::PrevHashMismatch,
                expected: expected_prev.clone(),
                actual: record.prev_hash().to_string(),
            });
        }
        let recomputed = record.compute_hash();
        if recomputed != record.curr_hash() {
            breaks.push(AuditChainBreak {
                sequence: record.sequence(),
                kind: ChainBreakKind::HashMismatch,
                expected: recomputed,
                actual: record.curr_hash().to_string(),
            });
        }

        expected_prev = record.curr_hash().to_string();
        expected_sequence = record.sequence() + 1;
    }

    AuditChainVerification {
        log,
        total_entries: records.len() as u64,
        chain_intact: breaks.is_empty(),
        breaks,
    }
}
