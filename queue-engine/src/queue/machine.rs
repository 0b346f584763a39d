//! Queue entry transitions
//!
//! ```text
//! waiting ──check-in──▶ arrived ──call-next──▶ in_progress ──▶ done | skipped | no_show
//!    │                     │                        │
//!    ├─────────────────────┴──▶ cancelled ◀─────────┤
//!    └──────────────────────▶ no_show ◀─────────────┘
//! no_show ──reinstate──▶ waiting
//! ```

use shared::models::{QueueAction, QueueStatus};

/// Operation that moves an entry between statuses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueTransition {
    CheckIn,
    CallNext,
    Complete,
    Skip,
    NoShow,
    Cancel,
    Reinstate,
}

impl QueueTransition {
    pub const ALL: [QueueTransition; 7] = [
        QueueTransition::CheckIn,
        QueueTransition::CallNext,
        QueueTransition::Complete,
        QueueTransition::Skip,
        QueueTransition::NoShow,
        QueueTransition::Cancel,
        QueueTransition::Reinstate,
    ];

    /// Statuses this transition may start from
    pub fn allowed_from(&self) -> &'static [QueueStatus] {
        use QueueStatus::*;
        match self {
            Self::CheckIn => &[Waiting],
            Self::CallNext => &[Waiting, Arrived],
            Self::Complete | Self::Skip => &[InProgress],
            Self::NoShow => &[Waiting, InProgress],
            Self::Cancel => &[Waiting, Arrived, InProgress],
            Self::Reinstate => &[NoShow],
        }
    }

    pub fn target(&self) -> QueueStatus {
        match self {
            Self::CheckIn => QueueStatus::Arrived,
            Self::CallNext => QueueStatus::InProgress,
            Self::Complete => QueueStatus::Done,
            Self::Skip => QueueStatus::Skipped,
            Self::NoShow => QueueStatus::NoShow,
            Self::Cancel => QueueStatus::Cancelled,
            Self::Reinstate => QueueStatus::Waiting,
        }
    }

    /// Log action recorded for this transition
    pub fn action(&self) -> QueueAction {
        match self {
            Self::Cancel => QueueAction::Cancelled,
            Self::Reinstate => QueueAction::Reinstated,
            Self::Skip => QueueAction::Skipped,
            _ => QueueAction::StatusChanged,
        }
    }

    /// Verb used in error messages ("cannot check in")
    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckIn => "check in",
            Self::CallNext => "call",
            Self::Complete => "complete",
            Self::Skip => "skip",
            Self::NoShow => "mark no-show",
            Self::Cancel => "cancel",
            Self::Reinstate => "reinstate",
        }
    }

    pub fn permits(&self, current: QueueStatus) -> bool {
        self.allowed_from().contains(&current)
    }

    /// Whether the entry leaves the active queue
    pub fn completes(&self) -> bool {
        self.target().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_graph_edges() {
        for transition in QueueTransition::ALL {
            for from in transition.allowed_from() {
                assert!(
                    from.can_transition_to(transition.target()),
                    "{:?} from {} is not an edge",
                    transition,
                    from
                );
            }
        }
    }

    #[test]
    fn test_every_edge_has_a_transition() {
        for from in QueueStatus::ALL {
            for to in QueueStatus::ALL {
                if from.can_transition_to(to) {
                    assert!(
                        QueueTransition::ALL
                            .iter()
                            .any(|t| t.target() == to && t.permits(from)),
                        "edge {} -> {} has no operation",
                        from,
                        to
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_shortcut_to_done() {
        assert!(!QueueTransition::Complete.permits(QueueStatus::Waiting));
        assert!(!QueueTransition::Complete.permits(QueueStatus::Arrived));
        assert!(QueueTransition::Cancel.permits(QueueStatus::Arrived));
        assert!(!QueueTransition::Cancel.permits(QueueStatus::Done));
        assert!(!QueueTransition::Reinstate.permits(QueueStatus::Cancelled));
    }

    #[test]
    fn test_checked_in_patient_is_not_a_no_show() {
        assert!(QueueTransition::NoShow.permits(QueueStatus::Waiting));
        assert!(QueueTransition::NoShow.permits(QueueStatus::InProgress));
        assert!(!QueueTransition::NoShow.permits(QueueStatus::Arrived));
        assert!(!QueueStatus::Arrived.can_transition_to(QueueStatus::NoShow));
    }

    #[test]
    fn test_log_actions() {
        assert_eq!(QueueTransition::Cancel.action(), QueueAction::Cancelled);
        assert_eq!(QueueTransition::Reinstate.action(), QueueAction::Reinstated);
        assert_eq!(QueueTransition::Skip.action(), QueueAction::Skipped);
        assert_eq!(QueueTransition::CheckIn.action(), QueueAction::StatusChanged);
        assert!(QueueTransition::NoShow.completes());
        assert!(!QueueTransition::Reinstate.completes());
    }
}
