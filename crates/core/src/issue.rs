//! Issue lifecycle rules: initial status, the closure evidence gate, and the
//! per-issue photo cap.
//!
//! These functions are pure. The repository layer evaluates them while holding
//! a row lock on the issue so the photo count cannot change underneath.

use crate::error::CoreError;
use crate::status::IssueStatus;
use crate::types::DbId;

/// Maximum number of photos (before and after combined) per issue.
pub const MAX_PHOTOS_PER_ISSUE: usize = 10;

/// Issue categories offered to the client.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Finish/Cosmetic",
    "Functional",
    "Safety",
    "Incomplete",
    "Damage",
    "Cleaning",
    "Touch-up",
    "Adjustment",
    "Missing Item",
    "Other",
];

/// Status assigned to a newly created issue.
pub fn initial_status(contractor_id: Option<DbId>) -> IssueStatus {
    if contractor_id.is_some() {
        IssueStatus::Assigned
    } else {
        IssueStatus::Open
    }
}

/// What a transition does to the `closed_at` / `closed_by` stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureStamp {
    /// Entering `closed`: stamp actor and time (also copied to `last_closed_*`).
    Stamp,
    /// Leaving `closed`: clear `closed_*`, keep `last_closed_*`.
    Clear,
    /// Neither side is `closed`.
    Keep,
}

/// An approved status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: IssueStatus,
    pub to: IssueStatus,
    pub closure: ClosureStamp,
}

/// Validate a status change against the evidence gate.
///
/// Any status may be set directly. Entering `closed` (including re-closing an
/// already closed issue) requires at least one `after` photo.
pub fn plan_transition(
    issue_id: DbId,
    from: IssueStatus,
    to: IssueStatus,
    after_photo_count: i64,
) -> Result<TransitionPlan, CoreError> {
    let closure = if to == IssueStatus::Closed {
        if after_photo_count < 1 {
            return Err(CoreError::MissingEvidence { issue_id });
        }
        ClosureStamp::Stamp
    } else if from == IssueStatus::Closed {
        ClosureStamp::Clear
    } else {
        ClosureStamp::Keep
    };

    Ok(TransitionPlan { from, to, closure })
}

/// Reject a new photo when the issue is already at the cap.
pub fn check_photo_capacity(issue_id: DbId, existing: i64) -> Result<(), CoreError> {
    if existing >= MAX_PHOTOS_PER_ISSUE as i64 {
        return Err(CoreError::PhotoLimitExceeded {
            issue_id,
            limit: MAX_PHOTOS_PER_ISSUE,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_issue_is_assigned_only_with_contractor() {
        assert_eq!(initial_status(Some(4)), IssueStatus::Assigned);
        assert_eq!(initial_status(None), IssueStatus::Open);
    }

    #[test]
    fn closing_without_after_photo_is_rejected() {
        let err = plan_transition(7, IssueStatus::ReadyForReinspect, IssueStatus::Closed, 0)
            .unwrap_err();
        assert!(matches!(err, CoreError::MissingEvidence { issue_id: 7 }));
    }

    #[test]
    fn closing_with_after_photo_stamps() {
        let plan = plan_transition(1, IssueStatus::Open, IssueStatus::Closed, 1).unwrap();
        assert_eq!(plan.closure, ClosureStamp::Stamp);
    }

    #[test]
    fn reclosing_is_gated_too() {
        assert!(plan_transition(1, IssueStatus::Closed, IssueStatus::Closed, 0).is_err());
        let plan = plan_transition(1, IssueStatus::Closed, IssueStatus::Closed, 2).unwrap();
        assert_eq!(plan.closure, ClosureStamp::Stamp);
    }

    #[test]
    fn reopening_clears_stamp() {
        let plan = plan_transition(1, IssueStatus::Closed, IssueStatus::Open, 0).unwrap();
        assert_eq!(plan.closure, ClosureStamp::Clear);
    }

    #[test]
    fn non_closed_moves_are_free() {
        for from in IssueStatus::ALL.iter().filter(|s| **s != IssueStatus::Closed) {
            for to in IssueStatus::ALL.iter().filter(|s| **s != IssueStatus::Closed) {
                let plan = plan_transition(1, *from, *to, 0).unwrap();
                assert_eq!(plan.closure, ClosureStamp::Keep);
            }
        }
    }

    #[test]
    fn photo_cap_allows_up_to_limit() {
        assert!(check_photo_capacity(3, 9).is_ok());
        let err = check_photo_capacity(3, 10).unwrap_err();
        assert!(matches!(
            err,
            CoreError::PhotoLimitExceeded { issue_id: 3, limit: 10 }
        ));
    }

    #[test]
    fn default_categories_are_fixed() {
        assert_eq!(DEFAULT_CATEGORIES.len(), 10);
        assert_eq!(DEFAULT_CATEGORIES[0], "Finish/Cosmetic");
        assert_eq!(DEFAULT_CATEGORIES[9], "Other");
    }
}
