//! One-sentence verdict feedback shown under the theory board.
//!
//! The cascade order and wording are UI copy; keep them stable.

use casebook_core::models::{InvalidConnection, RejectionReason};

pub const VALID: &str = "Your theory holds up. The evidence supports every link you've drawn.";
pub const UNSUPPORTED_TYPE: &str =
    "One of your connections uses a relationship this case doesn't recognize.";
pub const DUPLICATE: &str = "Your theory links the same clues the same way more than once.";
pub const UNKNOWN_NODE_REFERENCE: &str =
    "Some of your connections point at clues that aren't part of this case.";
pub const MALFORMED: &str =
    "Some connections are incomplete. Every link needs two different clues.";
pub const UNKNOWN_NODES: &str =
    "Careful: some leads on your board don't belong to this case.";

/// Accuracy at or above which the theory counts as "very close".
pub const CLOSE_BAND: f64 = 0.9;
/// Accuracy at or above which the theory counts as "on track".
pub const ON_TRACK_BAND: f64 = 0.6;

/// Pick the feedback sentence for a verdict.
pub fn feedback_message(
    valid: bool,
    accuracy: f64,
    invalid: &[InvalidConnection],
    unknown_nodes: &[String],
) -> String {
    if valid {
        return VALID.to_string();
    }

    let has = |reason: RejectionReason| invalid.iter().any(|i| i.reason == reason);
    if has(RejectionReason::UnsupportedConnectionType) {
        return UNSUPPORTED_TYPE.to_string();
    }
    if has(RejectionReason::Duplicate) {
        return DUPLICATE.to_string();
    }
    if has(RejectionReason::UnknownNode) {
        return UNKNOWN_NODE_REFERENCE.to_string();
    }
    if has(RejectionReason::InvalidNodes) {
        return MALFORMED.to_string();
    }
    if !unknown_nodes.is_empty() {
        return UNKNOWN_NODES.to_string();
    }

    let percent = (accuracy * 100.0).round() as i64;
    if accuracy >= CLOSE_BAND {
        format!("So close! Your theory is a {percent}% match. Only a detail or two is out of place.")
    } else if accuracy >= ON_TRACK_BAND {
        format!("You're on the right track ({percent}% match), but key connections are still missing.")
    } else {
        format!("This theory doesn't hold up yet ({percent}% match). Revisit the evidence and try again.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(reason: RejectionReason) -> InvalidConnection {
        InvalidConnection {
            from: None,
            to: None,
            connection_type: None,
            reason,
            key: None,
        }
    }

    #[test]
    fn valid_wins_over_everything() {
        let msg = feedback_message(true, 0.2, &[], &["x".into()]);
        assert_eq!(msg, VALID);
    }

    #[test]
    fn invalid_reasons_follow_fixed_order() {
        let invalid = [
            rejected(RejectionReason::InvalidNodes),
            rejected(RejectionReason::Duplicate),
        ];
        assert_eq!(feedback_message(false, 0.95, &invalid, &[]), DUPLICATE);
        assert_eq!(
            feedback_message(false, 0.95, &invalid[..1], &[]),
            MALFORMED
        );
    }

    #[test]
    fn unknown_nodes_before_bands() {
        assert_eq!(
            feedback_message(false, 0.95, &[], &["ghost".into()]),
            UNKNOWN_NODES
        );
    }

    #[test]
    fn proximity_bands() {
        assert!(feedback_message(false, 0.92, &[], &[]).starts_with("So close! Your theory is a 92% match"));
        assert!(feedback_message(false, 0.6, &[], &[]).contains("(60% match)"));
        assert!(feedback_message(false, 0.59, &[], &[]).starts_with("This theory doesn't hold up yet (59% match)"));
    }
}
