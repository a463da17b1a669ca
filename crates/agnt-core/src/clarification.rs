//! Detecting that the next user turn answers a clarification question

use crate::message::Message;

/// Whether the next submission should be tagged as a clarification answer.
///
/// Looks at the most recent agent message that received a service reply.
/// Local failures and the thinking placeholder are skipped, so a retry after
/// a transport error still answers the question that preceded it.
pub fn needs_clarification_tag(history: &[Message]) -> bool {
    history
        .iter()
        .rev()
        .filter(|m| m.is_agent() && !m.is_thinking)
        .find_map(|m| m.response.as_ref())
        .is_some_and(|r| r.needs_clarification())
}
