//! Conversation event types

use agnt_api::ResponseStatus;

use crate::message::{ConversationId, MessageId, Snapshot};

/// Events emitted as turns move through the conversation
#[derive(Debug, Clone)]
pub enum ConversationEvent {
    /// A turn was appended and its request dispatched
    Submitted {
        conversation_id: ConversationId,
        message_id: MessageId,
        messages: Snapshot,
    },

    /// The service answered
    Resolved {
        message_id: MessageId,
        status: ResponseStatus,
        messages: Snapshot,
    },

    /// The round trip failed locally
    Failed {
        message_id: MessageId,
        messages: Snapshot,
    },

    /// History was discarded for a fresh conversation
    Reset { conversation_id: ConversationId },
}

impl ConversationEvent {
    /// History after this event, when it carries one
    pub fn messages(&self) -> Option<&Snapshot> {
        match self {
            Self::Submitted { messages, .. }
            | Self::Resolved { messages, .. }
            | Self::Failed { messages, .. } => Some(messages),
            Self::Reset { .. } => None,
        }
    }
}
