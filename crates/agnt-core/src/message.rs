//! Chat messages as the conversation stores them

use std::fmt;
use std::sync::Arc;

use agnt_api::{AgentResponse, Attachment, TaskOutput};
use uuid::Uuid;

/// Unique identifier of a message within a conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Correlation token the agent uses to keep per-conversation state
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

/// What the history keeps of an attached file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    pub file_name: String,
    pub mime_type: String,
    pub size: usize,
}

impl From<&Attachment> for AttachmentRef {
    fn from(file: &Attachment) -> Self {
        Self {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
            size: file.len(),
        }
    }
}

/// A single entry in the conversation history
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: Option<String>,
    pub file: Option<AttachmentRef>,
    /// Present only on finalized agent messages that got a service reply
    pub response: Option<AgentResponse>,
    /// Placeholder shown while the agent works
    pub is_thinking: bool,
    /// Creation time, unix millis
    pub timestamp: i64,
}

impl Message {
    fn base(role: Role) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: None,
            file: None,
            response: None,
            is_thinking: false,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// A user turn
    pub fn user(content: Option<String>, file: Option<AttachmentRef>) -> Self {
        Self {
            content,
            file,
            ..Self::base(Role::User)
        }
    }

    /// The placeholder for a pending agent reply
    pub fn thinking() -> Self {
        Self {
            is_thinking: true,
            ..Self::base(Role::Agent)
        }
    }

    /// A finalized agent message carrying the service's reply
    pub fn agent_response(id: MessageId, response: AgentResponse) -> Self {
        let content = if response.needs_clarification() {
            response.clarification_question.clone()
        } else {
            None
        };
        Self {
            id,
            content,
            response: Some(response),
            ..Self::base(Role::Agent)
        }
    }

    /// A finalized agent message with plain text and no reply
    pub fn agent_text(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            content: Some(text.into()),
            ..Self::base(Role::Agent)
        }
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    /// What to show for this message's body
    pub fn reply(&self) -> Reply<'_> {
        if self.is_thinking {
            return Reply::Thinking;
        }
        if let Some(content) = self.content.as_deref().filter(|c| !c.is_empty()) {
            return Reply::Text(content);
        }
        let Some(response) = &self.response else {
            return Reply::Empty;
        };
        if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
            return Reply::Error(error);
        }
        match &response.final_output {
            Some(output) => Reply::Output(output),
            None => Reply::Empty,
        }
    }
}

/// Renderable body of a message, in display precedence order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reply<'a> {
    Thinking,
    Text(&'a str),
    Error(&'a str),
    Output(&'a TaskOutput),
    Empty,
}

/// Immutable view of the history handed to observers
pub type Snapshot = Arc<[Message]>;

#[cfg(test)]
mod tests {
    use super::*;
    use agnt_api::ResponseStatus;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(MessageId::new(), MessageId::new());
        assert_ne!(ConversationId::new(), ConversationId::new());
        assert_eq!(ConversationId::from("conv-1").to_string(), "conv-1");
    }

    #[test]
    fn test_user_message() {
        let msg = Message::user(Some("hello".into()), None);
        assert!(msg.is_user());
        assert!(!msg.is_thinking);
        assert_eq!(msg.reply(), Reply::Text("hello"));
    }

    #[test]
    fn test_thinking_reply() {
        let msg = Message::thinking();
        assert!(msg.is_agent());
        assert_eq!(msg.reply(), Reply::Thinking);
    }

    #[test]
    fn test_clarification_question_becomes_content() {
        let msg = Message::agent_response(
            MessageId::new(),
            AgentResponse::clarification("Which file should I use?"),
        );
        assert_eq!(msg.reply(), Reply::Text("Which file should I use?"));
    }

    #[test]
    fn test_error_precedes_output() {
        let mut response = AgentResponse::failure("quota exceeded");
        response.final_output = Some(TaskOutput::classify(serde_json::json!({"message": "x"})));
        let msg = Message::agent_response(MessageId::new(), response);
        assert_eq!(msg.reply(), Reply::Error("quota exceeded"));
    }

    #[test]
    fn test_blank_error_falls_through_to_output() {
        let mut response = AgentResponse::failure("");
        response.final_output = Some(TaskOutput::classify(serde_json::json!({"message": "partial"})));
        let msg = Message::agent_response(MessageId::new(), response);
        assert!(matches!(msg.reply(), Reply::Output(_)));

        let msg = Message::agent_response(MessageId::new(), AgentResponse::failure(""));
        assert_eq!(msg.reply(), Reply::Empty);
    }

    #[test]
    fn test_output_reply() {
        let mut response = AgentResponse::success();
        response.final_output = Some(TaskOutput::classify(serde_json::json!({"message": "Done"})));
        let msg = Message::agent_response(MessageId::new(), response);
        assert!(matches!(msg.reply(), Reply::Output(_)));
    }

    #[test]
    fn test_empty_reply() {
        let msg = Message::agent_response(MessageId::new(), AgentResponse::new(ResponseStatus::Error));
        assert_eq!(msg.reply(), Reply::Empty);
        assert_eq!(Message::user(None, None).reply(), Reply::Empty);
    }

    #[test]
    fn test_attachment_ref() {
        let file = Attachment::from_bytes("scan.png", vec![0; 16]).unwrap();
        let file_ref = AttachmentRef::from(&file);
        assert_eq!(file_ref.file_name, "scan.png");
        assert_eq!(file_ref.mime_type, "image/png");
        assert_eq!(file_ref.size, 16);
    }
}
