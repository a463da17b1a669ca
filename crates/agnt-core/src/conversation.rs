//! Conversation store: history, the busy gate, and the turn lifecycle
//!
//! A turn moves through submit, dispatch, resolve. `submit` appends the user
//! message and a thinking placeholder and hands back a [`Turn`] holding the
//! only token that can resolve it. While that token is outstanding the
//! conversation is busy and refuses further submissions.

use std::sync::Arc;

use agnt_api::{AgentRequest, AgentResponse, Attachment};

use crate::{
    clarification::needs_clarification_tag,
    error::{Error, Result},
    message::{AttachmentRef, ConversationId, Message, MessageId, Snapshot},
};

/// Shown in place of the agent reply when the round trip fails locally
pub const FAILURE_TEXT: &str = "Sorry, something went wrong. Please try again.";

/// What the user typed and attached for one turn
#[derive(Debug, Clone, Default)]
pub struct UserInput {
    pub text: Option<String>,
    pub file: Option<Attachment>,
}

impl UserInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            file: None,
        }
    }

    pub fn with_file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }

    /// Whitespace-only text counts as no text
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().is_none_or(|t| t.trim().is_empty()) && self.file.is_none()
    }
}

/// How an outstanding turn ended
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The service answered with a well-formed response
    Response(AgentResponse),
    /// Transport or parse failure
    Failed,
}

/// Proof of the single outstanding request. Not cloneable.
#[derive(Debug, PartialEq, Eq)]
pub struct TurnToken {
    message_id: MessageId,
}

impl TurnToken {
    /// Id of the thinking placeholder this token resolves
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}

/// A submitted turn: the request to dispatch and the token to resolve it with
#[derive(Debug)]
pub struct Turn {
    pub token: TurnToken,
    pub request: AgentRequest,
}

impl Turn {
    pub fn into_parts(self) -> (TurnToken, AgentRequest) {
        (self.token, self.request)
    }
}

/// Replace the thinking placeholder `id` with its terminal shape.
///
/// Returns a new history; every other message keeps its position and value.
/// If no thinking message carries `id` the history is returned unchanged.
pub fn finalize(history: &[Message], id: &MessageId, outcome: Outcome) -> Vec<Message> {
    let mut outcome = Some(outcome);
    history
        .iter()
        .map(|msg| {
            if !(msg.is_thinking && &msg.id == id) {
                return msg.clone();
            }
            let replacement = match outcome.take() {
                Some(Outcome::Response(response)) => {
                    Message::agent_response(msg.id.clone(), response)
                }
                Some(Outcome::Failed) => Message::agent_text(msg.id.clone(), FAILURE_TEXT),
                None => return msg.clone(),
            };
            Message {
                timestamp: msg.timestamp,
                ..replacement
            }
        })
        .collect()
}

/// A single conversation with the agent
#[derive(Debug)]
pub struct Conversation {
    id: ConversationId,
    messages: Snapshot,
    in_flight: Option<MessageId>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self::with_id(ConversationId::new())
    }

    pub fn with_id(id: ConversationId) -> Self {
        Self {
            id,
            messages: Arc::from(Vec::new()),
            in_flight: None,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Cheap shared copy of the current history
    pub fn snapshot(&self) -> Snapshot {
        Arc::clone(&self.messages)
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Append the user turn and a thinking placeholder.
    ///
    /// Returns `Ok(None)` for an empty submission and `Err(Busy)` while a
    /// request is outstanding. Neither case touches the history.
    pub fn submit(&mut self, input: UserInput) -> Result<Option<Turn>> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        if input.is_empty() {
            return Ok(None);
        }

        let text = input.text.filter(|t| !t.trim().is_empty());
        let clarifying = needs_clarification_tag(&self.messages);

        let user = Message::user(text.clone(), input.file.as_ref().map(AttachmentRef::from));
        let thinking = Message::thinking();
        let message_id = thinking.id.clone();

        let mut request = AgentRequest::new(self.id.as_str());
        if let Some(text) = text {
            request = request.with_text(text);
        }
        if let Some(file) = input.file {
            request = request.with_file(file);
        }
        if clarifying {
            request = request.as_clarification_answer();
        }

        let mut messages = self.messages.to_vec();
        messages.push(user);
        messages.push(thinking);
        self.messages = Arc::from(messages);
        self.in_flight = Some(message_id.clone());

        tracing::debug!(
            conversation_id = %self.id,
            message_id = %message_id,
            clarification = request.is_clarification_answer(),
            "Turn submitted"
        );

        Ok(Some(Turn {
            token: TurnToken { message_id },
            request,
        }))
    }

    /// Finalize the outstanding turn and clear the busy flag.
    pub fn resolve(&mut self, token: TurnToken, outcome: Outcome) -> Result<()> {
        if self.in_flight.as_ref() != Some(&token.message_id) {
            tracing::warn!(
                conversation_id = %self.id,
                message_id = %token.message_id,
                "Ignoring resolution for a turn that is not outstanding"
            );
            return Err(Error::StaleTurn(token.message_id.to_string()));
        }

        self.messages = Arc::from(finalize(&self.messages, &token.message_id, outcome));
        self.in_flight = None;
        Ok(())
    }

    /// Response of the most recent agent message that got one
    pub fn latest_response(&self) -> Option<&AgentResponse> {
        self.messages
            .iter()
            .rev()
            .filter(|m| m.is_agent())
            .find_map(|m| m.response.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Reply, Role};
    use agnt_api::ResponseStatus;

    fn thinking_count(conv: &Conversation) -> usize {
        conv.messages().iter().filter(|m| m.is_thinking).count()
    }

    #[test]
    fn test_submit_appends_user_and_thinking() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("summarize this")).unwrap().unwrap();

        let msgs = conv.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[0].content.as_deref(), Some("summarize this"));
        assert_eq!(msgs[1].role, Role::Agent);
        assert!(msgs[1].is_thinking);
        assert_eq!(&msgs[1].id, turn.token.message_id());
        assert!(conv.is_busy());

        assert_eq!(turn.request.text.as_deref(), Some("summarize this"));
        assert_eq!(turn.request.conversation_id, conv.id().as_str());
        assert!(!turn.request.is_clarification_answer());
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut conv = Conversation::new();
        assert!(conv.submit(UserInput::default()).unwrap().is_none());
        assert!(conv.submit(UserInput::text("   ")).unwrap().is_none());
        assert!(conv.messages().is_empty());
        assert!(!conv.is_busy());
    }

    #[test]
    fn test_file_only_submit() {
        let mut conv = Conversation::new();
        let file = Attachment::from_bytes("scan.png", vec![1, 2]).unwrap();
        let turn = conv
            .submit(UserInput::default().with_file(file))
            .unwrap()
            .unwrap();

        assert!(turn.request.text.is_none());
        assert!(turn.request.file.is_some());
        assert_eq!(
            conv.messages()[0].file.as_ref().map(|f| f.file_name.as_str()),
            Some("scan.png")
        );
    }

    #[test]
    fn test_submit_while_busy_is_rejected() {
        let mut conv = Conversation::new();
        let _turn = conv.submit(UserInput::text("one")).unwrap().unwrap();

        let err = conv.submit(UserInput::text("two")).unwrap_err();
        assert!(matches!(err, Error::Busy));
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(thinking_count(&conv), 1);
    }

    #[test]
    fn test_clarification_round_trip() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("process this")).unwrap().unwrap();
        conv.resolve(
            turn.token,
            Outcome::Response(AgentResponse::clarification("Which file?")),
        )
        .unwrap();

        let msgs = conv.messages();
        assert_eq!(msgs[1].content.as_deref(), Some("Which file?"));
        assert!(!msgs[1].is_thinking);
        assert!(!conv.is_busy());

        let turn = conv.submit(UserInput::text("report.pdf")).unwrap().unwrap();
        assert_eq!(
            turn.request.clarification_answer.as_deref(),
            Some("report.pdf")
        );
    }

    #[test]
    fn test_transport_failure_finalizes_with_generic_text() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("hi")).unwrap().unwrap();
        let id = turn.token.message_id().clone();
        conv.resolve(turn.token, Outcome::Failed).unwrap();

        let msgs = conv.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].id, id);
        assert_eq!(msgs[1].content.as_deref(), Some(FAILURE_TEXT));
        assert!(msgs[1].response.is_none());
        assert!(!msgs[1].is_thinking);
        assert!(!conv.is_busy());
        assert_eq!(thinking_count(&conv), 0);
    }

    #[test]
    fn test_success_leaves_content_unset() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("hi")).unwrap().unwrap();
        conv.resolve(turn.token, Outcome::Response(AgentResponse::failure("bad key")))
            .unwrap();

        let msg = &conv.messages()[1];
        assert!(msg.content.is_none());
        assert_eq!(msg.reply(), Reply::Error("bad key"));
        assert_eq!(
            conv.latest_response().map(|r| r.status),
            Some(ResponseStatus::Error)
        );
    }

    #[test]
    fn test_stale_token_is_rejected() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("one")).unwrap().unwrap();
        let stale = TurnToken {
            message_id: MessageId::new(),
        };

        let err = conv.resolve(stale, Outcome::Failed).unwrap_err();
        assert!(matches!(err, Error::StaleTurn(_)));
        assert!(conv.is_busy());
        assert_eq!(thinking_count(&conv), 1);

        conv.resolve(turn.token, Outcome::Failed).unwrap();
        assert!(!conv.is_busy());
    }

    #[test]
    fn test_finalize_is_pure() {
        let mut conv = Conversation::new();
        let turn = conv.submit(UserInput::text("hi")).unwrap().unwrap();
        let before = conv.snapshot();

        let after = finalize(&before, turn.token.message_id(), Outcome::Failed);
        assert!(before[1].is_thinking);
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1].id, before[1].id);
        assert_eq!(after[1].timestamp, before[1].timestamp);
        assert!(!after[1].is_thinking);
    }

    #[test]
    fn test_finalize_unknown_id_is_identity() {
        let history = vec![Message::user(Some("a".into()), None), Message::thinking()];
        let after = finalize(&history, &MessageId::new(), Outcome::Failed);
        assert_eq!(after, history);
    }

    #[test]
    fn test_history_preserved_across_turns() {
        let mut conv = Conversation::new();
        for i in 0..3 {
            let turn = conv.submit(UserInput::text(format!("msg {}", i))).unwrap().unwrap();
            conv.resolve(turn.token, Outcome::Response(AgentResponse::success()))
                .unwrap();
        }

        let texts: Vec<_> = conv
            .messages()
            .iter()
            .filter(|m| m.is_user())
            .filter_map(|m| m.content.clone())
            .collect();
        assert_eq!(texts, vec!["msg 0", "msg 1", "msg 2"]);
        assert_eq!(conv.messages().len(), 6);
        assert_eq!(thinking_count(&conv), 0);
    }
}
