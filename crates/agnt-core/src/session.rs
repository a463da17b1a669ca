//! Session: a conversation wired to an agent client

use std::sync::Arc;

use agnt_api::{AgentClient, HealthStatus};
use tokio::sync::broadcast;

use crate::{
    conversation::{Conversation, Outcome, UserInput},
    error::{Error, Result},
    events::ConversationEvent,
    message::{ConversationId, Message, MessageId},
};

/// Drives turns of a [`Conversation`] through an [`AgentClient`]
pub struct Session {
    conversation: Conversation,
    client: Arc<dyn AgentClient>,
    event_tx: broadcast::Sender<ConversationEvent>,
}

impl Session {
    pub fn new(client: Arc<dyn AgentClient>) -> Self {
        Self::with_conversation(client, Conversation::new())
    }

    pub fn with_conversation(client: Arc<dyn AgentClient>, conversation: Conversation) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            conversation,
            client,
            event_tx,
        }
    }

    /// Subscribe to conversation events
    pub fn subscribe(&self) -> broadcast::Receiver<ConversationEvent> {
        self.event_tx.subscribe()
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_busy(&self) -> bool {
        self.conversation.is_busy()
    }

    /// Run one turn to completion.
    ///
    /// Returns the id of the finalized agent message, or `None` when the input
    /// was empty. Transport failures are absorbed into the history; only a
    /// busy conversation is reported as an error.
    pub async fn send(&mut self, input: UserInput) -> Result<Option<MessageId>> {
        let Some(turn) = self.conversation.submit(input)? else {
            return Ok(None);
        };
        let (token, request) = turn.into_parts();
        let message_id = token.message_id().clone();

        let _ = self.event_tx.send(ConversationEvent::Submitted {
            conversation_id: self.conversation.id().clone(),
            message_id: message_id.clone(),
            messages: self.conversation.snapshot(),
        });

        let outcome = match self.client.run(request).await {
            Ok(response) => Outcome::Response(response),
            Err(e) if e.is_transport() => {
                tracing::warn!(
                    conversation_id = %self.conversation.id(),
                    error = %e,
                    "Agent request failed"
                );
                Outcome::Failed
            }
            Err(e) => {
                tracing::error!(
                    conversation_id = %self.conversation.id(),
                    error = %e,
                    "Agent client error"
                );
                Outcome::Failed
            }
        };

        let status = match &outcome {
            Outcome::Response(response) => Some(response.status),
            Outcome::Failed => None,
        };
        self.conversation.resolve(token, outcome)?;
        tracing::info!(
            conversation_id = %self.conversation.id(),
            message_id = %message_id,
            status = ?status,
            "Turn resolved"
        );

        let messages = self.conversation.snapshot();
        let event = match status {
            Some(status) => ConversationEvent::Resolved {
                message_id: message_id.clone(),
                status,
                messages,
            },
            None => ConversationEvent::Failed {
                message_id: message_id.clone(),
                messages,
            },
        };
        let _ = self.event_tx.send(event);

        Ok(Some(message_id))
    }

    /// Drop the history and start over under a new conversation id
    pub fn new_conversation(&mut self) -> Result<&ConversationId> {
        if self.is_busy() {
            return Err(Error::Busy);
        }
        self.conversation = Conversation::new();
        let _ = self.event_tx.send(ConversationEvent::Reset {
            conversation_id: self.conversation.id().clone(),
        });
        Ok(self.conversation.id())
    }

    /// Probe the agent service
    pub async fn health(&self) -> Result<HealthStatus> {
        Ok(self.client.health().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::FAILURE_TEXT;
    use agnt_api::{AgentRequest, AgentResponse, ResponseStatus};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Client that replays canned replies and records what it was sent
    struct MockClient {
        replies: Mutex<Vec<agnt_api::Result<AgentResponse>>>,
        requests: Mutex<Vec<AgentRequest>>,
    }

    impl MockClient {
        fn new(replies: Vec<agnt_api::Result<AgentResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                requests: Mutex::new(vec![]),
            })
        }

        fn requests(&self) -> Vec<AgentRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AgentClient for MockClient {
        async fn run(&self, request: AgentRequest) -> agnt_api::Result<AgentResponse> {
            self.requests.lock().unwrap().push(request);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(AgentResponse::success())
            } else {
                replies.remove(0)
            }
        }

        async fn health(&self) -> agnt_api::Result<HealthStatus> {
            Ok(HealthStatus {
                status: "ok".into(),
                app: None,
            })
        }
    }

    fn transport_error() -> agnt_api::Error {
        agnt_api::Error::Status {
            status: 502,
            body: "Bad Gateway".into(),
        }
    }

    #[tokio::test]
    async fn test_send_success() {
        let client = MockClient::new(vec![Ok(AgentResponse::success())]);
        let mut session = Session::new(client.clone());
        let mut rx = session.subscribe();

        let id = session.send(UserInput::text("summarize this")).await.unwrap();
        let id = id.unwrap();

        assert!(!session.is_busy());
        let msgs = session.messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[1].id, id);
        assert!(msgs[1].response.is_some());

        match rx.recv().await.unwrap() {
            ConversationEvent::Submitted { messages, .. } => {
                assert_eq!(messages.len(), 2);
                assert!(messages[1].is_thinking);
            }
            other => panic!("unexpected event {:?}", other),
        }
        match rx.recv().await.unwrap() {
            ConversationEvent::Resolved { status, messages, .. } => {
                assert_eq!(status, ResponseStatus::Success);
                assert!(!messages[1].is_thinking);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_empty_is_noop() {
        let client = MockClient::new(vec![]);
        let mut session = Session::new(client.clone());

        assert!(session.send(UserInput::default()).await.unwrap().is_none());
        assert!(session.messages().is_empty());
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let client = MockClient::new(vec![Err(transport_error())]);
        let mut session = Session::new(client.clone());
        let mut rx = session.subscribe();

        session.send(UserInput::text("hi")).await.unwrap();

        let msg = &session.messages()[1];
        assert_eq!(msg.content.as_deref(), Some(FAILURE_TEXT));
        assert!(msg.response.is_none());
        assert!(!session.is_busy());

        let _submitted = rx.recv().await.unwrap();
        assert!(matches!(
            rx.recv().await.unwrap(),
            ConversationEvent::Failed { .. }
        ));
    }

    #[tokio::test]
    async fn test_client_error_takes_failure_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let client = MockClient::new(vec![Err(agnt_api::Error::Io(io))]);
        let mut session = Session::new(client.clone());

        let id = session.send(UserInput::text("hi")).await.unwrap().unwrap();

        let msg = &session.messages()[1];
        assert_eq!(msg.id, id);
        assert!(!msg.is_thinking);
        assert_eq!(msg.content.as_deref(), Some(FAILURE_TEXT));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_clarification_answer_is_tagged() {
        let client = MockClient::new(vec![
            Ok(AgentResponse::clarification("Which file?")),
            Ok(AgentResponse::success()),
        ]);
        let mut session = Session::new(client.clone());

        session.send(UserInput::text("process this")).await.unwrap();
        session.send(UserInput::text("report.pdf")).await.unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests[0].clarification_answer.is_none());
        assert_eq!(
            requests[1].clarification_answer.as_deref(),
            Some("report.pdf")
        );
        assert_eq!(requests[0].conversation_id, requests[1].conversation_id);
    }

    #[tokio::test]
    async fn test_retry_after_failure_keeps_clarification() {
        let client = MockClient::new(vec![
            Ok(AgentResponse::clarification("Which file?")),
            Err(transport_error()),
            Ok(AgentResponse::success()),
        ]);
        let mut session = Session::new(client.clone());

        session.send(UserInput::text("process this")).await.unwrap();
        session.send(UserInput::text("report.pdf")).await.unwrap();
        session.send(UserInput::text("report.pdf")).await.unwrap();

        let requests = client.requests();
        assert!(requests[1].is_clarification_answer());
        assert!(requests[2].is_clarification_answer());
    }

    #[tokio::test]
    async fn test_new_conversation() {
        let client = MockClient::new(vec![]);
        let mut session = Session::new(client.clone());
        session.send(UserInput::text("hi")).await.unwrap();
        let old_id = session.conversation().id().clone();

        let new_id = session.new_conversation().unwrap().clone();
        assert_ne!(old_id, new_id);
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let session = Session::new(MockClient::new(vec![]));
        assert!(session.health().await.unwrap().is_ok());
    }
}
