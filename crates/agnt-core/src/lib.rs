//! agnt-core: Conversation orchestration for the task agent
//!
//! This crate owns the client-side conversation state machine, the
//! clarification loop, and the reconciliation of a declared plan with the
//! agent's execution log.

pub mod clarification;
pub mod conversation;
pub mod error;
pub mod events;
pub mod message;
pub mod reconcile;
pub mod session;
pub mod status;

pub use clarification::needs_clarification_tag;
pub use conversation::{Conversation, FAILURE_TEXT, Outcome, Turn, TurnToken, UserInput, finalize};
pub use error::{Error, Result};
pub use events::ConversationEvent;
pub use message::{AttachmentRef, ConversationId, Message, MessageId, Reply, Role, Snapshot};
pub use reconcile::{ExecutionView, StepView, reconcile};
pub use session::Session;
pub use status::{map_status, normalize};
