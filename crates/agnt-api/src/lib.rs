//! agnt-api: Wire protocol for the remote task agent
//!
//! This crate defines the request and response shapes exchanged with the
//! agent service and a reqwest-based client that speaks them.

pub mod client;
pub mod error;
pub mod output;
pub mod request;
pub mod types;

pub use client::{AgentClient, HealthStatus, HttpAgentClient};
pub use error::{Error, Result};
pub use output::{CodeExplanation, OutputKind, Sentiment, Summary, TaskOutput};
pub use request::{ACCEPTED_EXTENSIONS, AgentRequest, Attachment, FormField};
pub use types::*;
