//! Agent service client

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    request::AgentRequest,
    types::AgentResponse,
};

/// Path of the run endpoint, relative to the base URL
pub const RUN_PATH: &str = "/api/v1/agent/run";

/// Path of the health endpoint, relative to the base URL
pub const HEALTH_PATH: &str = "/health";

/// Body returned by the health endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub app: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Anything that can carry a request to the agent and bring back its response
#[async_trait]
pub trait AgentClient: Send + Sync {
    /// Run one agent turn
    async fn run(&self, request: AgentRequest) -> Result<AgentResponse>;

    /// Probe service health
    async fn health(&self) -> Result<HealthStatus>;
}

/// HTTP client for the agent service
pub struct HttpAgentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAgentClient {
    /// Create a client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::build(base_url.into(), None)
    }

    /// Create a client whose requests fail after `timeout`
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::build(base_url.into(), Some(timeout))
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::InvalidConfig(format!(
                "base URL must start with http:// or https://, got '{}'",
                base_url
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn run(&self, request: AgentRequest) -> Result<AgentResponse> {
        let url = self.url(RUN_PATH);
        tracing::debug!(
            url = %url,
            conversation_id = %request.conversation_id,
            has_file = request.file.is_some(),
            clarification = request.is_clarification_answer(),
            "Dispatching agent request"
        );

        let form = request.to_form()?;
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: AgentResponse = serde_json::from_str(&body)?;
        parsed.validate()?;

        tracing::debug!(
            status = ?parsed.status,
            steps = parsed.plan.len(),
            logs = parsed.logs.len(),
            "Agent response received"
        );
        Ok(parsed)
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.url(HEALTH_PATH)).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = HttpAgentClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(
            client.url(RUN_PATH),
            "http://localhost:8000/api/v1/agent/run"
        );
    }

    #[test]
    fn test_base_url_requires_scheme() {
        let err = HttpAgentClient::new("localhost:8000").err().unwrap();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_health_status_ok() {
        let health: HealthStatus =
            serde_json::from_str(r#"{"status": "ok", "app": "Agentic AI Assistant"}"#).unwrap();
        assert!(health.is_ok());
        assert_eq!(health.app.as_deref(), Some("Agentic AI Assistant"));
    }
}
