//! Core types exchanged with the agent service

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::output::TaskOutput;

/// Outcome of an agent run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    /// The task ran to completion
    Success,
    /// The agent reported an application-level failure
    Error,
    /// The agent needs more input before it can plan
    NeedsClarification,
}

/// Canonical status of a plan step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    /// Lowercase name as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared unit of work in the agent's plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step identifier, unique within a plan; joins against [`LogEntry::step_name`]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Declared status, only authoritative while no log entry exists
    #[serde(default)]
    pub status: StepStatus,
}

impl PlanStep {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status: StepStatus::Pending,
        }
    }

    pub fn with_status(mut self, status: StepStatus) -> Self {
        self.status = status;
        self
    }
}

/// Runtime execution record for a plan step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub step_name: String,
    #[serde(default)]
    pub input_summary: String,
    #[serde(default)]
    pub output_summary: String,
    /// Free-form status; see `agnt_core::status` for normalization
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub duration_ms: f64,
    /// Per-step cost in USD, when the agent reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
}

impl LogEntry {
    pub fn new(step_name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            step_name: step_name.into(),
            input_summary: String::new(),
            output_summary: String::new(),
            status: status.into(),
            duration_ms: 0.0,
            cost_estimate: None,
        }
    }

    pub fn with_summaries(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_summary = input.into();
        self.output_summary = output.into();
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Full response to one agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clarification_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Raw text the agent derived from an uploaded file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_text: Option<String>,
    /// Task output, classified when the response is decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_output: Option<TaskOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default)]
    pub plan: Vec<PlanStep>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    /// Estimated cost of the run in USD
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
}

impl AgentResponse {
    /// Create an empty response with the given status
    pub fn new(status: ResponseStatus) -> Self {
        Self {
            status,
            clarification_question: None,
            error: None,
            extracted_text: None,
            final_output: None,
            task_type: None,
            plan: vec![],
            logs: vec![],
            cost_estimate: None,
        }
    }

    /// A successful response
    pub fn success() -> Self {
        Self::new(ResponseStatus::Success)
    }

    /// An application-level error response
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(ResponseStatus::Error)
        }
    }

    /// A request for clarification
    pub fn clarification(question: impl Into<String>) -> Self {
        Self {
            clarification_question: Some(question.into()),
            ..Self::new(ResponseStatus::NeedsClarification)
        }
    }

    pub fn with_plan(mut self, plan: Vec<PlanStep>) -> Self {
        self.plan = plan;
        self
    }

    pub fn with_logs(mut self, logs: Vec<LogEntry>) -> Self {
        self.logs = logs;
        self
    }

    pub fn needs_clarification(&self) -> bool {
        self.status == ResponseStatus::NeedsClarification
    }

    /// Check the parts of the contract serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.needs_clarification()
            && self
                .clarification_question
                .as_deref()
                .is_none_or(|q| q.trim().is_empty())
        {
            return Err(Error::MalformedResponse(
                "needs_clarification without a clarification_question".to_string(),
            ));
        }
        if let Some(cost) = self.cost_estimate {
            if !cost.is_finite() || cost < 0.0 {
                return Err(Error::MalformedResponse(format!(
                    "invalid cost_estimate {}",
                    cost
                )));
            }
        }
        if let Some(log) = self
            .logs
            .iter()
            .find(|l| !l.duration_ms.is_finite() || l.duration_ms < 0.0)
        {
            return Err(Error::MalformedResponse(format!(
                "invalid duration_ms for step '{}'",
                log.step_name
            )));
        }
        Ok(())
    }

    /// Sum of all logged step durations
    pub fn total_duration_ms(&self) -> f64 {
        self.logs.iter().map(|l| l.duration_ms).sum()
    }
}
