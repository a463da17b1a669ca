//! Merge a declared plan with the agent's execution log
//!
//! Every plan step is joined to the first log entry carrying its name. Later
//! entries for the same step remain visible in the raw log but never change
//! the step's status. Output follows plan order, whatever order the log
//! arrived in.

use agnt_api::{AgentResponse, LogEntry, PlanStep, StepStatus};

use crate::status::map_status;

/// One plan step with its reconciled status
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepView<'a> {
    pub step: &'a PlanStep,
    pub status: StepStatus,
    /// First log entry recorded for this step
    pub log: Option<&'a LogEntry>,
}

/// Reconcile a plan against its execution log.
pub fn reconcile<'a>(plan: &'a [PlanStep], logs: &'a [LogEntry]) -> Vec<StepView<'a>> {
    plan.iter()
        .map(|step| {
            let log = logs.iter().find(|l| l.step_name == step.name);
            StepView {
                step,
                status: map_status(step.status, log),
                log,
            }
        })
        .collect()
}

/// Everything the execution panel shows for one response
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionView<'a> {
    pub steps: Vec<StepView<'a>>,
    /// Raw log in arrival order
    pub logs: &'a [LogEntry],
    pub cost_estimate: Option<f64>,
    pub total_duration_ms: f64,
    pub extracted_text: Option<&'a str>,
}

impl<'a> ExecutionView<'a> {
    pub fn from_response(response: &'a AgentResponse) -> Self {
        Self {
            steps: reconcile(&response.plan, &response.logs),
            logs: &response.logs,
            cost_estimate: response.cost_estimate,
            total_duration_ms: response.total_duration_ms(),
            extracted_text: response
                .extracted_text
                .as_deref()
                .filter(|t| !t.trim().is_empty()),
        }
    }

    /// Whether the response declared no plan at all
    pub fn has_plan(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn has_logs(&self) -> bool {
        !self.logs.is_empty()
    }

    /// Count of steps in each canonical status
    pub fn count(&self, status: StepStatus) -> usize {
        self.steps.iter().filter(|s| s.status == status).count()
    }
}
