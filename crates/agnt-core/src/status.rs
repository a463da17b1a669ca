//! Display status of a single plan step

use agnt_api::{LogEntry, StepStatus};

/// Fold a free-form log status into a canonical step status.
///
/// Unrecognized strings, including the empty string, map to pending.
pub fn normalize(status: &str) -> StepStatus {
    match status {
        "completed" | "success" => StepStatus::Completed,
        "failed" | "error" => StepStatus::Failed,
        "running" => StepStatus::Running,
        _ => StepStatus::Pending,
    }
}

/// Status to display for a step given its matching log entry, if any.
pub fn map_status(declared: StepStatus, log: Option<&LogEntry>) -> StepStatus {
    match log {
        Some(entry) => normalize(&entry.status),
        None => declared,
    }
}
