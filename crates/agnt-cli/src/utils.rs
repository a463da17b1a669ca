//! Shared utilities

use agnt_core::{ExecutionView, Message, Reply};
use agnt_tui::widgets::plan_panel::{format_cost, format_duration};

/// Truncate a string to `max` characters, appending "..." if truncated.
/// Operates on Unicode char boundaries, not bytes.
pub fn truncate_chars(s: &str, max: usize) -> String {
    let mut chars = s.chars();
    let truncated: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}

/// Plain-text body of a finalized message
pub fn reply_text(msg: &Message) -> String {
    match msg.reply() {
        Reply::Thinking => "thinking...".to_string(),
        Reply::Text(text) => text.to_string(),
        Reply::Error(error) => format!("Error: {}", error),
        Reply::Output(output) => output.to_text(),
        Reply::Empty => String::new(),
    }
}

/// Compact plan and log summary for line mode
pub fn plan_summary(view: &ExecutionView) -> String {
    let mut out = String::new();
    if view.has_plan() {
        out.push_str("Plan:\n");
        for (i, step) in view.steps.iter().enumerate() {
            out.push_str(&format!(
                "  {}. [{}] {}\n",
                i + 1,
                step.status,
                step.step.name
            ));
        }
    } else {
        out.push_str("No plan steps available\n");
    }

    if view.has_logs() {
        out.push_str("Logs:\n");
        for log in view.logs {
            out.push_str(&format!(
                "  {} ({}) {}\n",
                log.step_name,
                log.status,
                format_duration(log.duration_ms)
            ));
            if !log.output_summary.is_empty() {
                out.push_str(&format!("    {}\n", truncate_chars(&log.output_summary, 100)));
            }
        }
        out.push_str(&format!(
            "Total duration: {}\n",
            format_duration(view.total_duration_ms)
        ));
    } else {
        out.push_str("No logs available\n");
    }

    if let Some(cost) = view.cost_estimate {
        out.push_str(&format!("Estimated cost: {}\n", format_cost(cost)));
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use agnt_api::{AgentResponse, LogEntry, PlanStep};
    use agnt_core::MessageId;

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello world", 5), "hello...");
        assert_eq!(truncate_chars("héllo", 2), "hé...");
    }

    #[test]
    fn test_reply_text() {
        let msg = Message::agent_response(MessageId::new(), AgentResponse::failure("bad key"));
        assert_eq!(reply_text(&msg), "Error: bad key");

        let msg = Message::agent_text(MessageId::new(), "Sorry");
        assert_eq!(reply_text(&msg), "Sorry");
    }

    #[test]
    fn test_plan_summary() {
        let mut response = AgentResponse::success()
            .with_plan(vec![
                PlanStep::new("fetch", ""),
                PlanStep::new("summarize", ""),
            ])
            .with_logs(vec![LogEntry::new("fetch", "success").with_duration(120.0)]);
        response.cost_estimate = Some(0.5);
        let view = ExecutionView::from_response(&response);

        let summary = plan_summary(&view);
        assert!(summary.contains("1. [completed] fetch"));
        assert!(summary.contains("2. [pending] summarize"));
        assert!(summary.contains("fetch (success) 120ms"));
        assert!(summary.contains("Estimated cost: 0.5000 USD"));
    }

    #[test]
    fn test_plan_summary_empty() {
        let response = AgentResponse::success();
        let view = ExecutionView::from_response(&response);
        let summary = plan_summary(&view);
        assert!(summary.contains("No plan steps available"));
        assert!(summary.contains("No logs available"));
    }
}
