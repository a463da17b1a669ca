//! Classification of the agent's `final_output` payload
//!
//! The payload shape depends on the task the agent ran. It is classified
//! exactly once, when the response is decoded, by checking for marker keys in
//! a fixed order. The first match wins:
//!
//! 1. `one_line_summary` → [`OutputKind::Summary`]
//! 2. `label` or `sentiment` → [`OutputKind::Sentiment`]
//! 3. `what_it_does` → [`OutputKind::CodeExplanation`]
//! 4. `status` → [`OutputKind::Status`]
//! 5. string `message` → [`OutputKind::Message`]
//! 6. anything else → [`OutputKind::Raw`]
//!
//! A payload carrying markers for several variants resolves to the earliest
//! one. The original JSON is always kept for pass-through.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Output of a summarization task
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub one_line: String,
    pub bullet_points: Vec<String>,
    pub detailed: Option<String>,
}

/// Output of a sentiment analysis task
#[derive(Debug, Clone, PartialEq)]
pub struct Sentiment {
    pub label: String,
    pub confidence: Option<f64>,
    pub justification: Option<String>,
}

/// Output of a code explanation task
#[derive(Debug, Clone, PartialEq)]
pub struct CodeExplanation {
    pub what_it_does: String,
    pub issues: Vec<String>,
    pub time_complexity: Option<String>,
}

/// Recognized shape of a task output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputKind {
    Summary(Summary),
    Sentiment(Sentiment),
    CodeExplanation(CodeExplanation),
    /// Generic status payload, shown as a raw dump
    Status,
    /// Plain conversational answer
    Message(String),
    /// Unrecognized payload
    Raw,
}

/// A classified `final_output` together with its original JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct TaskOutput {
    kind: OutputKind,
    raw: Value,
}

impl TaskOutput {
    /// Classify a raw payload
    pub fn classify(raw: Value) -> Self {
        let kind = match raw.as_object() {
            Some(obj) => classify_object(obj),
            None => OutputKind::Raw,
        };
        Self { kind, raw }
    }

    pub fn kind(&self) -> &OutputKind {
        &self.kind
    }

    /// The payload exactly as the agent sent it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Pretty-printed JSON of the raw payload
    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_else(|_| self.raw.to_string())
    }

    /// Render as plain text blocks, one paragraph per section.
    pub fn to_text(&self) -> String {
        match &self.kind {
            OutputKind::Summary(s) => {
                let mut out = format!("One Line Summary\n{}\n", s.one_line);
                if !s.bullet_points.is_empty() {
                    out.push_str("\nKey Points\n");
                    for point in &s.bullet_points {
                        out.push_str(&format!("• {}\n", point));
                    }
                }
                if let Some(detailed) = &s.detailed {
                    out.push_str(&format!("\nDetailed Summary\n{}\n", detailed));
                }
                out.trim_end().to_string()
            }
            OutputKind::Sentiment(s) => {
                let mut out = format!("Sentiment Analysis\nLabel: {}", s.label);
                if let Some(confidence) = s.confidence {
                    out.push_str(&format!(" ({})", confidence));
                }
                if let Some(justification) = &s.justification {
                    out.push_str(&format!("\nJustification: {}", justification));
                }
                out
            }
            OutputKind::CodeExplanation(c) => {
                let mut out = format!("What It Does\n{}\n", c.what_it_does);
                if !c.issues.is_empty() {
                    out.push_str("\nBugs or Issues\n");
                    for issue in &c.issues {
                        out.push_str(&format!("• {}\n", issue));
                    }
                }
                if let Some(complexity) = &c.time_complexity {
                    out.push_str(&format!("\nTime Complexity\n{}\n", complexity));
                }
                out.trim_end().to_string()
            }
            OutputKind::Message(m) => m.clone(),
            OutputKind::Status | OutputKind::Raw => self.pretty(),
        }
    }
}

impl From<Value> for TaskOutput {
    fn from(raw: Value) -> Self {
        Self::classify(raw)
    }
}

impl From<TaskOutput> for Value {
    fn from(output: TaskOutput) -> Self {
        output.raw
    }
}

fn classify_object(obj: &Map<String, Value>) -> OutputKind {
    if let Some(one_line) = obj.get("one_line_summary") {
        return OutputKind::Summary(Summary {
            one_line: text_of(one_line),
            bullet_points: string_list(obj.get("bullet_points")),
            detailed: obj.get("five_sentence_summary").map(text_of),
        });
    }

    if let Some(label) = obj.get("label").or_else(|| obj.get("sentiment")) {
        return OutputKind::Sentiment(Sentiment {
            label: text_of(label),
            confidence: obj.get("confidence").and_then(Value::as_f64),
            justification: obj.get("justification").map(text_of),
        });
    }

    if let Some(what) = obj.get("what_it_does") {
        return OutputKind::CodeExplanation(CodeExplanation {
            what_it_does: text_of(what),
            issues: string_list(obj.get("bugs_or_issues")),
            time_complexity: obj.get("time_complexity").map(text_of),
        });
    }

    if obj.contains_key("status") {
        return OutputKind::Status;
    }

    if let Some(Value::String(message)) = obj.get("message") {
        return OutputKind::Message(message.clone());
    }

    OutputKind::Raw
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items.iter().map(text_of).collect(),
        Some(Value::Null) | None => vec![],
        Some(other) => vec![text_of(other)],
    }
}
