//! /attach command - queue a file for the next submission

use super::CommandResult;
use agnt_api::ACCEPTED_EXTENSIONS;
use std::path::{Path, PathBuf};

pub struct AttachCommand;

impl AttachCommand {
    pub fn execute(args: &str) -> CommandResult {
        if args.is_empty() {
            return CommandResult::Message("Usage: /attach <path>".to_string());
        }

        let path = expand_home(args);
        if !has_accepted_extension(&path) {
            return CommandResult::Message(format!(
                "Unsupported file type: {}\nAccepted: {}",
                path.display(),
                ACCEPTED_EXTENSIONS.join(", ")
            ));
        }
        CommandResult::Attach(path)
    }
}

fn expand_home(arg: &str) -> PathBuf {
    match (arg.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(arg),
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| ACCEPTED_EXTENSIONS.contains(&e.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_accepted() {
        assert_eq!(
            AttachCommand::execute("docs/report.PDF"),
            CommandResult::Attach(PathBuf::from("docs/report.PDF"))
        );
    }

    #[test]
    fn test_attach_usage_and_rejection() {
        assert!(matches!(AttachCommand::execute(""), CommandResult::Message(m) if m.starts_with("Usage")));
        assert!(matches!(
            AttachCommand::execute("notes.docx"),
            CommandResult::Message(m) if m.contains("Unsupported")
        ));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/a.png"), home.join("a.png"));
        }
        assert_eq!(expand_home("/tmp/a.png"), PathBuf::from("/tmp/a.png"));
    }
}
