//! Slash commands for interactive mode

mod attach;

pub use attach::AttachCommand;

use std::path::PathBuf;

/// Result of executing a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Show a message to the user (not sent to the agent)
    Message(String),
    /// Attach a file to the next submission
    Attach(PathBuf),
    /// Drop the pending attachment
    Detach,
    /// Show the execution details of the latest reply
    ShowPlan,
    /// Show the source content extracted from the latest upload
    ShowSource,
    /// Start over with a fresh conversation id
    NewConversation,
    Exit,
    Unknown(String),
}

/// Parse and execute a slash command. Returns `None` for ordinary input.
pub fn execute_command(input: &str) -> Option<CommandResult> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next().unwrap_or("").to_lowercase();
    let args = parts.next().map(str::trim).unwrap_or("");

    Some(match command.as_str() {
        "help" | "h" | "?" => CommandResult::Message(help_message()),
        "attach" | "a" => AttachCommand::execute(args),
        "detach" | "d" => CommandResult::Detach,
        "plan" | "p" => CommandResult::ShowPlan,
        "source" | "s" => CommandResult::ShowSource,
        "new" | "n" | "clear" => CommandResult::NewConversation,
        "quit" | "exit" | "q" => CommandResult::Exit,
        _ => CommandResult::Unknown(command),
    })
}

fn help_message() -> String {
    r#"Available commands:
  /help, /h, /?         Show this help message
  /attach, /a <path>    Attach a file to the next message (jpg, jpeg, png, pdf, mp3, wav, m4a)
  /detach, /d           Remove the pending attachment
  /plan, /p             Show the plan and logs of the latest reply
  /source, /s           Show content extracted from the latest upload
  /new, /n              Start a new conversation
  /quit, /exit, /q      Exit agnt

Keys (TUI):
  Tab / Ctrl+P                      Show or hide the execution panel
  Ctrl+S                            Show or hide the source content
  Ctrl+Up/Down, Shift+PgUp/PgDn     Scroll the execution panel

Examples:
  /attach ~/Documents/report.pdf
  summarize this        (sends the attached file with your text)"#
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert_eq!(execute_command("summarize this"), None);
        assert_eq!(execute_command(""), None);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(execute_command("/q"), Some(CommandResult::Exit));
        assert_eq!(execute_command("  /PLAN "), Some(CommandResult::ShowPlan));
        assert_eq!(execute_command("/new"), Some(CommandResult::NewConversation));
        assert_eq!(execute_command("/detach"), Some(CommandResult::Detach));
        assert_eq!(execute_command("/source"), Some(CommandResult::ShowSource));
    }

    #[test]
    fn test_help_lists_commands() {
        match execute_command("/help") {
            Some(CommandResult::Message(text)) => {
                for cmd in ["/attach", "/detach", "/plan", "/source", "/new", "/quit"] {
                    assert!(text.contains(cmd), "missing {}", cmd);
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            execute_command("/frobnicate now"),
            Some(CommandResult::Unknown("frobnicate".into()))
        );
    }
}
