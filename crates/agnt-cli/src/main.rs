//! agnt - terminal front-end for the task agent

mod commands;
mod config;
mod ui;
mod utils;

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use agnt_api::{AgentClient, Attachment, HttpAgentClient};
use agnt_core::{ExecutionView, FAILURE_TEXT, Session, UserInput};
use agnt_tui::Theme;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// agnt - chat with the task agent
#[derive(Parser, Debug)]
#[command(name = "agnt")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run a single turn with this text and exit
    #[arg(short = 'c', long)]
    command: Option<String>,

    /// File to attach to the single turn
    #[arg(short = 'f', long, requires = "command")]
    file: Option<PathBuf>,

    /// Print the raw agent response as JSON (with --command)
    #[arg(long, requires = "command")]
    json: bool,

    /// Agent service base URL (default: http://localhost:8000)
    #[arg(long)]
    base_url: Option<String>,

    /// Disable TUI mode (use simple stdin/stdout)
    #[arg(long)]
    no_tui: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Initialize config file
    #[arg(long)]
    init_config: bool,

    /// Check that the agent service is reachable and exit
    #[arg(long)]
    health: bool,
}

fn init_tracing(args: &Args, use_tui: bool) -> anyhow::Result<()> {
    let filter = if args.verbose {
        EnvFilter::new("agnt=debug")
    } else {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) if args.log_file.is_some() => EnvFilter::new("agnt=info"),
            Err(_) => return Ok(()),
        }
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    } else if !use_tui {
        // The TUI owns the terminal; without a log file its logs are dropped
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.init_config {
        match config::Config::init() {
            Ok(path) => {
                println!("Config file created at: {}", path.display());
                println!("\nExample config:\n{}", config::example_config());
            }
            Err(e) => {
                eprintln!("Error creating config: {}", e);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let cfg = config::Config::load();
    let use_tui = !args.no_tui && args.command.is_none() && !args.health && cfg.tui.unwrap_or(true);
    init_tracing(&args, use_tui)?;

    let base_url = cfg.base_url(args.base_url.as_deref());
    let client = match cfg.timeout() {
        Some(timeout) => HttpAgentClient::with_timeout(&base_url, timeout)?,
        None => HttpAgentClient::new(&base_url)?,
    };
    tracing::debug!(base_url = %client.base_url(), "Agent client ready");
    let client: Arc<dyn AgentClient> = Arc::new(client);

    if args.health {
        return check_health(client.as_ref(), &base_url).await;
    }

    let mut session = Session::new(client);

    if let Some(text) = args.command {
        return run_command(&mut session, text, args.file, args.json).await;
    }

    if use_tui {
        let theme = cfg
            .theme
            .as_deref()
            .and_then(Theme::by_name)
            .unwrap_or_default();
        return ui::run_tui(&mut session, theme).await;
    }

    run_interactive(&mut session).await
}

async fn check_health(client: &dyn AgentClient, base_url: &str) -> anyhow::Result<()> {
    match client.health().await {
        Ok(health) if health.is_ok() => {
            match health.app {
                Some(app) => println!("{}: ok ({})", base_url, app),
                None => println!("{}: ok", base_url),
            }
            Ok(())
        }
        Ok(health) => {
            eprintln!("{}: unhealthy (status: {})", base_url, health.status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: unreachable ({})", base_url, e);
            std::process::exit(1);
        }
    }
}

async fn run_command(
    session: &mut Session,
    text: String,
    file: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let mut input = UserInput::text(text);
    if let Some(path) = file {
        input = input.with_file(Attachment::from_path(&path).await?);
    }

    let Some(id) = session.send(input).await? else {
        anyhow::bail!("Nothing to send: provide text or a file");
    };
    let Some(msg) = session.messages().iter().find(|m| m.id == id) else {
        anyhow::bail!("Reply missing from conversation history");
    };

    let Some(response) = &msg.response else {
        eprintln!("{}", FAILURE_TEXT);
        std::process::exit(1);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
        return Ok(());
    }

    println!("{}", utils::reply_text(msg));
    let view = ExecutionView::from_response(response);
    if view.has_plan() || view.has_logs() {
        println!();
        println!("{}", utils::plan_summary(&view));
    }
    Ok(())
}

async fn run_interactive(session: &mut Session) -> anyhow::Result<()> {
    use commands::{CommandResult, execute_command};
    use std::io::{self, Write};

    if std::io::IsTerminal::is_terminal(&std::io::stderr()) {
        eprintln!("agnt session: {}", session.conversation().id());
        eprintln!("Type /help for commands.");
        eprintln!();
    }

    let mut attachment: Option<Attachment> = None;

    loop {
        match &attachment {
            Some(file) => print!("[{}] > ", file.file_name),
            None => print!("> "),
        }
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if let Some(result) = execute_command(line) {
            match result {
                CommandResult::Message(msg) => println!("{}", msg),
                CommandResult::Attach(path) => match Attachment::from_path(&path).await {
                    Ok(file) => {
                        println!("Attached {} ({} bytes)", file.file_name, file.len());
                        attachment = Some(file);
                    }
                    Err(e) => println!("Could not attach {}: {}", path.display(), e),
                },
                CommandResult::Detach => {
                    attachment = None;
                    println!("Attachment removed.");
                }
                CommandResult::ShowPlan => match session.conversation().latest_response() {
                    Some(response) => {
                        println!("{}", utils::plan_summary(&ExecutionView::from_response(response)))
                    }
                    None => println!("No execution details yet."),
                },
                CommandResult::ShowSource => {
                    let source = session
                        .conversation()
                        .latest_response()
                        .and_then(|r| r.extracted_text.as_deref())
                        .filter(|t| !t.trim().is_empty());
                    match source {
                        Some(text) => println!("{}", text),
                        None => println!("No source content available."),
                    }
                }
                CommandResult::NewConversation => {
                    let id = session.new_conversation()?;
                    attachment = None;
                    println!("Started conversation {}", id);
                }
                CommandResult::Exit => break,
                CommandResult::Unknown(cmd) => {
                    println!("Unknown command: /{}", cmd);
                    println!("Type /help for available commands.");
                }
            }
            continue;
        }

        let input = UserInput {
            text: Some(line.to_string()),
            file: attachment.take(),
        };
        if input.is_empty() {
            continue;
        }

        let Some(id) = session.send(input).await? else {
            continue;
        };
        if let Some(msg) = session.messages().iter().find(|m| m.id == id) {
            println!("{}", utils::reply_text(msg));
            if let Some(response) = &msg.response {
                let view = ExecutionView::from_response(response);
                if view.has_plan() {
                    let done = view.count(agnt_api::StepStatus::Completed);
                    println!("[{}/{} steps completed, /plan for details]", done, view.steps.len());
                }
            }
        }
        println!();
    }

    Ok(())
}
