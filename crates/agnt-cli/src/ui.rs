//! TUI implementation for agnt

use std::sync::Arc;
use std::time::Instant;

use agnt_api::{Attachment, ResponseStatus};
use agnt_core::{AttachmentRef, ConversationEvent, ExecutionView, Session, Snapshot, UserInput};
use agnt_tui::{
    Theme,
    input::{Action, event_to_action},
    widgets::{
        InputBox, MessageList, PlanPanel, Spinner, message_list::attachment_label,
    },
};
use crossterm::event::{Event, EventStream, MouseEventKind};
use futures::StreamExt;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tokio::sync::mpsc;

use crate::commands::{CommandResult, execute_command};

/// Messages sent from the UI to the session driver
#[derive(Debug)]
pub enum UiMessage {
    /// User submitted a turn
    Submit(UserInput),
    /// Slash command
    Command(String),
    Quit,
}

/// TUI application state
pub struct TuiState {
    /// Latest history snapshot from the session
    messages: Snapshot,
    input: InputBox,
    /// Scroll offset of the message list; `usize::MAX` pins to the bottom
    scroll: usize,
    panel_scroll: usize,
    is_processing: bool,
    status: String,
    theme: Theme,
    show_panel: bool,
    show_source: bool,
    /// File queued for the next submission
    attachment: Option<Attachment>,
    /// Output of the last slash command
    notice: Option<String>,
    conversation_id: String,
    ui_tx: mpsc::Sender<UiMessage>,
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(theme: Theme, conversation_id: String, ui_tx: mpsc::Sender<UiMessage>) -> Self {
        Self {
            messages: Arc::from(Vec::new()),
            input: InputBox::new().with_placeholder("Ask the agent, or /help for commands"),
            scroll: 0,
            panel_scroll: 0,
            is_processing: false,
            status: "Ready".to_string(),
            theme,
            show_panel: true,
            show_source: false,
            attachment: None,
            notice: None,
            conversation_id,
            ui_tx,
            spinner_start: Instant::now(),
        }
    }

    fn scroll_to_bottom(&mut self) {
        // Clamped during render
        self.scroll = usize::MAX;
    }

    pub fn show_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    pub fn set_attachment(&mut self, file: Option<Attachment>) {
        self.input
            .set_attachment(file.as_ref().map(|f| attachment_label(&AttachmentRef::from(f))));
        self.attachment = file;
    }

    /// Apply a conversation event from the session
    pub fn handle_conversation_event(&mut self, event: ConversationEvent) {
        match event {
            ConversationEvent::Submitted { messages, .. } => {
                self.messages = messages;
                self.is_processing = true;
                self.status = "Thinking...".to_string();
            }
            ConversationEvent::Resolved {
                messages, status, ..
            } => {
                self.messages = messages;
                self.is_processing = false;
                self.panel_scroll = 0;
                self.status = match status {
                    ResponseStatus::Success => "Done",
                    ResponseStatus::Error => "Agent reported an error",
                    ResponseStatus::NeedsClarification => "Waiting for your answer",
                }
                .to_string();
            }
            ConversationEvent::Failed { messages, .. } => {
                self.messages = messages;
                self.is_processing = false;
                self.status = "Request failed".to_string();
            }
            ConversationEvent::Reset { conversation_id } => {
                self.messages = Arc::from(Vec::new());
                self.conversation_id = conversation_id.to_string();
                self.show_source = false;
                self.panel_scroll = 0;
                self.status = "New conversation".to_string();
            }
        }
        self.scroll_to_bottom();
    }

    /// Handle a keyboard action. Returns false when the app should exit.
    pub async fn handle_action(&mut self, action: Action, width: u16) -> bool {
        match action {
            Action::Submit => {
                if self.is_processing {
                    return true;
                }
                let content = self.input.content().to_string();
                if content.trim_start().starts_with('/') {
                    self.input.clear();
                    let _ = self.ui_tx.send(UiMessage::Command(content)).await;
                    return true;
                }

                let text = (!content.trim().is_empty()).then_some(content);
                if text.is_none() && self.attachment.is_none() {
                    return true;
                }
                self.input.clear();
                let file = self.attachment.take();
                self.input.set_attachment(None);
                self.notice = None;
                let _ = self
                    .ui_tx
                    .send(UiMessage::Submit(UserInput { text, file }))
                    .await;
                true
            }
            Action::Interrupt | Action::Eof => {
                let _ = self.ui_tx.send(UiMessage::Quit).await;
                false
            }
            Action::Escape => {
                if self.notice.is_some() {
                    self.notice = None;
                } else if self.attachment.is_some() {
                    self.set_attachment(None);
                }
                true
            }
            Action::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                true
            }
            Action::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                true
            }
            Action::PanelUp => {
                self.panel_scroll = self.panel_scroll.saturating_sub(10);
                true
            }
            Action::PanelDown => {
                self.panel_scroll = self.panel_scroll.saturating_add(10);
                true
            }
            Action::TogglePanel => {
                self.show_panel = !self.show_panel;
                true
            }
            Action::ToggleSource => {
                self.show_source = !self.show_source;
                self.show_panel = true;
                true
            }
            _ => {
                self.input.handle_action(&action, width);
                true
            }
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();
        let notice_height = self
            .notice
            .as_ref()
            .map(|n| (n.lines().count() as u16 + 2).min(size.height / 2))
            .unwrap_or(0);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(notice_height),
                Constraint::Length(1),
                Constraint::Length(3),
            ])
            .split(size);

        if self.show_panel {
            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
                .split(chunks[0]);
            self.render_messages(frame, main[0]);
            self.render_panel(frame, main[1]);
        } else {
            self.render_messages(frame, chunks[0]);
        }

        if let Some(notice) = &self.notice {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(self.theme.border_style())
                .title(Span::styled(" Esc to dismiss ", self.theme.dim_style()));
            let paragraph = Paragraph::new(notice.as_str())
                .block(block)
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, chunks[1]);
        }

        self.render_status(frame, chunks[2]);

        self.input.set_busy(self.is_processing);
        self.input.render(chunks[3], frame.buffer_mut(), &self.theme);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect) {
        if self.messages.is_empty() {
            let hint = Paragraph::new(vec![
                Line::from(Span::styled("agnt", self.theme.accent_bold())),
                Line::from(Span::styled(
                    "Ask for a summary, a sentiment read, or a code explanation.",
                    self.theme.dim_style(),
                )),
                Line::from(Span::styled(
                    "Attach a file with /attach <path>. Type /help for more.",
                    self.theme.dim_style(),
                )),
            ]);
            frame.render_widget(hint, area);
            return;
        }

        let messages = Arc::clone(&self.messages);
        let list = MessageList::new(&messages, &self.theme).spinner_start(self.spinner_start);
        let total = list.lines(area.width as usize).len();
        let max_scroll = total.saturating_sub(area.height as usize);
        self.scroll = self.scroll.min(max_scroll);

        frame.render_widget(list.scroll(self.scroll), area);
    }

    fn render_panel(&mut self, frame: &mut Frame, area: Rect) {
        let messages = Arc::clone(&self.messages);
        let view = messages
            .iter()
            .rev()
            .filter(|m| m.is_agent())
            .find_map(|m| m.response.as_ref())
            .map(ExecutionView::from_response);

        let panel = PlanPanel::new(view.as_ref(), &self.theme).show_source(self.show_source);
        self.panel_scroll = self.panel_scroll.min(panel.max_scroll(area));
        frame.render_widget(panel.scroll(self.panel_scroll), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        if self.is_processing {
            let spinner =
                Spinner::new(&self.status, &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let short_id: String = self.conversation_id.chars().take(8).collect();
        let left_content = format!("{} │ {}", short_id, self.status);
        let right_content = "Tab: panel │ Ctrl+S: source │ Ctrl+C: quit";

        let left_width = left_content.chars().count();
        let right_width = right_content.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left_content, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right_content, self.theme.dim_style()),
            ])
        } else {
            Line::from(Span::styled(left_content, self.theme.dim_style()))
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Run the TUI application
pub async fn run_tui(session: &mut Session, theme: Theme) -> anyhow::Result<()> {
    use crossterm::{
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    };
    use ratatui::{Terminal, backend::CrosstermBackend};
    use std::io;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (ui_tx, mut ui_rx) = mpsc::channel::<UiMessage>(32);
    let mut state = TuiState::new(theme, session.conversation().id().to_string(), ui_tx);
    let mut conv_rx = session.subscribe();
    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(std::time::Duration::from_millis(80));

    // Turn waiting to be dispatched at the top of the next iteration
    let mut pending: Option<UserInput> = None;

    let result: anyhow::Result<()> = 'outer: loop {
        if let Some(input) = pending.take() {
            state.is_processing = true;
            state.spinner_start = Instant::now();
            state.status = "Thinking...".to_string();

            {
                let mut send_future = std::pin::pin!(session.send(input));

                loop {
                    terminal.draw(|frame| state.render(frame))?;
                    let area_width = terminal.size()?.width;

                    tokio::select! {
                        biased;

                        result = &mut send_future => {
                            if let Err(e) = result {
                                state.show_notice(e.to_string());
                            }
                            break;
                        }

                        event = conv_rx.recv() => {
                            if let Ok(event) = event {
                                state.handle_conversation_event(event);
                            }
                        }

                        // Input stays live while the agent works; Submit is ignored
                        event = event_stream.next() => {
                            match event {
                                Some(Ok(Event::Mouse(mouse))) => scroll_with_mouse(&mut state, mouse.kind),
                                Some(Ok(event)) => {
                                    if let Some(action) = event_to_action(event) {
                                        if !state.handle_action(action, area_width).await {
                                            break 'outer Ok(());
                                        }
                                    }
                                }
                                Some(Err(e)) => break 'outer Err(anyhow::anyhow!("Event error: {}", e)),
                                None => break 'outer Ok(()),
                            }
                        }

                        _ = tick_interval.tick() => {}
                    }
                }
            }

            while let Ok(event) = conv_rx.try_recv() {
                state.handle_conversation_event(event);
            }
            state.messages = session.conversation().snapshot();
            state.is_processing = session.is_busy();
            continue;
        }

        terminal.draw(|frame| state.render(frame))?;
        let area_width = terminal.size()?.width;

        tokio::select! {
            biased;

            event = conv_rx.recv() => {
                if let Ok(event) = event {
                    state.handle_conversation_event(event);
                }
            }

            event = event_stream.next() => {
                match event {
                    Some(Ok(Event::Mouse(mouse))) => scroll_with_mouse(&mut state, mouse.kind),
                    Some(Ok(event)) => {
                        if let Some(action) = event_to_action(event) {
                            if !state.handle_action(action, area_width).await {
                                break Ok(());
                            }
                        }
                    }
                    Some(Err(e)) => break Err(anyhow::anyhow!("Event error: {}", e)),
                    None => break Ok(()),
                }
            }

            _ = tick_interval.tick() => {}

            msg = ui_rx.recv() => {
                match msg {
                    Some(UiMessage::Submit(input)) => {
                        pending = Some(input);
                    }
                    Some(UiMessage::Command(cmd)) => {
                        let Some(result) = execute_command(&cmd) else {
                            continue;
                        };
                        match result {
                            CommandResult::Message(msg) => state.show_notice(msg),
                            CommandResult::Attach(path) => match Attachment::from_path(&path).await {
                                Ok(file) => {
                                    state.show_notice(format!("Attached {}", file.file_name));
                                    state.set_attachment(Some(file));
                                }
                                Err(e) => {
                                    state.show_notice(format!("Could not attach {}: {}", path.display(), e));
                                }
                            },
                            CommandResult::Detach => {
                                state.set_attachment(None);
                                state.notice = None;
                            }
                            CommandResult::ShowPlan => {
                                state.show_panel = true;
                            }
                            CommandResult::ShowSource => {
                                state.show_panel = true;
                                state.show_source = true;
                            }
                            CommandResult::NewConversation => {
                                if let Err(e) = session.new_conversation() {
                                    state.show_notice(e.to_string());
                                }
                            }
                            CommandResult::Exit => break Ok(()),
                            CommandResult::Unknown(cmd) => {
                                state.show_notice(format!(
                                    "Unknown command: /{}\nType /help for available commands.",
                                    cmd
                                ));
                            }
                        }
                    }
                    Some(UiMessage::Quit) | None => break Ok(()),
                }
            }
        }
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn scroll_with_mouse(state: &mut TuiState, kind: MouseEventKind) {
    match kind {
        MouseEventKind::ScrollUp => state.scroll = state.scroll.saturating_sub(3),
        MouseEventKind::ScrollDown => state.scroll = state.scroll.saturating_add(3),
        _ => {}
    }
}
