//! Message list widget for displaying the conversation

use std::time::Instant;

use agnt_core::{AttachmentRef, Message, Reply, Role};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::Theme;
use crate::widgets::spinner::frame_at;

/// Widget for displaying a list of chat messages
pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    scroll: usize,
    spinner_start: Instant,
}

impl<'a> MessageList<'a> {
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
            spinner_start: Instant::now(),
        }
    }

    /// Set scroll offset, in lines from the top
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn spinner_start(mut self, start: Instant) -> Self {
        self.spinner_start = start;
        self
    }

    /// All lines for the conversation at the given width
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        self.messages
            .iter()
            .flat_map(|msg| self.render_message(msg, width))
            .collect()
    }

    fn render_message(&self, msg: &Message, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let clarifying = msg.response.as_ref().is_some_and(|r| r.needs_clarification());

        let header = match msg.role {
            Role::User => Span::styled("▶ You", self.theme.accent_bold()),
            Role::Agent if clarifying => Span::styled(
                "◀ Agent · needs clarification",
                self.theme.warning_style().add_modifier(Modifier::BOLD),
            ),
            Role::Agent => Span::styled(
                "◀ Agent",
                self.theme.success_style().add_modifier(Modifier::BOLD),
            ),
        };
        let mut header = vec![header];
        if let Some(task_type) = msg.response.as_ref().and_then(|r| r.task_type.as_deref()) {
            header.push(Span::styled(format!("  [{}]", task_type), self.theme.dim_style()));
        }
        lines.push(Line::from(header));

        if let Some(file) = &msg.file {
            lines.push(Line::from(Span::styled(
                format!("  📎 {}", attachment_label(file)),
                self.theme.dim_style(),
            )));
        }

        let content_width = width.saturating_sub(2).max(1);
        match msg.reply() {
            Reply::Thinking => lines.push(Line::from(Span::styled(
                format!("  {} thinking...", frame_at(self.spinner_start.elapsed())),
                self.theme.warning_style(),
            ))),
            Reply::Text(text) => {
                let style = if clarifying {
                    self.theme.warning_style()
                } else {
                    self.theme.base_style()
                };
                push_wrapped(&mut lines, text, content_width, style);
            }
            Reply::Error(error) => {
                push_wrapped(&mut lines, error, content_width, self.theme.error_style())
            }
            Reply::Output(output) => push_wrapped(
                &mut lines,
                &output.to_text(),
                content_width,
                self.theme.base_style(),
            ),
            Reply::Empty if msg.file.is_none() => lines.push(Line::from(Span::styled(
                "  (no content)",
                self.theme.dim_style(),
            ))),
            Reply::Empty => {}
        }

        lines.push(Line::from(""));
        lines
    }
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for line in textwrap::wrap(text, width) {
        lines.push(Line::from(Span::styled(format!("  {}", line), style)));
    }
}

/// "name (size)" for an attachment badge
pub fn attachment_label(file: &AttachmentRef) -> String {
    format!("{} ({})", file.file_name, format_size(file.size))
}

fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let bytes = bytes as f64;
    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < KB * KB {
        format!("{:.1} KB", bytes / KB)
    } else {
        format!("{:.1} MB", bytes / (KB * KB))
    }
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let visible: Vec<Line> = self
            .lines(area.width as usize)
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible).render(area, buf);
    }
}

/// Total rendered height of `messages` at `width`
pub fn calculate_message_height(messages: &[Message], width: usize) -> usize {
    let theme = Theme::dark();
    MessageList::new(messages, &theme).lines(width).len()
}
