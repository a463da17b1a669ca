//! Prompt input with an attachment badge

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

/// Single-line prompt editor
#[derive(Debug, Default)]
pub struct InputBox {
    content: String,
    /// Cursor position in chars
    cursor: usize,
    /// Horizontal scroll offset in display columns
    scroll: usize,
    placeholder: String,
    /// Label of the file that will go with the next submission
    attachment: Option<String>,
    /// Input is locked while a request is outstanding
    busy: bool,
}

impl InputBox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Take the typed text, leaving the box empty
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        self.scroll = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.take();
    }

    pub fn set_attachment(&mut self, label: Option<String>) {
        self.attachment = label;
    }

    pub fn attachment(&self) -> Option<&str> {
        self.attachment.as_deref()
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    fn cursor_column(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.width().unwrap_or(0))
            .sum()
    }

    fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, c);
        self.cursor += 1;
    }

    /// Remove chars in `[from, to)`
    fn remove_range(&mut self, from: usize, to: usize) {
        let start = self.byte_offset(from);
        let end = self.byte_offset(to);
        self.content.drain(start..end);
    }

    /// Apply an editing action. Returns whether anything changed.
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        let len = self.char_count();
        let changed = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace if self.cursor > 0 => {
                self.remove_range(self.cursor - 1, self.cursor);
                self.cursor -= 1;
                true
            }
            Action::Delete if self.cursor < len => {
                self.remove_range(self.cursor, self.cursor + 1);
                true
            }
            Action::Left if self.cursor > 0 => {
                self.cursor -= 1;
                true
            }
            Action::Right if self.cursor < len => {
                self.cursor += 1;
                true
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = len;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut start = self.cursor;
                while start > 0 && chars[start - 1] == ' ' {
                    start -= 1;
                }
                while start > 0 && chars[start - 1] != ' ' {
                    start -= 1;
                }
                self.remove_range(start, self.cursor);
                self.cursor = start;
                true
            }
            Action::Paste(text) => {
                for c in text.chars() {
                    if c == '\n' || c == '\r' {
                        if self.cursor > 0 && !self.content.ends_with(' ') {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };
        if changed {
            self.update_scroll(width as usize);
        }
        changed
    }

    fn update_scroll(&mut self, width: usize) {
        let visible = width.saturating_sub(4).max(1);
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if column >= self.scroll + visible {
            self.scroll = column + 1 - visible;
        }
    }

    /// Visible slice of the content given the scroll offset
    fn visible_text(&self, width: usize) -> String {
        let mut skipped = 0;
        let mut used = 0;
        let mut out = String::new();
        for c in self.content.chars() {
            let w = c.width().unwrap_or(0);
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if used + w > width {
                break;
            }
            out.push(c);
            used += w;
        }
        out
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.busy {
                theme.border_style()
            } else {
                theme.accent_style()
            });
        if let Some(label) = &self.attachment {
            block = block.title(Span::styled(format!(" 📎 {} ", label), theme.accent_style()));
        }

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let line = if self.busy {
            Line::from(Span::styled("Waiting for the agent...", theme.dim_style()))
        } else if self.content.is_empty() {
            Line::from(Span::styled(self.placeholder.clone(), theme.dim_style()))
        } else {
            Line::from(Span::styled(
                self.visible_text(inner.width as usize),
                theme.base_style(),
            ))
        };
        Paragraph::new(line).render(inner, buf);

        if !self.busy {
            let x = self.cursor_column().saturating_sub(self.scroll);
            if x < inner.width as usize {
                if let Some(cell) = buf.cell_mut((inner.x + x as u16, inner.y)) {
                    cell.set_style(Style::default().bg(theme.accent));
                }
            }
        }
    }
}
