//! Animated spinner widget

use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};
use std::time::{Duration, Instant};

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Frame to show after `elapsed` time
pub fn frame_at(elapsed: Duration) -> &'static str {
    let index = (elapsed.as_millis() / FRAME_DURATION.as_millis()) as usize;
    SPINNER_FRAMES[index % SPINNER_FRAMES.len()]
}

/// Animated spinner widget
pub struct Spinner<'a> {
    label: &'a str,
    theme: &'a Theme,
    start_time: Instant,
}

impl<'a> Spinner<'a> {
    pub fn new(label: &'a str, theme: &'a Theme) -> Self {
        Self {
            label,
            theme,
            start_time: Instant::now(),
        }
    }

    /// Animate relative to `start`, so redraws continue the same cycle
    pub fn with_start_time(mut self, start: Instant) -> Self {
        self.start_time = start;
        self
    }

    /// Current frame and label as one string
    pub fn text(&self) -> String {
        format!("{} {}", frame_at(self.start_time.elapsed()), self.label)
    }
}

impl Widget for Spinner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 {
            return;
        }

        let span = Span::styled(self.text(), self.theme.warning_style());
        buf.set_span(area.x, area.y, &span, area.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_cycle() {
        assert_eq!(frame_at(Duration::ZERO), SPINNER_FRAMES[0]);
        assert_eq!(frame_at(Duration::from_millis(85)), SPINNER_FRAMES[1]);
        let full_cycle = FRAME_DURATION * SPINNER_FRAMES.len() as u32;
        assert_eq!(frame_at(full_cycle), SPINNER_FRAMES[0]);
    }

    #[test]
    fn test_render_label() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        Spinner::new("thinking...", &theme).render(area, &mut buf);

        let line: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(line.contains("thinking..."));
    }

    #[test]
    fn test_too_narrow_renders_nothing() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        Spinner::new("thinking...", &theme).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
