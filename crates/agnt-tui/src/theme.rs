//! Color theme support

use agnt_api::StepStatus;
use ratatui::style::{Color, Modifier, Style};

/// Color theme for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background color
    pub bg: Color,
    /// Primary text color
    pub fg: Color,
    /// Dimmed/secondary text
    pub dim: Color,
    /// Accent color (highlights, prompts)
    pub accent: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    /// Steps that are executing
    pub running: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme (default)
    pub fn dark() -> Self {
        Self {
            bg: Color::Reset,
            fg: Color::White,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Yellow,
            running: Color::LightBlue,
            border: Color::DarkGray,
        }
    }

    /// Light theme
    pub fn light() -> Self {
        Self {
            bg: Color::White,
            fg: Color::Black,
            dim: Color::Gray,
            accent: Color::Blue,
            error: Color::Red,
            success: Color::Green,
            warning: Color::Rgb(180, 120, 0),
            running: Color::Rgb(0, 90, 200),
            border: Color::Gray,
        }
    }

    /// Look up a theme by its config name
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "dark" => Some(Self::dark()),
            "light" => Some(Self::light()),
            _ => None,
        }
    }

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn dim_style(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn accent_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn accent_bold(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for a reconciled step status
    pub fn status_style(&self, status: StepStatus) -> Style {
        match status {
            StepStatus::Completed => self.success_style(),
            StepStatus::Failed => self.error_style(),
            StepStatus::Running => Style::default()
                .fg(self.running)
                .add_modifier(Modifier::BOLD),
            StepStatus::Pending => self.dim_style(),
        }
    }
}

/// Glyph shown next to a step in each status
pub fn status_icon(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Completed => "✔",
        StepStatus::Failed => "✘",
        StepStatus::Running => "◐",
        StepStatus::Pending => "○",
    }
}
