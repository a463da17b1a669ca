//! Execution panel: reconciled plan, raw logs, cost, and source content

use agnt_core::ExecutionView;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::theme::{Theme, status_icon};

/// Format a millisecond duration for display
pub fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{:.0}ms", ms)
    } else {
        format!("{:.1}s", ms / 1000.0)
    }
}

/// Format an estimated cost for display
pub fn format_cost(usd: f64) -> String {
    format!("{:.4} USD", usd)
}

/// Side panel describing how the agent handled the latest turn
pub struct PlanPanel<'a> {
    view: Option<&'a ExecutionView<'a>>,
    theme: &'a Theme,
    show_source: bool,
    scroll: usize,
}

impl<'a> PlanPanel<'a> {
    pub fn new(view: Option<&'a ExecutionView<'a>>, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            show_source: false,
            scroll: 0,
        }
    }

    /// Append the extracted source text below the logs
    pub fn show_source(mut self, show: bool) -> Self {
        self.show_source = show;
        self
    }

    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn block(&self) -> Block<'static> {
        Block::default()
            .borders(Borders::LEFT)
            .border_style(self.theme.border_style())
            .title(Span::styled(" Execution ", self.theme.accent_bold()))
    }

    /// Largest scroll offset that still fills `area`
    pub fn max_scroll(&self, area: Rect) -> usize {
        let inner = self.block().inner(area);
        self.lines(inner.width as usize)
            .len()
            .saturating_sub(inner.height as usize)
    }

    fn heading(&self, text: &'static str) -> Line<'static> {
        Line::from(Span::styled(
            text,
            self.theme.accent_bold().add_modifier(Modifier::UNDERLINED),
        ))
    }

    fn wrapped(&self, lines: &mut Vec<Line<'static>>, text: &str, indent: &str, width: usize) {
        let width = width.saturating_sub(indent.len()).max(1);
        for line in textwrap::wrap(text, width) {
            lines.push(Line::from(Span::styled(
                format!("{}{}", indent, line),
                self.theme.dim_style(),
            )));
        }
    }

    /// Panel contents at the given inner width
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        let Some(view) = self.view else {
            return vec![Line::from(Span::styled(
                "No execution details yet",
                self.theme.dim_style(),
            ))];
        };

        let mut lines = vec![self.heading("Plan")];
        if view.has_plan() {
            for step in &view.steps {
                let style = self.theme.status_style(step.status);
                lines.push(Line::from(vec![
                    Span::styled(format!("{} ", status_icon(step.status)), style),
                    Span::styled(step.step.name.clone(), style.add_modifier(Modifier::BOLD)),
                    Span::styled(format!(" ({})", step.status), self.theme.dim_style()),
                ]));
                if !step.step.description.is_empty() {
                    self.wrapped(&mut lines, &step.step.description, "  ", width);
                }
            }
        } else {
            lines.push(Line::from(Span::styled(
                "No plan steps available",
                self.theme.dim_style(),
            )));
        }

        lines.push(Line::from(""));
        lines.push(self.heading("Logs"));
        if view.has_logs() {
            for log in view.logs {
                let status = agnt_core::normalize(&log.status);
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{} {}", status_icon(status), log.step_name),
                        self.theme.status_style(status),
                    ),
                    Span::styled(
                        format!("  {}", format_duration(log.duration_ms)),
                        self.theme.dim_style(),
                    ),
                ]));
                if !log.input_summary.is_empty() {
                    self.wrapped(&mut lines, &format!("in: {}", log.input_summary), "  ", width);
                }
                if !log.output_summary.is_empty() {
                    self.wrapped(&mut lines, &format!("out: {}", log.output_summary), "  ", width);
                }
            }
        } else {
            lines.push(Line::from(Span::styled(
                "No logs available",
                self.theme.dim_style(),
            )));
        }

        lines.push(Line::from(""));
        if let Some(cost) = view.cost_estimate {
            lines.push(Line::from(vec![
                Span::raw("Estimated Cost: "),
                Span::styled(format_cost(cost), self.theme.accent_bold()),
            ]));
        }
        if view.has_logs() {
            lines.push(Line::from(vec![
                Span::raw("Total Duration: "),
                Span::styled(format_duration(view.total_duration_ms), self.theme.accent_style()),
            ]));
        }

        if let Some(source) = view.extracted_text {
            lines.push(Line::from(""));
            if self.show_source {
                lines.push(self.heading("Source Content"));
                self.wrapped(&mut lines, source, "", width);
            } else {
                lines.push(Line::from(Span::styled(
                    "Source content available (Ctrl+S)",
                    self.theme.dim_style(),
                )));
            }
        }

        lines
    }
}

impl Widget for PlanPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let visible: Vec<Line> = self
            .lines(inner.width as usize)
            .into_iter()
            .skip(self.scroll)
            .take(inner.height as usize)
            .collect();
        Paragraph::new(visible).render(inner, buf);
    }
}
