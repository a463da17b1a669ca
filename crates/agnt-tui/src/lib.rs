//! agnt-tui: Terminal UI components
//!
//! Widgets for the agnt chat screen, built on ratatui and crossterm.

pub mod input;
pub mod theme;
pub mod widgets;

pub use theme::Theme;
