//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::model::{ReadingKind, ReadingValue};

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for `true` booleans.
    pub on: Color,
    /// Color for `false` booleans.
    pub off: Color,
    /// Color for numeric values.
    pub number: Color,
    /// Color for text values.
    pub text: Color,
    /// Color for errors in the status bar.
    pub error: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            on: Color::Green,
            off: Color::DarkGray,
            number: Color::White,
            text: Color::Yellow,
            error: Color::Red,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            on: Color::Green,
            off: Color::Gray,
            number: Color::Black,
            text: Color::Magenta,
            error: Color::Red,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for a value cell.
    pub fn value_style(&self, value: &ReadingValue) -> Style {
        match value {
            ReadingValue::Bool(true) => Style::default().fg(self.on).add_modifier(Modifier::BOLD),
            ReadingValue::Bool(false) => Style::default().fg(self.off),
            ReadingValue::Int(_) | ReadingValue::Float(_) => Style::default().fg(self.number),
            ReadingValue::Text(_) => Style::default().fg(self.text),
        }
    }

    /// Style for the kind column.
    pub fn kind_style(&self, kind: ReadingKind) -> Style {
        match kind {
            ReadingKind::Bool => Style::default().fg(self.on),
            ReadingKind::Int | ReadingKind::Float => Style::default().fg(self.highlight),
            ReadingKind::String => Style::default().fg(self.text),
        }
        .add_modifier(Modifier::DIM)
    }
}
