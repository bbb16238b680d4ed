//! Common UI components shared across views.
//!
//! This module contains the header bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Render the header bar.
///
/// Displays: source, reading count, update counters from the publisher.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon_style, icon) = if app.load_error.is_some() {
        (Style::default().fg(app.theme.error), "●")
    } else if app.updates > 0 {
        (Style::default().fg(app.theme.on), "●")
    } else {
        (Style::default().add_modifier(Modifier::DIM), "○")
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", icon), icon_style),
        Span::styled("HWWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::raw(app.source_description().to_string()),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", app.display.len()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" readings │ "),
        Span::raw(format!("{} updates", app.updates)),
    ];

    if let Some(ref stats) = app.stats {
        spans.push(Span::raw(format!(" │ published {}", stats.published())));
        let dropped = stats.dropped_cycles();
        if dropped > 0 {
            spans.push(Span::raw(" │ "));
            spans.push(Span::styled(
                format!("{} dropped", dropped),
                Style::default().fg(app.theme.error),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows time since last update and the available controls.
/// Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | q:quit", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = "↑↓:select ?:help q:quit";
    let status = match app.last_update {
        Some(at) => format!(
            " Updated {:.1}s ago | {}",
            at.elapsed().as_secs_f64(),
            controls
        ),
        None => format!(" Waiting for data... | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the table.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ?           Toggle help"),
        Line::from("  q/Esc       Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 15u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
