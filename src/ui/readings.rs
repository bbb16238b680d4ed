//! Readings table rendering.
//!
//! One row per item in the [`DisplayCollection`](crate::data::DisplayCollection),
//! in insertion order: name, kind, formatted value.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::Text,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::format_value;

/// Label shown for readings parsed from a single-token line.
const UNNAMED: &str = "(unnamed)";

/// Render the readings table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items = app.display.items();

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Kind"),
        Cell::from(Text::from("Value").alignment(Alignment::Right)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = items
        .iter()
        .map(|reading| {
            let name = if reading.name().is_empty() {
                Cell::from(UNNAMED).style(Style::default().fg(app.theme.border))
            } else {
                Cell::from(reading.name().to_string())
            };

            let value = Text::from(format_value(reading.value()));
            let value = if reading.kind().is_numeric() {
                value.alignment(Alignment::Right)
            } else {
                value
            };

            Row::new(vec![
                name,
                Cell::from(reading.kind().label()).style(app.theme.kind_style(reading.kind())),
                Cell::from(value).style(app.theme.value_style(reading.value())),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(2), // Name
        Constraint::Length(6), // Kind
        Constraint::Fill(3), // Value
    ];

    let selected = app.selected_index.min(items.len().saturating_sub(1));

    let position_info = if !items.is_empty() {
        format!(" [{}/{}]", selected + 1, items.len())
    } else {
        String::new()
    };
    let title = format!(" Readings ({}){} ", items.len(), position_info);

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if !items.is_empty() {
        state.select(Some(selected));
    }

    frame.render_stateful_widget(table, area, &mut state);
}
