// src/ui/widgets/settings.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use strum::IntoEnumIterator;

use crate::core::models::ScannerType;

/// Renders the API settings tab: scanner types with their key status on the
/// left, provider choice and key input for the selected type on the right.
pub fn render_settings(frame: &mut Frame, app: &App, list_area: Rect, form_area: Rect) {
    let items: Vec<ListItem> = ScannerType::iter()
        .map(|scanner_type| {
            let (icon, style) = if app.has_key(scanner_type) {
                ("✓", Style::default().fg(Color::Green))
            } else {
                ("✗", Style::default().fg(Color::Red))
            };
            let provider = app.stored_provider(scanner_type);
            let mut spans = vec![Span::styled(format!("{icon} "), style), Span::raw(scanner_type.title())];
            if !provider.is_empty() {
                spans.push(Span::styled(format!(" ({provider})"), Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Scanners (↑ ↓)"))
        .highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.settings.selected));
    frame.render_stateful_widget(list, list_area, &mut state);

    let form_block = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} API", app.settings.scanner_type().title()));
    let inner = form_block.inner(form_area);
    frame.render_widget(form_block, form_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    let provider = app.settings.provider();
    let provider_line = Line::from(vec![
        Span::raw("◀ "),
        Span::styled(provider.map_or("-", |p| p.name), Style::new().bold().fg(Color::Yellow)),
        Span::raw(" ▶"),
    ]);
    let provider_widget = Paragraph::new(vec![
        provider_line,
        Line::from(Span::styled(provider.map_or("", |p| p.base_url), Style::default().fg(Color::DarkGray))),
    ])
    .block(Block::default().title("Provider (← →)"));
    frame.render_widget(provider_widget, chunks[0]);

    // Keys are never echoed back.
    let masked = "•".repeat(app.settings.key_input.chars().count());
    let key_widget = Paragraph::new(masked.clone())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("API Key"));
    frame.render_widget(key_widget, chunks[1]);
    if !app.show_disclaimer {
        frame.set_cursor_position(Position::new(
            chunks[1].x + masked.chars().count() as u16 + 1,
            chunks[1].y + 1,
        ));
    }

    let scanner_type = app.settings.scanner_type();
    let stored = if app.has_key(scanner_type) {
        format!("Scans go to {}", app.stored_endpoint(scanner_type))
    } else {
        "No key stored".to_string()
    };
    frame.render_widget(
        Paragraph::new(stored).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    let help = Paragraph::new(vec![
        Line::from(vec![Span::styled("Enter", Style::new().bold().fg(Color::Yellow)), Span::raw(" save key")]),
        Line::from(vec![Span::styled("Ctrl+D", Style::new().bold().fg(Color::Yellow)), Span::raw(" remove stored key")]),
        Line::from(vec![Span::styled("Ctrl+T", Style::new().bold().fg(Color::Yellow)), Span::raw(" test key against the provider")]),
        Line::from(""),
        Line::from("Keys are stored per scanner type in the application data directory."),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(help, chunks[3]);
}
