// src/ui/widgets/tabs.rs

use crate::app::{App, PanelState, SPINNER_CHARS, Tab};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Tabs},
};

/// Renders the tab bar. A running scan shows a spinner next to its tab title.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = app
        .tabs
        .iter()
        .map(|tab| match tab {
            Tab::Scanner(scanner_type) if app.panel(*scanner_type).state == PanelState::Scanning => {
                Line::from(vec![
                    Span::styled(format!("{} ", SPINNER_CHARS[app.spinner_frame]), Style::default().fg(Color::Cyan)),
                    Span::raw(tab.title()),
                ])
            }
            _ => Line::from(tab.title()),
        })
        .collect();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title("Vanguard RS Dashboard"))
        .select(app.tab_index)
        .highlight_style(Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .divider("|");
    frame.render_widget(tabs, area);
}
