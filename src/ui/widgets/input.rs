// src/ui/widgets/input.rs

use crate::app::{App, InputFocus, PanelState};
use crate::core::models::ScannerType;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the target input of a scanner tab.
pub fn render_input(frame: &mut Frame, app: &App, scanner_type: ScannerType, area: Rect) {
    let panel = app.panel(scanner_type);
    let mut input_block = Block::default().borders(Borders::ALL).title(panel.input_label());
    if panel.focus == InputFocus::Target {
        input_block = input_block.border_style(Style::default().fg(Color::Cyan));
    }
    let input_paragraph = Paragraph::new(panel.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only while the panel accepts input.
    if panel.focus == InputFocus::Target && panel.state != PanelState::Scanning && !app.show_disclaimer {
        frame.set_cursor_position(Position::new(
            area.x + panel.input.chars().count() as u16 + 1,
            area.y + 1,
        ));
    }
}

/// Renders the options box under the target input. While the option field
/// has focus the box shows just the text being edited.
pub fn render_options(frame: &mut Frame, app: &App, scanner_type: ScannerType, area: Rect) {
    let panel = app.panel(scanner_type);
    let editing = match (panel.focus, panel.option_text()) {
        (InputFocus::Option, Some(text)) => Some(text),
        _ => None,
    };
    let Some(text) = editing else {
        let block = Block::default().borders(Borders::ALL).title("Options");
        frame.render_widget(Paragraph::new(panel.options_summary()).block(block), area);
        return;
    };

    let title = match scanner_type {
        ScannerType::Traffic => "Capture filter (F6 back to target)",
        _ => "Port list (F6 back to target)",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(Paragraph::new(text).block(block).style(Style::default().fg(Color::Yellow)), area);

    if panel.state != PanelState::Scanning && !app.show_disclaimer {
        frame.set_cursor_position(Position::new(area.x + text.chars().count() as u16 + 1, area.y + 1));
    }
}
