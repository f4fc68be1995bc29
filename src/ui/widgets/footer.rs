// src/ui/widgets/footer.rs

use crate::app::{App, PanelState, Tab};
use crate::core::models::ScannerType;
use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

fn key(label: &'static str) -> Span<'static> {
    Span::styled(label, Style::new().bold().fg(Color::Yellow))
}

/// Renders the footer widget, which displays available actions.
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![key("Tab"), Span::raw(" switch, ")];
    match app.current_tab() {
        Tab::Scanner(scanner_type) => {
            if app.panel(scanner_type).state == PanelState::Scanning {
                spans.push(Span::raw("scan in progress, "));
            } else {
                spans.extend([key("Enter"), Span::raw(" scan, "), key("F4"), Span::raw(" option, ")]);
                if scanner_type == ScannerType::Port {
                    spans.extend([key("F5"), Span::raw(" IDS, ")]);
                }
                if app.panel(scanner_type).option_text().is_some() {
                    spans.extend([key("F6"), Span::raw(" edit field, ")]);
                }
            }
            if scanner_type == ScannerType::Traffic && app.has_backend {
                spans.extend([key("F2"), Span::raw(" interfaces, ")]);
                if app.panel(scanner_type).capture_id().is_some() {
                    spans.extend([key("F3"), Span::raw(" save capture, ")]);
                }
            }
        }
        Tab::Settings => {
            spans.extend([key("Enter"), Span::raw(" save, "), key("Ctrl+D"), Span::raw(" clear, ")]);
            spans.extend([key("Ctrl+T"), Span::raw(" test, ")]);
        }
    }
    spans.extend([key("Esc"), Span::raw(" quit.")]);

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}
