// src/ui/widgets/progress.rs

use crate::app::{App, PanelState};
use crate::core::models::{ScanResult, ScannerType};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge},
};

/// Renders the progress gauge of a scanner tab.
///
/// The value is cosmetic: it creeps up on the UI tick while the scan runs
/// and only jumps to 100 when the result arrives.
pub fn render_progress(frame: &mut Frame, app: &App, scanner_type: ScannerType, area: Rect) {
    let panel = app.panel(scanner_type);
    let (label, color) = match (&panel.state, &panel.result) {
        (PanelState::Idle, _) => ("Ready".to_string(), Color::DarkGray),
        (PanelState::Scanning, _) => (format!("Scanning... {}%", panel.progress), Color::Cyan),
        (PanelState::Finished, Some(ScanResult::Failure { .. })) => ("Failed".to_string(), Color::Red),
        (PanelState::Finished, _) => ("Complete".to_string(), Color::Green),
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(color))
        .percent(panel.progress.min(100))
        .label(label);
    frame.render_widget(gauge, area);
}
