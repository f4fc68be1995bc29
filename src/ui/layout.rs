// src/ui/layout.rs

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Defines the areas of the application's user interface.
///
/// The tab bar sits on top, the active tab's body in the middle, the activity
/// log under it and a one-line footer at the bottom.
pub struct AppLayout {
    pub tabs: Rect,
    pub body: Rect,
    pub log_panel: Rect,
    pub footer: Rect,
}

/// Areas inside the body of a scanner tab.
pub struct ScannerLayout {
    pub input: Rect,
    pub options: Rect,
    pub progress: Rect,
    pub results: Rect,
}

/// Creates the complete application layout.
///
/// # Arguments
/// * `frame_size` - The `Rect` representing the total size of the terminal frame.
///
/// # Returns
/// An `AppLayout` struct containing the calculated `Rect` for each widget area.
pub fn create_layout(frame_size: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(frame_size);

    AppLayout {
        tabs: chunks[0],
        body: chunks[1],
        log_panel: chunks[2],
        footer: chunks[3],
    }
}

pub fn scanner_layout(body: Rect) -> ScannerLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(body);

    ScannerLayout {
        input: chunks[0],
        options: chunks[1],
        progress: chunks[2],
        results: chunks[3],
    }
}

/// Splits the settings body into the scanner list and the edit form.
pub fn settings_layout(body: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(body);
    (chunks[0], chunks[1])
}

/// Creates a centered rectangle for a popup, sized as a percentage of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
