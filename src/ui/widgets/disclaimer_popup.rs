// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders the authorization notice on top of the dashboard.
///
/// Shown once at startup; any scan is blocked until it is acknowledged.
/// `Clear` wipes the popup area first so the panels underneath do not bleed through.
///
/// # Arguments
/// * `frame` - A mutable reference to the `Frame` used for rendering the TUI.
/// * `popup_area` - The already centered `Rect` the popup occupies.
pub fn render_disclaimer_popup(frame: &mut Frame, popup_area: Rect) {
    let text = Text::from(vec![
        Line::from("AUTHORIZED USE ONLY".bold().yellow()),
        Line::from(""),
        Line::from("Vanguard RS Dashboard sends scan requests for the targets you enter to third-party security APIs and, when configured, to a local scanning backend."),
        Line::from(""),
        Line::from("Only scan networks, hosts and applications you own or have written permission to test. Unauthorized scanning may be a criminal offense."),
        Line::from(""),
        Line::from("API keys are stored unencrypted in the application data directory."),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to acknowledge and continue".bold()),
    ]);

    let block = Block::default()
        .title("Disclaimer")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}
