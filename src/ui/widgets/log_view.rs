// src/ui/widgets/log_view.rs

use crate::app::{App, NoticeLevel};
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Renders the activity panel.
///
/// Shows the most recent notices with a gray timestamp, newest at the bottom.
/// Whatever does not fit in the panel is dropped from the top.
///
/// # Arguments
///
/// * `frame` - The mutable frame to render onto.
/// * `app` - The application state holding the notices.
/// * `area` - The `Rect` in which to render this widget.
pub fn render_log_view(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("Activity").borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner_area.height as usize;
    let start = app.notices.len().saturating_sub(visible);
    let lines: Vec<Line> = app.notices[start..]
        .iter()
        .map(|notice| {
            let style = match notice.level {
                NoticeLevel::Info => Style::default(),
                NoticeLevel::Success => Style::default().fg(Color::Green),
                NoticeLevel::Error => Style::default().fg(Color::Red),
            };
            Line::from(vec![
                Span::styled(notice.at.format("%Y-%m-%d %H:%M:%S ").to_string(), Style::default().fg(Color::DarkGray)),
                Span::styled(notice.text.clone(), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner_area);
}
