// src/ui/widgets/results.rs

use crate::app::{App, PanelState};
use crate::core::models::{ScanPayload, ScanResult, ScannerType};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

/// Renders the result area of a scanner tab: a hint, the error, or a table
/// whose columns depend on the payload kind.
pub fn render_results(frame: &mut Frame, app: &mut App, scanner_type: ScannerType, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Results (Navigate with ↑ ↓)");
    let panel = app.panel_mut(scanner_type);

    let (payload, message) = match (&panel.state, &panel.result) {
        (PanelState::Scanning, _) => {
            let p = Paragraph::new("Scanning... Please wait.")
                .style(Style::default().fg(Color::Cyan))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(p, area);
            return;
        }
        (_, Some(ScanResult::Failure { error })) => {
            let p = Paragraph::new(Line::from(vec![
                Span::styled("Scan failed: ", Style::default().fg(Color::Red).bold()),
                Span::raw(error.clone()),
            ]))
            .wrap(Wrap { trim: true })
            .block(block);
            frame.render_widget(p, area);
            return;
        }
        (_, Some(ScanResult::Success { payload, message })) => (payload.clone(), message.clone()),
        (_, None) => {
            let p = Paragraph::new("Enter a target and press Enter to start the scan.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(p, area);
            return;
        }
    };

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let table_area = match message {
        Some(message) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(2), Constraint::Min(0)])
                .split(inner);
            let note = Paragraph::new(message)
                .style(Style::default().fg(Color::Yellow))
                .wrap(Wrap { trim: true });
            frame.render_widget(note, chunks[0]);
            chunks[1]
        }
        None => inner,
    };

    if payload.is_empty() {
        frame.render_widget(
            Paragraph::new("✓ Scan complete, nothing found.").style(Style::default().fg(Color::Green)),
            table_area,
        );
        return;
    }

    let table = build_table(&payload).row_highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    frame.render_stateful_widget(table, table_area, &mut panel.table_state);
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c))).style(Style::new().bold().underlined())
}

fn severity_style(severity: &str) -> Style {
    match severity.to_ascii_lowercase().as_str() {
        "critical" | "high" => Style::default().fg(Color::Red),
        "medium" => Style::default().fg(Color::Yellow),
        "low" => Style::default().fg(Color::Cyan),
        _ => Style::default(),
    }
}

fn build_table(payload: &ScanPayload) -> Table<'static> {
    match payload {
        ScanPayload::Devices { devices } => {
            let rows = devices.iter().map(|d| {
                let ports = d
                    .open_ports
                    .iter()
                    .map(|p| format!("{}/{}", p.port, p.service))
                    .collect::<Vec<_>>()
                    .join(", ");
                let status_style = match d.status.as_str() {
                    "Online" => Style::default().fg(Color::Green),
                    "Possible" | "Unknown" => Style::default().fg(Color::DarkGray),
                    _ => Style::default(),
                };
                Row::new(vec![
                    Cell::from(d.ip.clone()),
                    Cell::from(d.hostname.clone()),
                    Cell::from(d.status.clone()).style(status_style),
                    Cell::from(d.vendor.clone().or_else(|| d.os.clone()).unwrap_or_default()),
                    Cell::from(ports),
                ])
            });
            Table::new(
                rows.collect::<Vec<_>>(),
                [
                    Constraint::Length(16),
                    Constraint::Percentage(25),
                    Constraint::Length(9),
                    Constraint::Percentage(20),
                    Constraint::Min(10),
                ],
            )
            .header(header(&["IP", "Hostname", "Status", "Vendor / OS", "Open Ports"]))
        }
        ScanPayload::Ports { ports, ids_alerts } => {
            let mut rows: Vec<Row> = ports
                .iter()
                .map(|p| {
                    Row::new(vec![
                        Cell::from(p.port.to_string()),
                        Cell::from(p.state.clone()),
                        Cell::from(p.service.clone()),
                        Cell::from(p.version.clone().unwrap_or_default()),
                    ])
                })
                .collect();
            rows.extend(ids_alerts.iter().map(|a| {
                Row::new(vec![
                    Cell::from("IDS"),
                    Cell::from(a.severity.clone()).style(severity_style(&a.severity)),
                    Cell::from(a.kind.clone()),
                    Cell::from(format!("{} → {} {}", a.source, a.destination, a.description)),
                ])
            }));
            Table::new(
                rows,
                [Constraint::Length(6), Constraint::Length(10), Constraint::Percentage(30), Constraint::Min(10)],
            )
            .header(header(&["Port", "State", "Service", "Version"]))
        }
        ScanPayload::Vulnerabilities { vulnerabilities } => {
            let rows = vulnerabilities.iter().map(|v| {
                Row::new(vec![
                    Cell::from(v.severity.clone()).style(severity_style(&v.severity)),
                    Cell::from(v.issue.clone()),
                    Cell::from(v.cve.clone().unwrap_or_default()),
                    Cell::from(v.recommendation.clone()),
                ])
            });
            Table::new(
                rows.collect::<Vec<_>>(),
                [Constraint::Length(9), Constraint::Percentage(35), Constraint::Length(16), Constraint::Min(10)],
            )
            .header(header(&["Severity", "Issue", "CVE", "Recommendation"]))
        }
        ScanPayload::Traffic { packets, stats } => {
            let rows = packets.iter().map(|p| {
                let endpoint = |addr: &str, port: Option<u16>| match port {
                    Some(port) => format!("{addr}:{port}"),
                    None => addr.to_string(),
                };
                Row::new(vec![
                    Cell::from(p.timestamp.format("%H:%M:%S").to_string()),
                    Cell::from(p.protocol.clone()),
                    Cell::from(endpoint(&p.source, p.source_port)),
                    Cell::from(endpoint(&p.destination, p.dest_port)),
                    Cell::from(p.size.to_string()),
                    Cell::from(p.info.clone()),
                ])
            });
            let title = format!(
                "{} packets, {}s, {}",
                stats.total_packets,
                stats.capture_time,
                if stats.data_volume.is_empty() { "-" } else { stats.data_volume.as_str() }
            );
            Table::new(
                rows.collect::<Vec<_>>(),
                [
                    Constraint::Length(9),
                    Constraint::Length(6),
                    Constraint::Length(22),
                    Constraint::Length(22),
                    Constraint::Length(6),
                    Constraint::Min(10),
                ],
            )
            .header(header(&["Time", "Proto", "Source", "Destination", "Size", "Info"]))
            .block(Block::default().title(title))
        }
    }
}
