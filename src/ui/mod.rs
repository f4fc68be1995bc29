// src/ui/mod.rs

use crate::app::{App, Tab};
use ratatui::prelude::*;

mod layout;
mod widgets;

pub fn render(app: &mut App, frame: &mut Frame) {
    let layout = layout::create_layout(frame.area());

    widgets::tabs::render_tabs(frame, app, layout.tabs);

    match app.current_tab() {
        Tab::Scanner(scanner_type) => {
            let areas = layout::scanner_layout(layout.body);
            widgets::input::render_input(frame, app, scanner_type, areas.input);
            widgets::input::render_options(frame, app, scanner_type, areas.options);
            widgets::progress::render_progress(frame, app, scanner_type, areas.progress);
            widgets::results::render_results(frame, app, scanner_type, areas.results);
        }
        Tab::Settings => {
            let (list_area, form_area) = layout::settings_layout(layout.body);
            widgets::settings::render_settings(frame, app, list_area, form_area);
        }
    }

    widgets::log_view::render_log_view(frame, app, layout.log_panel);
    widgets::footer::render_footer(frame, app, layout.footer);

    if app.show_disclaimer {
        widgets::disclaimer_popup::render_disclaimer_popup(frame, layout::centered_rect(70, 60, frame.area()));
    }
}
