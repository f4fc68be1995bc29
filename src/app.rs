// src/app.rs

use crate::core::catalog;
use crate::core::config::AppConfig;
use crate::core::credentials::SharedCredentialStore;
use crate::core::models::{Provider, ScanOptions, ScanPayload, ScanRequest, ScanResult, ScannerType};
use chrono::{DateTime, Local};
use rand::Rng;
use ratatui::widgets::TableState;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tracing::{info, warn};

pub const SPINNER_CHARS: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The progress bar never reaches 100 on its own; only a finished scan does.
const PROGRESS_CEILING: u16 = 95;
const MAX_NOTICES: usize = 100;

const NETWORK_METHODS: [&str; 3] = ["ping", "arp", "tcp-syn"];
/// Named port presets; anything else typed into the field is a custom list.
const PORT_PRESETS: [(&str, &str); 3] = [("common", "1-1024"), ("web", "80,443,8000,8080,8443"), ("full", "1-65535")];
const CAPTURE_DURATIONS: [u64; 4] = [30, 60, 120, 300];

/// Messages sent back to the UI loop by background tasks.
#[derive(Debug)]
pub enum AppEvent {
    ScanFinished(ScannerType, ScanResult),
    InterfacesLoaded(Result<Vec<String>, String>),
    CaptureSaved(Result<PathBuf, String>),
    KeyVerified { scanner_type: ScannerType, provider: String, valid: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Scanner(ScannerType),
    Settings,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Scanner(scanner_type) => scanner_type.title(),
            Tab::Settings => "API Settings",
        }
    }
}

/// Which text field of a scanner tab receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFocus {
    Target,
    /// The port list (port panel) or capture filter (traffic panel).
    Option,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Idle,
    Scanning,
    Finished,
}

/// Input, progress and last result of one scanner tab.
pub struct ScannerPanel {
    pub scanner_type: ScannerType,
    pub input: String,
    pub options: ScanOptions,
    pub focus: InputFocus,
    pub state: PanelState,
    pub progress: u16,
    pub result: Option<ScanResult>,
    pub table_state: TableState,
    /// Only filled for the traffic panel, from the backend.
    pub interfaces: Vec<String>,
}

impl ScannerPanel {
    fn new(scanner_type: ScannerType) -> Self {
        Self {
            scanner_type,
            input: String::new(),
            options: ScanOptions::default_for(scanner_type),
            focus: InputFocus::Target,
            state: PanelState::Idle,
            progress: 0,
            result: None,
            table_state: TableState::default(),
            interfaces: Vec::new(),
        }
    }

    pub fn input_label(&self) -> &'static str {
        match self.scanner_type {
            ScannerType::Vulnerability => "Target URL",
            ScannerType::Network => "IP Range (e.g. 192.168.1.0/24)",
            ScannerType::Port => "Target Host",
            ScannerType::Traffic => "Network Interface (←/→ to cycle, F2 to refresh)",
        }
    }

    /// One-line description of the current options, for the options box.
    pub fn options_summary(&self) -> String {
        match &self.options {
            ScanOptions::Vulnerability { full_scan } => {
                format!("Mode: {}", if *full_scan { "full scan" } else { "quick scan" })
            }
            ScanOptions::Network { method } => format!("Method: {method}"),
            ScanOptions::Port { port_range, enable_ids } => {
                let preset = PORT_PRESETS
                    .iter()
                    .find(|(_, range)| range == port_range)
                    .map_or("custom", |(name, _)| *name);
                format!(
                    "Ports [{preset}]: {port_range}  IDS: {}",
                    if *enable_ids { "on" } else { "off" }
                )
            }
            ScanOptions::Traffic { duration_secs, filter } => format!(
                "Duration: {duration_secs}s  Filter: {}",
                filter.as_deref().unwrap_or("")
            ),
        }
    }

    /// Text of the option field that accepts typing, if the panel has one.
    pub fn option_text(&self) -> Option<&str> {
        match &self.options {
            ScanOptions::Port { port_range, .. } => Some(port_range),
            ScanOptions::Traffic { filter, .. } => Some(filter.as_deref().unwrap_or("")),
            _ => None,
        }
    }

    /// Steps through the panel's main option: quick/full scan, scan method,
    /// port preset or capture duration.
    pub fn cycle_option(&mut self) {
        match &mut self.options {
            ScanOptions::Vulnerability { full_scan } => *full_scan = !*full_scan,
            ScanOptions::Network { method } => {
                let next = NETWORK_METHODS
                    .iter()
                    .position(|m| m == method)
                    .map_or(0, |i| (i + 1) % NETWORK_METHODS.len());
                *method = NETWORK_METHODS[next].to_string();
            }
            ScanOptions::Port { port_range, .. } => {
                let next = PORT_PRESETS
                    .iter()
                    .position(|(_, range)| range == port_range)
                    .map_or(0, |i| (i + 1) % PORT_PRESETS.len());
                *port_range = PORT_PRESETS[next].1.to_string();
            }
            ScanOptions::Traffic { duration_secs, .. } => {
                let next = CAPTURE_DURATIONS
                    .iter()
                    .position(|d| d == duration_secs)
                    .map_or(0, |i| (i + 1) % CAPTURE_DURATIONS.len());
                *duration_secs = CAPTURE_DURATIONS[next];
            }
        }
    }

    /// Flips IDS alerting on the port panel. No-op elsewhere.
    pub fn toggle_ids(&mut self) {
        if let ScanOptions::Port { enable_ids, .. } = &mut self.options {
            *enable_ids = !*enable_ids;
        }
    }

    /// Moves typing between the target and the option text field.
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            InputFocus::Target if self.option_text().is_some() => InputFocus::Option,
            _ => InputFocus::Target,
        };
    }

    pub fn push_char(&mut self, c: char) {
        match (self.focus, &mut self.options) {
            (InputFocus::Option, ScanOptions::Port { port_range, .. }) => port_range.push(c),
            (InputFocus::Option, ScanOptions::Traffic { filter, .. }) => filter.get_or_insert_with(String::new).push(c),
            _ => self.input.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        match (self.focus, &mut self.options) {
            (InputFocus::Option, ScanOptions::Port { port_range, .. }) => {
                port_range.pop();
            }
            (InputFocus::Option, ScanOptions::Traffic { filter, .. }) => {
                if let Some(text) = filter.as_mut() {
                    text.pop();
                    if text.is_empty() {
                        *filter = None;
                    }
                }
            }
            _ => {
                self.input.pop();
            }
        }
    }

    /// Options as they are sent: text fields trimmed, blank filter dropped.
    fn request_options(&self) -> ScanOptions {
        match &self.options {
            ScanOptions::Port { port_range, enable_ids } => ScanOptions::Port {
                port_range: port_range.trim().to_string(),
                enable_ids: *enable_ids,
            },
            ScanOptions::Traffic { duration_secs, filter } => ScanOptions::Traffic {
                duration_secs: *duration_secs,
                filter: filter.as_deref().map(str::trim).filter(|f| !f.is_empty()).map(String::from),
            },
            other => other.clone(),
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.result {
            Some(ScanResult::Success { payload, .. }) => payload.len(),
            _ => 0,
        }
    }

    /// Capture id of the last successful traffic scan, if the backend gave one.
    pub fn capture_id(&self) -> Option<&str> {
        match &self.result {
            Some(ScanResult::Success { payload: ScanPayload::Traffic { stats, .. }, .. }) => {
                stats.capture_id.as_deref()
            }
            _ => None,
        }
    }

    pub fn scroll_down(&mut self) {
        let rows = self.row_count();
        if rows == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(rows - 1));
        self.table_state.select(Some(next));
    }

    pub fn scroll_up(&mut self) {
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Moves the traffic input to the next or previous known interface.
    pub fn cycle_interface(&mut self, forward: bool) {
        if self.interfaces.is_empty() {
            return;
        }
        let len = self.interfaces.len();
        let current = self.interfaces.iter().position(|i| *i == self.input);
        let next = match (current, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.input = self.interfaces[next].clone();
    }
}

/// State of the API settings tab.
pub struct SettingsState {
    pub selected: usize,
    pub provider_index: usize,
    pub key_input: String,
}

impl SettingsState {
    pub fn scanner_type(&self) -> ScannerType {
        ScannerType::iter().nth(self.selected).unwrap_or(ScannerType::Vulnerability)
    }

    pub fn providers(&self) -> &'static [Provider] {
        catalog::providers_for(self.scanner_type())
    }

    pub fn provider(&self) -> Option<&'static Provider> {
        self.providers().get(self.provider_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// One line of the activity panel.
#[derive(Debug, Clone)]
pub struct Notice {
    pub at: DateTime<Local>,
    pub level: NoticeLevel,
    pub text: String,
}

pub struct App {
    pub should_quit: bool,
    pub show_disclaimer: bool,
    pub tabs: Vec<Tab>,
    pub tab_index: usize,
    pub panels: Vec<ScannerPanel>,
    pub settings: SettingsState,
    pub notices: Vec<Notice>,
    pub spinner_frame: usize,
    pub store: SharedCredentialStore,
    pub has_backend: bool,
    /// Set when every provider request is routed through one gateway.
    pub provider_gateway: Option<String>,
    pub capture_dir: PathBuf,
}

impl App {
    pub fn new(store: SharedCredentialStore, config: &AppConfig, capture_dir: PathBuf) -> Self {
        let tabs = ScannerType::iter().map(Tab::Scanner).chain([Tab::Settings]).collect();
        let mut app = Self {
            should_quit: false,
            show_disclaimer: true,
            tabs,
            tab_index: 0,
            panels: ScannerType::iter().map(ScannerPanel::new).collect(),
            settings: SettingsState { selected: 0, provider_index: 0, key_input: String::new() },
            notices: Vec::new(),
            spinner_frame: 0,
            store,
            has_backend: config.backend_url.is_some(),
            provider_gateway: config.provider_gateway.clone(),
            capture_dir,
        };
        app.load_settings_selection();
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn current_tab(&self) -> Tab {
        self.tabs[self.tab_index]
    }

    pub fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tabs.len();
    }

    pub fn previous_tab(&mut self) {
        self.tab_index = (self.tab_index + self.tabs.len() - 1) % self.tabs.len();
    }

    pub fn panel(&self, scanner_type: ScannerType) -> &ScannerPanel {
        let index = self.panels.iter().position(|p| p.scanner_type == scanner_type).unwrap_or(0);
        &self.panels[index]
    }

    pub fn panel_mut(&mut self, scanner_type: ScannerType) -> &mut ScannerPanel {
        let index = self.panels.iter().position(|p| p.scanner_type == scanner_type).unwrap_or(0);
        &mut self.panels[index]
    }

    pub fn notify(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice { at: Local::now(), level, text: text.into() });
        if self.notices.len() > MAX_NOTICES {
            let excess = self.notices.len() - MAX_NOTICES;
            self.notices.drain(..excess);
        }
    }

    /// Advances the spinner and nudges every running progress bar.
    pub fn on_tick<R: Rng>(&mut self, rng: &mut R) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        for panel in self.panels.iter_mut().filter(|p| p.state == PanelState::Scanning) {
            let step = rng.random_range(1..=10);
            panel.progress = (panel.progress + step).min(PROGRESS_CEILING);
        }
    }

    /// Puts the panel into the scanning state and returns the request to
    /// dispatch. Returns `None` while a scan of that type is still running.
    pub fn start_scan(&mut self, scanner_type: ScannerType) -> Option<ScanRequest> {
        let panel = self.panel_mut(scanner_type);
        if panel.state == PanelState::Scanning {
            return None;
        }
        panel.state = PanelState::Scanning;
        panel.progress = 0;
        panel.result = None;
        panel.table_state = TableState::default();
        let request = ScanRequest::with_options(panel.input.trim(), panel.request_options());
        info!(%scanner_type, target = %request.target, options = ?request.options, "Scan started from the dashboard.");
        self.notify(NoticeLevel::Info, format!("{} started.", scanner_type.title()));
        Some(request)
    }

    pub fn finish_scan(&mut self, scanner_type: ScannerType, result: ScanResult) {
        let (level, text) = match &result {
            ScanResult::Success { payload, message } => {
                let mut text = format!("{} finished: {} result(s).", scanner_type.title(), payload.len());
                if let Some(message) = message {
                    text.push(' ');
                    text.push_str(message);
                }
                (NoticeLevel::Success, text)
            }
            ScanResult::Failure { error } => (NoticeLevel::Error, format!("{} failed: {error}", scanner_type.title())),
        };
        let panel = self.panel_mut(scanner_type);
        panel.state = PanelState::Finished;
        panel.progress = 100;
        panel.result = Some(result);
        if panel.row_count() > 0 {
            panel.table_state.select(Some(0));
        }
        self.notify(level, text);
    }

    pub fn set_interfaces(&mut self, outcome: Result<Vec<String>, String>) {
        match outcome {
            Ok(interfaces) => {
                let count = interfaces.len();
                let panel = self.panel_mut(ScannerType::Traffic);
                if panel.input.is_empty() {
                    panel.input = interfaces.first().cloned().unwrap_or_default();
                }
                panel.interfaces = interfaces;
                self.notify(NoticeLevel::Info, format!("{count} network interface(s) available."));
            }
            Err(e) => {
                warn!(error = %e, "Could not load network interfaces.");
                self.notify(NoticeLevel::Error, format!("Could not load network interfaces: {e}"));
            }
        }
    }

    // --- Settings ---

    /// Loads the stored provider of the selected scanner type into the form.
    fn load_settings_selection(&mut self) {
        let scanner_type = self.settings.scanner_type();
        let stored = match self.store.lock() {
            Ok(mut store) => store.get_provider(scanner_type),
            Err(_) => String::new(),
        };
        self.settings.provider_index =
            self.settings.providers().iter().position(|p| p.name == stored).unwrap_or(0);
        self.settings.key_input.clear();
    }

    pub fn settings_select(&mut self, forward: bool) {
        let count = ScannerType::iter().count();
        self.settings.selected = if forward {
            (self.settings.selected + 1) % count
        } else {
            (self.settings.selected + count - 1) % count
        };
        self.load_settings_selection();
    }

    pub fn settings_cycle_provider(&mut self, forward: bool) {
        let count = self.settings.providers().len();
        if count == 0 {
            return;
        }
        self.settings.provider_index = if forward {
            (self.settings.provider_index + 1) % count
        } else {
            (self.settings.provider_index + count - 1) % count
        };
    }

    pub fn has_key(&self, scanner_type: ScannerType) -> bool {
        self.store.lock().map(|mut store| store.has_key(scanner_type)).unwrap_or(false)
    }

    pub fn stored_provider(&self, scanner_type: ScannerType) -> String {
        self.store.lock().map(|mut store| store.get_provider(scanner_type)).unwrap_or_default()
    }

    /// Base URL provider scans of this type are sent to: the gateway when
    /// one is configured, otherwise the stored provider's catalog URL.
    pub fn stored_endpoint(&self, scanner_type: ScannerType) -> String {
        if let Some(gateway) = &self.provider_gateway {
            return gateway.clone();
        }
        self.store.lock().map(|mut store| store.get_base_url(scanner_type)).unwrap_or_default()
    }

    /// Saves the typed key with the selected provider. Blank input is refused.
    pub fn save_key(&mut self) -> bool {
        let scanner_type = self.settings.scanner_type();
        let provider = self.settings.provider().map(|p| p.name);
        let saved = match self.store.lock() {
            Ok(mut store) => store.set_key(scanner_type, &self.settings.key_input, provider),
            Err(_) => false,
        };
        if saved {
            self.settings.key_input.clear();
            self.notify(
                NoticeLevel::Success,
                format!("API key saved for {} ({}).", scanner_type.title(), provider.unwrap_or("default")),
            );
        } else {
            self.notify(NoticeLevel::Error, "Please enter an API key.");
        }
        saved
    }

    pub fn clear_key(&mut self) {
        let scanner_type = self.settings.scanner_type();
        if let Ok(mut store) = self.store.lock() {
            store.clear_key(scanner_type);
        }
        self.settings.key_input.clear();
        self.notify(NoticeLevel::Info, format!("API key removed for {}.", scanner_type.title()));
    }

    /// Key, provider name and type to verify, from the form or the store.
    pub fn key_to_verify(&mut self) -> Option<(ScannerType, String, String)> {
        let scanner_type = self.settings.scanner_type();
        let provider = self.settings.provider().map(|p| p.name.to_string()).unwrap_or_default();
        let key = if self.settings.key_input.trim().is_empty() {
            self.store.lock().map(|mut store| store.get_key(scanner_type)).unwrap_or_default()
        } else {
            self.settings.key_input.trim().to_string()
        };
        if key.is_empty() {
            self.notify(NoticeLevel::Error, "Please enter an API key.");
            return None;
        }
        self.notify(NoticeLevel::Info, format!("Testing {provider} key..."));
        Some((scanner_type, provider, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::CredentialStore;
    use crate::core::models::Device;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn app() -> App {
        App::new(CredentialStore::in_memory().into_shared(), &AppConfig::default(), PathBuf::from("captures"))
    }

    fn devices(n: usize) -> ScanResult {
        let devices = (1..=n)
            .map(|i| Device {
                ip: format!("10.0.0.{i}"),
                hostname: String::new(),
                mac: None,
                status: "Online".to_string(),
                vendor: None,
                os: None,
                open_ports: Vec::new(),
            })
            .collect();
        ScanResult::Success { payload: ScanPayload::Devices { devices }, message: None }
    }

    #[test]
    fn tabs_wrap_in_both_directions() {
        let mut app = app();
        assert_eq!(app.tabs.len(), 5);
        app.previous_tab();
        assert_eq!(app.current_tab(), Tab::Settings);
        app.next_tab();
        assert_eq!(app.current_tab(), Tab::Scanner(ScannerType::Vulnerability));
    }

    #[test]
    fn only_one_scan_per_panel_at_a_time() {
        let mut app = app();
        app.panel_mut(ScannerType::Network).input = " 10.0.0.0/24 ".to_string();
        let request = app.start_scan(ScannerType::Network).unwrap();
        assert_eq!(request.target, "10.0.0.0/24");
        assert!(app.start_scan(ScannerType::Network).is_none());
        assert!(app.start_scan(ScannerType::Port).is_some());
    }

    #[test]
    fn progress_never_completes_on_its_own() {
        let mut app = app();
        app.start_scan(ScannerType::Port);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            app.on_tick(&mut rng);
        }
        assert_eq!(app.panel(ScannerType::Port).progress, PROGRESS_CEILING);
        assert_eq!(app.panel(ScannerType::Network).progress, 0);

        app.finish_scan(ScannerType::Port, ScanResult::Failure { error: "boom".into() });
        let panel = app.panel(ScannerType::Port);
        assert_eq!(panel.progress, 100);
        assert_eq!(panel.state, PanelState::Finished);
        assert_eq!(app.notices.last().map(|n| n.level), Some(NoticeLevel::Error));
    }

    #[test]
    fn finished_scan_selects_the_first_row_and_scrolls_within_bounds() {
        let mut app = app();
        app.start_scan(ScannerType::Network);
        app.finish_scan(ScannerType::Network, devices(2));
        let panel = app.panel_mut(ScannerType::Network);
        assert_eq!(panel.table_state.selected(), Some(0));
        panel.scroll_down();
        panel.scroll_down();
        assert_eq!(panel.table_state.selected(), Some(1));
    }

    #[test]
    fn saving_a_blank_key_is_refused() {
        let mut app = app();
        app.settings.key_input = "   ".to_string();
        assert!(!app.save_key());
        assert!(!app.has_key(ScannerType::Vulnerability));
    }

    #[test]
    fn saved_key_keeps_the_selected_provider() {
        let mut app = app();
        app.settings_select(true);
        assert_eq!(app.settings.scanner_type(), ScannerType::Network);
        app.settings_cycle_provider(true);
        app.settings.key_input = "st-key".to_string();
        assert!(app.save_key());
        assert!(app.has_key(ScannerType::Network));
        assert_eq!(app.stored_provider(ScannerType::Network), "SecurityTrails");

        app.clear_key();
        assert!(!app.has_key(ScannerType::Network));
    }

    #[test]
    fn interfaces_fill_an_empty_traffic_input() {
        let mut app = app();
        app.set_interfaces(Ok(vec!["eth0".into(), "wlan0".into()]));
        let panel = app.panel_mut(ScannerType::Traffic);
        assert_eq!(panel.input, "eth0");
        panel.cycle_interface(false);
        assert_eq!(panel.input, "wlan0");
    }

    #[test]
    fn notices_are_capped() {
        let mut app = app();
        for i in 0..(MAX_NOTICES + 10) {
            app.notify(NoticeLevel::Info, format!("n{i}"));
        }
        assert_eq!(app.notices.len(), MAX_NOTICES);
        assert_eq!(app.notices[0].text, "n10");
    }

    #[test]
    fn edited_port_options_reach_the_request_body() {
        let mut app = app();
        let panel = app.panel_mut(ScannerType::Port);
        panel.input = "10.0.0.1".to_string();
        panel.toggle_ids();
        panel.toggle_focus();
        assert_eq!(panel.focus, InputFocus::Option);
        for _ in 0.."1-1024".len() {
            panel.pop_char();
        }
        for c in " 22,443 ".chars() {
            panel.push_char(c);
        }
        assert_eq!(panel.input, "10.0.0.1");

        let body = app.start_scan(ScannerType::Port).unwrap().body();
        assert_eq!(body["portRange"], "22,443");
        assert_eq!(body["enableIDS"], true);
    }

    #[test]
    fn option_keys_cycle_each_panel() {
        let mut app = app();
        app.panel_mut(ScannerType::Vulnerability).cycle_option();
        app.panel_mut(ScannerType::Network).cycle_option();
        app.panel_mut(ScannerType::Traffic).cycle_option();
        app.panel_mut(ScannerType::Port).cycle_option();
        // Vulnerability and network panels have no text option to focus.
        app.panel_mut(ScannerType::Network).toggle_focus();
        assert_eq!(app.panel(ScannerType::Network).focus, InputFocus::Target);

        let traffic = app.panel_mut(ScannerType::Traffic);
        traffic.input = "eth0".to_string();
        traffic.toggle_focus();
        traffic.push_char(' ');

        assert_eq!(app.start_scan(ScannerType::Vulnerability).unwrap().body()["fullScan"], true);
        assert_eq!(app.start_scan(ScannerType::Network).unwrap().body()["scanMethod"], "arp");
        assert_eq!(app.start_scan(ScannerType::Port).unwrap().body()["portRange"], "80,443,8000,8080,8443");
        let traffic = app.start_scan(ScannerType::Traffic).unwrap().body();
        assert_eq!(traffic["duration"], 120);
        assert!(traffic.get("filter").is_none());
    }

    #[test]
    fn endpoint_shows_the_gateway_when_one_is_configured() {
        let mut store = CredentialStore::in_memory();
        store.set_key(ScannerType::Network, "k", Some("Shodan"));
        let store = store.into_shared();

        let direct = App::new(store.clone(), &AppConfig::default(), PathBuf::from("captures"));
        assert_eq!(direct.stored_endpoint(ScannerType::Network), "https://api.shodan.io");

        let config = AppConfig { provider_gateway: Some("http://relay.internal:9000".into()), ..AppConfig::default() };
        let relayed = App::new(store, &config, PathBuf::from("captures"));
        assert_eq!(relayed.stored_endpoint(ScannerType::Network), "http://relay.internal:9000");
    }
}
