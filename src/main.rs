// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

mod app;
mod core;
mod logging;
mod ui;

use app::{App, AppEvent, NoticeLevel, PanelState, Tab};
use core::config::AppConfig;
use core::credentials::{CredentialStore, FileStorage};
use core::dispatcher::Dispatcher;
use core::models::ScannerType;

const TICK_RATE: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let log_path = logging::initialize_logging()?;

    let config_path = logging::get_config_dir().join("config.toml");
    let config = AppConfig::load(&config_path)?;
    let storage = FileStorage::new(
        config
            .storage_path
            .clone()
            .unwrap_or_else(|| logging::get_data_dir().join("credentials.json")),
    );
    info!(
        log = %log_path.display(),
        config = %config_path.display(),
        storage = %storage.path().display(),
        backend = config.backend_url.as_deref().unwrap_or("none"),
        "Starting dashboard."
    );

    let store = CredentialStore::new(storage).into_shared();
    let dispatcher = Arc::new(Dispatcher::new(&config, store.clone())?);
    let app = App::new(store, &config, logging::get_data_dir().join("captures"));

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, app, dispatcher).await;

    // --- Restore Terminal ---
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    if let Err(e) = &result {
        error!(error = %e, "Dashboard exited with an error.");
    }
    result
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(16);
    let mut last_tick = Instant::now();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(&mut app, key, &tx, &dispatcher);
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            app.on_tick(&mut rand::rng());
            last_tick = Instant::now();
        }

        while let Ok(event) = rx.try_recv() {
            handle_app_event(&mut app, event);
        }
    }
    info!("Dashboard closed.");
    Ok(())
}

fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::ScanFinished(scanner_type, result) => {
            if let Ok(envelope) = serde_json::to_string(&result.envelope()) {
                debug!(%scanner_type, envelope = %envelope, "Scan result received.");
            }
            app.finish_scan(scanner_type, result);
        }
        AppEvent::InterfacesLoaded(outcome) => app.set_interfaces(outcome),
        AppEvent::CaptureSaved(Ok(path)) => {
            app.notify(NoticeLevel::Success, format!("Capture saved to {}", path.display()));
        }
        AppEvent::CaptureSaved(Err(e)) => app.notify(NoticeLevel::Error, format!("Capture download failed: {e}")),
        AppEvent::KeyVerified { scanner_type, provider, valid } => {
            if valid {
                app.notify(NoticeLevel::Success, format!("{provider} accepted the {scanner_type} API key."));
            } else {
                app.notify(NoticeLevel::Error, format!("{provider} rejected the {scanner_type} API key."));
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AppEvent>, dispatcher: &Arc<Dispatcher>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Esc || (ctrl && key.code == KeyCode::Char('c')) {
        app.quit();
        return;
    }
    if app.show_disclaimer {
        if key.code == KeyCode::Enter {
            app.show_disclaimer = false;
        }
        return;
    }
    match key.code {
        KeyCode::Tab => app.next_tab(),
        KeyCode::BackTab => app.previous_tab(),
        _ => match app.current_tab() {
            Tab::Scanner(scanner_type) => handle_scanner_input(app, scanner_type, key, tx, dispatcher),
            Tab::Settings => handle_settings_input(app, key, tx, dispatcher),
        },
    }
}

/// Handles input on a scanner tab.
fn handle_scanner_input(
    app: &mut App,
    scanner_type: ScannerType,
    key: KeyEvent,
    tx: &mpsc::Sender<AppEvent>,
    dispatcher: &Arc<Dispatcher>,
) {
    let scanning = app.panel(scanner_type).state == PanelState::Scanning;
    match key.code {
        KeyCode::Enter => {
            let Some(request) = app.start_scan(scanner_type) else { return };
            let tx = tx.clone();
            let dispatcher = Arc::clone(dispatcher);
            tokio::spawn(async move {
                let result = dispatcher.dispatch(&request).await;
                let _ = tx.send(AppEvent::ScanFinished(request.scanner_type, result)).await;
            });
        }
        KeyCode::Up => app.panel_mut(scanner_type).scroll_up(),
        KeyCode::Down => app.panel_mut(scanner_type).scroll_down(),
        KeyCode::Left if scanner_type == ScannerType::Traffic => app.panel_mut(scanner_type).cycle_interface(false),
        KeyCode::Right if scanner_type == ScannerType::Traffic => app.panel_mut(scanner_type).cycle_interface(true),
        KeyCode::F(2) if scanner_type == ScannerType::Traffic => load_interfaces(app, tx, dispatcher),
        KeyCode::F(3) if scanner_type == ScannerType::Traffic => download_capture(app, tx, dispatcher),
        KeyCode::F(4) if !scanning => app.panel_mut(scanner_type).cycle_option(),
        KeyCode::F(5) if !scanning && scanner_type == ScannerType::Port => app.panel_mut(scanner_type).toggle_ids(),
        KeyCode::F(6) if !scanning => app.panel_mut(scanner_type).toggle_focus(),
        KeyCode::Char(c) if !scanning => app.panel_mut(scanner_type).push_char(c),
        KeyCode::Backspace if !scanning => app.panel_mut(scanner_type).pop_char(),
        _ => {}
    }
}

fn load_interfaces(app: &mut App, tx: &mpsc::Sender<AppEvent>, dispatcher: &Arc<Dispatcher>) {
    if dispatcher.backend().is_none() {
        app.notify(NoticeLevel::Error, "Interface listing needs a local backend (backend_url).");
        return;
    }
    let tx = tx.clone();
    let dispatcher = Arc::clone(dispatcher);
    tokio::spawn(async move {
        let Some(backend) = dispatcher.backend() else { return };
        let outcome = backend.network_interfaces().await.map_err(|e| e.to_string());
        let _ = tx.send(AppEvent::InterfacesLoaded(outcome)).await;
    });
}

fn download_capture(app: &mut App, tx: &mpsc::Sender<AppEvent>, dispatcher: &Arc<Dispatcher>) {
    let Some(capture_id) = app.panel(ScannerType::Traffic).capture_id().map(String::from) else {
        app.notify(NoticeLevel::Error, "No capture to download yet.");
        return;
    };
    if dispatcher.backend().is_none() {
        app.notify(NoticeLevel::Error, "Capture download needs a local backend (backend_url).");
        return;
    }
    let dest = app.capture_dir.join(format!("{capture_id}.pcap"));
    let tx = tx.clone();
    let dispatcher = Arc::clone(dispatcher);
    tokio::spawn(async move {
        let Some(backend) = dispatcher.backend() else { return };
        let outcome = backend
            .download_capture(&capture_id, &dest)
            .await
            .map(|_| dest)
            .map_err(|e| e.to_string());
        let _ = tx.send(AppEvent::CaptureSaved(outcome)).await;
    });
}

/// Handles input on the API settings tab.
fn handle_settings_input(app: &mut App, key: KeyEvent, tx: &mpsc::Sender<AppEvent>, dispatcher: &Arc<Dispatcher>) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('d') if ctrl => app.clear_key(),
        KeyCode::Char('t') if ctrl => {
            let Some((scanner_type, provider, api_key)) = app.key_to_verify() else { return };
            let tx = tx.clone();
            let dispatcher = Arc::clone(dispatcher);
            tokio::spawn(async move {
                let valid = dispatcher.proxy().verify_key(scanner_type, &provider, &api_key).await;
                let _ = tx.send(AppEvent::KeyVerified { scanner_type, provider, valid }).await;
            });
        }
        KeyCode::Up => app.settings_select(false),
        KeyCode::Down => app.settings_select(true),
        KeyCode::Left => app.settings_cycle_provider(false),
        KeyCode::Right => app.settings_cycle_provider(true),
        KeyCode::Enter => {
            app.save_key();
        }
        KeyCode::Char(c) if !ctrl => app.settings.key_input.push(c),
        KeyCode::Backspace => {
            app.settings.key_input.pop();
        }
        _ => {}
    }
}
