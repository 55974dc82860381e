pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod resilience;
pub mod ui;

#[cfg(test)]
mod test_support;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::settings::{LastCityStore, RuntimeSettings, config_dir};
use app::state::{AppMode, AppState};
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use data::openweather::WeatherClient;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging();
    let settings = RuntimeSettings::from_cli(&cli)?;
    let store = LastCityStore::from_env();

    if cli.one_shot {
        return run_one_shot(&cli, &settings, &store).await;
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, &cli, &settings, store).await;
    restore_terminal(&mut terminal)?;
    result
}

fn init_logging() {
    let Some(dir) = config_dir() else {
        return;
    };
    if let Ok(path) = logging::init(&dir) {
        info!(log = %path.display(), "logging initialised");
    }
}

async fn run_one_shot(
    cli: &Cli,
    settings: &RuntimeSettings,
    store: &LastCityStore,
) -> Result<()> {
    let city = cli
        .requested_city()
        .or_else(|| store.load())
        .context("no city given and no last city stored")?;

    let client = WeatherClient::new(settings.weather.clone())?;
    let report = client
        .fetch_report(&city)
        .await
        .with_context(|| format!("Unable to fetch weather for {city}"))?;
    if let Err(err) = store.save(&report.query) {
        warn!(error = %err, "saving last city failed");
    }

    print!("{}", ui::report::render_text(&report, &settings.aggregator()));
    Ok(())
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cli: &Cli,
    settings: &RuntimeSettings,
    store: LastCityStore,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let mut app = AppState::new(settings, store)?;
    app.start(cli.requested_city(), &tx);

    terminal.draw(|frame| ui::render(frame, &app))?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx).await?;
                }
            }
        }

        if app.mode == AppMode::Quit {
            app.running = false;
            break;
        }

        terminal.draw(|frame| ui::render(frame, &app))?;
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
