mod common;

use chrono::{DateTime, Utc};
use ratatui::{Terminal, backend::TestBackend};
use weather_report::{
    app::{
        settings::{LastCityStore, RuntimeSettings},
        state::{AppMode, AppState, EMPTY_CITY_HINT, Panel},
    },
    data::openweather::{WeatherError, WeatherReport},
    domain::weather::{Coordinates, CurrentConditions},
    ui::theme::{ColorCapability, theme_for},
};

fn state() -> AppState {
    let cli = common::cli_for("http://127.0.0.1:9", &[]);
    let settings = RuntimeSettings::from_cli(&cli).expect("settings");
    AppState::new(&settings, LastCityStore::disabled()).expect("state")
}

fn report() -> WeatherReport {
    let samples = ["2024-03-01T00:00", "2024-03-01T12:00", "2024-03-02T12:00"]
        .iter()
        .zip([5.0, 18.0, 16.0])
        .map(|(local, temp)| {
            let mut sample = common::sample_at(local, temp);
            sample.description = Some("light rain".to_string());
            sample.pop = 0.3;
            sample
        })
        .collect();
    WeatherReport {
        query: "Beijing".to_string(),
        current: CurrentConditions {
            city: "Beijing".to_string(),
            temperature_c: 18.2,
            feels_like_c: 17.1,
            humidity: 40.0,
            pressure_hpa: 1016.0,
            wind_speed_ms: 3.4,
            wind_deg: 210.0,
            description: Some("clear sky".to_string()),
            icon: Some("01d".to_string()),
            sunrise: DateTime::<Utc>::from_timestamp(1_709_247_600, 0).expect("ts"),
            sunset: DateTime::<Utc>::from_timestamp(1_709_288_400, 0).expect("ts"),
            coordinates: Coordinates::new(39.9075, 116.3972),
        },
        forecast: Ok(samples),
    }
}

fn ready_state(panel: Panel) -> AppState {
    let mut state = state();
    state.report = Some(report());
    state.mode = AppMode::Ready;
    state.panel = panel;
    state
}

fn render_to_string(width: u16, height: u16, state: &AppState) -> String {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).expect("terminal");
    let theme = theme_for(ColorCapability::Basic16);
    terminal
        .draw(|frame| weather_report::ui::render_with_theme(frame, state, theme))
        .expect("draw");

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..height {
        let mut line = String::new();
        for x in 0..width {
            line.push_str(buffer[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[test]
fn current_panel_shows_conditions() {
    let out = render_to_string(100, 30, &ready_state(Panel::Current));
    assert!(out.contains("Current weather: Beijing"), "{out}");
    assert!(out.contains("18.2°C"), "{out}");
    assert!(out.contains("clear sky"), "{out}");
    assert!(out.contains("210° (SSW)"), "{out}");
    assert!(out.contains("1016 hPa"), "{out}");
    assert!(out.contains("2024-03-01 07:00:00"), "{out}");
}

#[test]
fn forecast_panel_shows_daily_cards() {
    let out = render_to_string(100, 30, &ready_state(Panel::Forecast));
    assert!(out.contains("5-day forecast (2 days)"), "{out}");
    assert!(out.contains("2024-03-01 (Fri)"), "{out}");
    assert!(out.contains("2024-03-02 (Sat)"), "{out}");
    assert!(out.contains("Max 18.0°C  Min 5.0°C"), "{out}");
    assert!(out.contains("Precipitation 30%"), "{out}");
}

#[test]
fn forecast_panel_explains_failure() {
    let mut state = ready_state(Panel::Forecast);
    if let Some(report) = state.report.as_mut() {
        report.forecast = Err(WeatherError::MissingCoordinates);
    }
    let out = render_to_string(100, 30, &state);
    assert!(out.contains("Forecast unavailable"), "{out}");
    assert!(out.contains("missing coordinates"), "{out}");
}

#[test]
fn city_prompt_shows_hint() {
    let mut state = state();
    state.city_hint = Some(EMPTY_CITY_HINT.to_string());
    let out = render_to_string(100, 30, &state);
    assert!(out.contains("Choose a city"), "{out}");
    assert!(out.contains(EMPTY_CITY_HINT), "{out}");
}

#[test]
fn error_mode_offers_retry() {
    let mut state = state();
    state.mode = AppMode::Error;
    state.last_error = Some("Unable to fetch weather for Atlantis: HTTP 404".to_string());
    let out = render_to_string(100, 30, &state);
    assert!(out.contains("Unable to fetch weather for Atlantis"), "{out}");
    assert!(out.contains("Press r to retry"), "{out}");
}

#[test]
fn small_terminal_shows_resize_warning() {
    let out = render_to_string(30, 10, &ready_state(Panel::Current));
    insta::assert_snapshot!(out, @r"
    ┌weather-report──────────────┐
    │Terminal too small. Resize  │
    │to at least 40x12.          │
    │                            │
    │                            │
    │                            │
    │                            │
    │                            │
    │                            │
    └────────────────────────────┘
    ");
}
