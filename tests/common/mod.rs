#![allow(dead_code)]

use std::time::Duration;

use chrono::{NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use serde_json::{Value, json};
use weather_report::{
    cli::Cli,
    data::openweather::{WeatherClient, WeatherConfig},
    domain::weather::{ForecastSample, default_offset},
    resilience::retry::RetryPolicy,
};

pub const API_KEY: &str = "test-key";

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10))
}

pub fn weather_client(base_url: &str) -> WeatherClient {
    let config = WeatherConfig::new(API_KEY)
        .with_base_url(base_url)
        .with_language("en")
        .with_retry(fast_retry());
    WeatherClient::new(config).expect("weather client")
}

pub fn cli_for(base_url: &str, extra: &[&str]) -> Cli {
    let mut args = vec![
        "weather-report",
        "--api-key",
        API_KEY,
        "--lang",
        "en",
        "--base-url",
        base_url,
    ];
    args.extend_from_slice(extra);
    Cli::parse_from(args)
}

pub fn current_json(city: &str) -> Value {
    json!({
        "coord": {"lon": 116.3972, "lat": 39.9075},
        "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
        "main": {"temp": 18.2, "feels_like": 17.1, "pressure": 1016, "humidity": 40},
        "wind": {"speed": 3.4, "deg": 210},
        "sys": {"sunrise": 1_709_247_600, "sunset": 1_709_288_400},
        "name": city
    })
}

fn local_ts(local: &str) -> i64 {
    let naive = NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M").expect("fixture time");
    default_offset()
        .from_local_datetime(&naive)
        .single()
        .expect("unambiguous fixture time")
        .timestamp()
}

pub fn forecast_entry(local: &str, temp: f64, description: &str) -> Value {
    json!({
        "dt": local_ts(local),
        "main": {"temp": temp, "feels_like": temp - 1.0, "humidity": 55},
        "weather": [{"description": description, "icon": "10d"}],
        "wind": {"speed": 2.5, "deg": 90},
        "pop": 0.3
    })
}

pub fn forecast_json() -> Value {
    json!({
        "cod": "200",
        "list": [
            forecast_entry("2024-03-01T00:00", 5.0, "light rain"),
            forecast_entry("2024-03-01T06:00", 10.0, "light rain"),
            forecast_entry("2024-03-01T12:00", 18.0, "few clouds"),
            forecast_entry("2024-03-01T18:00", 9.0, "light rain"),
            forecast_entry("2024-03-02T00:00", 4.0, "clear sky"),
            forecast_entry("2024-03-02T12:00", 16.0, "clear sky"),
        ]
    })
}

/// Sample at a local (UTC+8) wall-clock time.
pub fn sample_at(local: &str, temp: f64) -> ForecastSample {
    ForecastSample {
        time: Utc
            .timestamp_opt(local_ts(local), 0)
            .single()
            .expect("fixture timestamp"),
        temperature_c: temp,
        feels_like_c: None,
        humidity: None,
        wind_speed_ms: None,
        wind_deg: None,
        pop: 0.0,
        description: None,
        icon: None,
    }
}
