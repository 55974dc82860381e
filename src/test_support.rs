use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::{
    app::settings::{LastCityStore, RuntimeSettings},
    cli::Cli,
    data::openweather::WeatherReport,
    domain::weather::{Coordinates, CurrentConditions, ForecastSample, default_offset},
};

pub(crate) fn test_cli() -> Cli {
    use clap::Parser;
    Cli::parse_from([
        "weather-report",
        "--api-key",
        "test-key",
        "--lang",
        "en",
        "--base-url",
        "http://127.0.0.1:9/data/2.5",
    ])
}

pub(crate) fn test_settings() -> RuntimeSettings {
    RuntimeSettings::from_cli(&test_cli()).expect("settings from test cli")
}

pub(crate) fn disabled_store() -> LastCityStore {
    LastCityStore::disabled()
}

fn utc(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("valid timestamp fixture")
}

pub(crate) fn sample_current() -> CurrentConditions {
    CurrentConditions {
        city: "Beijing".to_string(),
        temperature_c: 18.2,
        feels_like_c: 17.1,
        humidity: 40.0,
        pressure_hpa: 1016.0,
        wind_speed_ms: 3.4,
        wind_deg: 210.0,
        description: Some("clear sky".to_string()),
        icon: Some("01d".to_string()),
        sunrise: utc(1_709_247_600),
        sunset: utc(1_709_288_400),
        coordinates: Coordinates::new(39.9075, 116.3972),
    }
}

pub(crate) fn sample_at(local: &str, temp: f64) -> ForecastSample {
    let naive =
        NaiveDateTime::parse_from_str(local, "%Y-%m-%dT%H:%M").expect("valid time fixture");
    let time = default_offset()
        .from_local_datetime(&naive)
        .single()
        .expect("unambiguous fixture time")
        .with_timezone(&Utc);
    ForecastSample {
        time,
        temperature_c: temp,
        feels_like_c: Some(temp - 1.0),
        humidity: Some(55.0),
        wind_speed_ms: Some(2.5),
        wind_deg: Some(90.0),
        pop: 0.3,
        description: Some("light rain".to_string()),
        icon: Some("10d".to_string()),
    }
}

pub(crate) fn sample_forecast() -> Vec<ForecastSample> {
    vec![
        sample_at("2024-03-01T00:00", 5.0),
        sample_at("2024-03-01T06:00", 10.0),
        sample_at("2024-03-01T12:00", 18.0),
        sample_at("2024-03-01T18:00", 9.0),
        sample_at("2024-03-02T00:00", 4.0),
        sample_at("2024-03-02T12:00", 16.0),
    ]
}

pub(crate) fn sample_report() -> WeatherReport {
    WeatherReport {
        query: "Beijing".to_string(),
        current: sample_current(),
        forecast: Ok(sample_forecast()),
    }
}
