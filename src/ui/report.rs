//! Text rows shared by the terminal panels and the `--one-shot` report.

use std::fmt::Write as _;

use chrono::FixedOffset;

use crate::{
    data::openweather::WeatherReport,
    domain::{
        aggregate::ForecastAggregator,
        weather::{
            CurrentConditions, DailySummary, compass_point, format_local_timestamp,
            format_optional, format_temp,
        },
    },
};

pub const FORECAST_TITLE: &str = "5-day forecast";
pub const FORECAST_UNAVAILABLE: &str = "Forecast unavailable";

/// Label/value pairs for the current-conditions block.
pub fn current_rows(
    current: &CurrentConditions,
    offset: FixedOffset,
    unknown: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("City", current.city.clone()),
        ("Temperature", format_temp(current.temperature_c)),
        ("Feels like", format_temp(current.feels_like_c)),
        ("Weather", current.description_or(unknown).to_string()),
        ("Wind speed", format!("{} m/s", current.wind_speed_ms)),
        (
            "Wind direction",
            format!("{}° ({})", current.wind_deg, compass_point(current.wind_deg)),
        ),
        ("Pressure", format!("{} hPa", current.pressure_hpa)),
        ("Humidity", format!("{}%", current.humidity)),
        ("Sunrise", format_local_timestamp(current.sunrise, offset)),
        ("Sunset", format_local_timestamp(current.sunset, offset)),
    ]
}

/// Body lines of one forecast card, without the date heading.
pub fn summary_lines(summary: &DailySummary) -> Vec<String> {
    let condition = match &summary.icon {
        Some(icon) => format!("{} ({icon})", summary.description),
        None => summary.description.clone(),
    };
    let wind = match (summary.wind_speed_ms, summary.wind_deg) {
        (Some(speed), Some(deg)) => format!("{speed} m/s {}", compass_point(deg)),
        (speed, _) => format_optional(speed, " m/s"),
    };
    vec![
        condition,
        format!(
            "Max {}  Min {}",
            format_temp(summary.temp_max_c),
            format_temp(summary.temp_min_c)
        ),
        format!(
            "Day {}  Night {}",
            format_temp(summary.day_max_c),
            format_temp(summary.night_min_c)
        ),
        format!(
            "Feels like {}  Humidity {}",
            summary
                .feels_like_c
                .map_or_else(|| "N/A".to_string(), format_temp),
            format_optional(summary.humidity, "%")
        ),
        format!(
            "Precipitation {}%  Wind {wind}",
            summary.precipitation_percent
        ),
    ]
}

/// Reason shown in place of the forecast cards, if they cannot be shown.
pub fn forecast_unavailable_reason(
    report: &WeatherReport,
    days: &[DailySummary],
) -> Option<String> {
    match &report.forecast {
        Err(err) => Some(err.to_string()),
        Ok(_) if days.is_empty() => Some("no forecast samples returned".to_string()),
        Ok(_) => None,
    }
}

/// Plain-text rendition of a report for non-interactive use.
pub fn render_text(report: &WeatherReport, aggregator: &ForecastAggregator) -> String {
    let mut out = String::new();
    let unknown = aggregator.labels().unknown;
    let rows = current_rows(&report.current, aggregator.offset(), unknown);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);

    let _ = writeln!(out, "Current weather");
    for (label, value) in &rows {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }

    let days = report
        .forecast
        .as_ref()
        .map(|samples| aggregator.aggregate(samples))
        .unwrap_or_default();
    let _ = writeln!(out);
    let _ = writeln!(out, "{FORECAST_TITLE}: {}", report.current.city);
    if let Some(reason) = forecast_unavailable_reason(report, &days) {
        let _ = writeln!(out, "  {FORECAST_UNAVAILABLE}: {reason}");
        return out;
    }
    for day in &days {
        let _ = writeln!(out, "  {}", day.heading());
        for line in summary_lines(day) {
            let _ = writeln!(out, "    {line}");
        }
    }
    out
}
