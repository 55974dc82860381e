#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, Timelike, Utc};

pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fixed display offset used for bucketing, day/night windows and sunrise/sunset.
pub fn fixed_offset(hours: i32) -> FixedOffset {
    FixedOffset::east_opt(hours.saturating_mul(3600)).unwrap_or_else(|| Utc.fix())
}

pub fn default_offset() -> FixedOffset {
    fixed_offset(DEFAULT_UTC_OFFSET_HOURS)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn pair(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub city: String,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity: f64,
    pub pressure_hpa: f64,
    pub wind_speed_ms: f64,
    pub wind_deg: f64,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub coordinates: Coordinates,
}

impl CurrentConditions {
    pub fn description_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.description.as_deref().unwrap_or(placeholder)
    }
}

/// One 3-hour forecast entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub feels_like_c: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_deg: Option<f64>,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: f64,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl ForecastSample {
    pub fn local_time(&self, offset: FixedOffset) -> DateTime<FixedOffset> {
        self.time.with_timezone(&offset)
    }

    pub fn local_date(&self, offset: FixedOffset) -> NaiveDate {
        self.local_time(offset).date_naive()
    }

    pub fn local_hour(&self, offset: FixedOffset) -> u32 {
        self.local_time(offset).hour()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    /// Highest temperature among samples with local hour in 6..=18.
    pub day_max_c: f64,
    /// Lowest temperature among samples outside 6..=18.
    pub night_min_c: f64,
    pub representative: ForecastSample,
    pub description: String,
    pub icon: Option<String>,
    pub feels_like_c: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed_ms: Option<f64>,
    pub wind_deg: Option<f64>,
    pub precipitation_percent: u8,
}

impl DailySummary {
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn heading(&self) -> String {
        format!("{} ({})", self.date_label(), self.weekday)
    }
}

/// Monday-first weekday labels plus the placeholder for missing descriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleLabels {
    pub weekdays: [&'static str; 7],
    pub unknown: &'static str,
}

impl LocaleLabels {
    pub const ENGLISH: Self = Self {
        weekdays: ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        unknown: "Unknown",
    };

    pub const CHINESE: Self = Self {
        weekdays: ["周一", "周二", "周三", "周四", "周五", "周六", "周日"],
        unknown: "未知",
    };

    pub fn for_language(language: &str) -> Self {
        if language.trim().to_ascii_lowercase().starts_with("zh") {
            Self::CHINESE
        } else {
            Self::ENGLISH
        }
    }

    pub fn weekday(&self, date: NaiveDate) -> &'static str {
        self.weekdays[date.weekday().num_days_from_monday() as usize]
    }
}

impl Default for LocaleLabels {
    fn default() -> Self {
        Self::ENGLISH
    }
}

pub fn format_local_timestamp(ts: DateTime<Utc>, offset: FixedOffset) -> String {
    ts.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string()
}

pub fn format_temp(celsius: f64) -> String {
    format!("{celsius:.1}°C")
}

pub fn format_optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v}{suffix}"))
}

pub fn pop_percent(pop: f64) -> u8 {
    (pop * 100.0).round().clamp(0.0, 100.0) as u8
}

pub fn compass_point(deg: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = deg.rem_euclid(360.0);
    let idx = ((normalized / 22.5).round() as usize) % POINTS.len();
    POINTS[idx]
}
