use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

use crate::{
    data::transport::{HttpRequest, ReqwestTransport, Transport, TransportError},
    domain::weather::{Coordinates, CurrentConditions, ForecastSample},
    resilience::retry::RetryPolicy,
};

pub const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_LANGUAGE: &str = "zh_cn";
pub const FORECAST_SAMPLE_COUNT: u32 = 40;

const CURRENT_TIMEOUT: Duration = Duration::from_secs(10);
const FORECAST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("request failed with HTTP status {status} after {attempts} attempt(s)")]
    RequestFailure { status: u16, attempts: u32 },

    #[error("network failure: {0}")]
    Network(#[from] TransportError),

    #[error("missing coordinates: latitude and longitude are both required")]
    MissingCoordinates,

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailure { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    pub current_timeout: Duration,
    pub forecast_timeout: Duration,
    pub forecast_count: u32,
    pub retry: RetryPolicy,
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: OPENWEATHER_URL.to_string(),
            api_key: api_key.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            current_timeout: CURRENT_TIMEOUT,
            forecast_timeout: FORECAST_TIMEOUT,
            forecast_count: FORECAST_SAMPLE_COUNT,
            retry: RetryPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Current conditions plus the forecast fetched from their coordinates.
///
/// A forecast failure does not void the current conditions; it is kept
/// alongside so the caller can render an unavailable state.
#[derive(Debug)]
pub struct WeatherReport {
    pub query: String,
    pub current: CurrentConditions,
    pub forecast: Result<Vec<ForecastSample>, WeatherError>,
}

#[derive(Debug, Clone)]
pub struct WeatherClient<T = ReqwestTransport> {
    transport: T,
    config: WeatherConfig,
}

impl WeatherClient<ReqwestTransport> {
    pub fn new(config: WeatherConfig) -> Result<Self, WeatherError> {
        Ok(Self::with_transport(config, ReqwestTransport::new()?))
    }
}

impl<T: Transport> WeatherClient<T> {
    pub fn with_transport(config: WeatherConfig, transport: T) -> Self {
        Self { transport, config }
    }

    #[instrument(skip(self), fields(lang = %self.config.language))]
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let request = HttpRequest::get(
            format!("{}/weather", self.config.base_url),
            self.config.current_timeout,
        )
        .param("q", city)
        .param("appid", &self.config.api_key)
        .param("units", "metric")
        .param("lang", &self.config.language);

        let body = self.execute(&request).await?;
        decode_current(&body)
    }

    /// Fails with [`WeatherError::MissingCoordinates`] before any I/O when either
    /// coordinate is absent.
    #[instrument(skip(self))]
    pub async fn fetch_forecast(
        &self,
        lat: Option<f64>,
        lon: Option<f64>,
    ) -> Result<Vec<ForecastSample>, WeatherError> {
        let (Some(lat), Some(lon)) = (lat, lon) else {
            return Err(WeatherError::MissingCoordinates);
        };

        let request = HttpRequest::get(
            format!("{}/forecast", self.config.base_url),
            self.config.forecast_timeout,
        )
        .param("lat", lat)
        .param("lon", lon)
        .param("appid", &self.config.api_key)
        .param("units", "metric")
        .param("lang", &self.config.language)
        .param("cnt", self.config.forecast_count);

        let body = self.execute(&request).await?;
        decode_forecast(&body)
    }

    /// Current weather, then the forecast at the coordinates it reports.
    pub async fn fetch_report(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let current = self.fetch_current(city).await?;
        let Some((lat, lon)) = derive_coordinates(&current).pair() else {
            return Err(WeatherError::MissingCoordinates);
        };
        let forecast = self.fetch_forecast(Some(lat), Some(lon)).await;
        if let Err(err) = &forecast {
            warn!(city, error = %err, "forecast unavailable");
        }
        Ok(WeatherReport {
            query: city.to_string(),
            current,
            forecast,
        })
    }

    async fn execute(&self, request: &HttpRequest) -> Result<String, WeatherError> {
        let policy = &self.config.retry;
        let mut backoff = policy.backoff();
        let mut attempt = 0_u32;

        loop {
            attempt += 1;
            let can_retry = attempt <= policy.max_retries;
            debug!(url = %request.url, attempt, "sending request");

            match self.transport.get(request).await {
                Ok(response) if response.status == 200 => return Ok(response.body),
                Ok(response) if can_retry && policy.is_retryable_status(response.status) => {
                    let delay = backoff.next_delay();
                    warn!(
                        url = %request.url,
                        status = response.status,
                        attempt,
                        ?delay,
                        "transient status, retrying"
                    );
                    sleep(delay).await;
                }
                Ok(response) => {
                    return Err(WeatherError::RequestFailure {
                        status: response.status,
                        attempts: attempt,
                    });
                }
                Err(err) if can_retry => {
                    let delay = backoff.next_delay();
                    warn!(url = %request.url, error = %err, attempt, ?delay, "transport error, retrying");
                    sleep(delay).await;
                }
                Err(err) => return Err(WeatherError::Network(err)),
            }
        }
    }
}

/// Pure extraction; absent coordinates stay absent.
pub fn derive_coordinates(current: &CurrentConditions) -> Coordinates {
    current.coordinates
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    weather: Vec<ConditionEntry>,
    main: CurrentMain,
    wind: CurrentWind,
    sys: SunTimes,
    #[serde(default)]
    name: String,
    coord: Option<CoordBlock>,
}

#[derive(Debug, Deserialize)]
struct ConditionEntry {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    feels_like: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentWind {
    speed: f64,
    deg: f64,
}

#[derive(Debug, Deserialize)]
struct SunTimes {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct CoordBlock {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    list: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    dt: i64,
    main: EntryMain,
    #[serde(default)]
    weather: Vec<ConditionEntry>,
    wind: Option<EntryWind>,
    #[serde(default)]
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct EntryMain {
    temp: f64,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct EntryWind {
    speed: Option<f64>,
    deg: Option<f64>,
}

fn decode_current(body: &str) -> Result<CurrentConditions, WeatherError> {
    let payload: CurrentPayload = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(format!("current weather: {e}")))?;

    let condition = payload.weather.into_iter().next();
    let coordinates = payload.coord.map_or_else(Coordinates::absent, |c| Coordinates {
        latitude: c.lat,
        longitude: c.lon,
    });

    Ok(CurrentConditions {
        city: payload.name,
        temperature_c: payload.main.temp,
        feels_like_c: payload.main.feels_like,
        humidity: payload.main.humidity,
        pressure_hpa: payload.main.pressure,
        wind_speed_ms: payload.wind.speed,
        wind_deg: payload.wind.deg,
        description: condition.as_ref().and_then(|c| c.description.clone()),
        icon: condition.and_then(|c| c.icon),
        sunrise: timestamp("sys.sunrise", payload.sys.sunrise)?,
        sunset: timestamp("sys.sunset", payload.sys.sunset)?,
        coordinates,
    })
}

fn decode_forecast(body: &str) -> Result<Vec<ForecastSample>, WeatherError> {
    let payload: ForecastPayload = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(format!("forecast: {e}")))?;
    Ok(parse_samples(payload.list))
}

fn parse_samples(entries: Vec<serde_json::Value>) -> Vec<ForecastSample> {
    let mut out = Vec::with_capacity(entries.len());
    for (index, value) in entries.into_iter().enumerate() {
        let entry = match serde_json::from_value::<ForecastEntry>(value) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(index, error = %err, "skipping malformed forecast entry");
                continue;
            }
        };
        let Some(time) = DateTime::from_timestamp(entry.dt, 0) else {
            warn!(index, dt = entry.dt, "skipping forecast entry with bad timestamp");
            continue;
        };

        let condition = entry.weather.into_iter().next();
        out.push(ForecastSample {
            time,
            temperature_c: entry.main.temp,
            feels_like_c: entry.main.feels_like,
            humidity: entry.main.humidity,
            wind_speed_ms: entry.wind.as_ref().and_then(|w| w.speed),
            wind_deg: entry.wind.as_ref().and_then(|w| w.deg),
            pop: entry.pop,
            description: condition.as_ref().and_then(|c| c.description.clone()),
            icon: condition.and_then(|c| c.icon),
        });
    }
    out
}

fn timestamp(field: &str, secs: i64) -> Result<DateTime<Utc>, WeatherError> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        WeatherError::MalformedResponse(format!("{field} out of range: {secs}"))
    })
}
