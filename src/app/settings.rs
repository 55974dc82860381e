use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::FixedOffset;

use crate::{
    cli::Cli,
    data::{assistant::AssistantConfig, openweather::WeatherConfig},
    domain::{
        aggregate::ForecastAggregator,
        weather::{LocaleLabels, fixed_offset},
    },
};

pub const CONFIG_DIR_ENV: &str = "WEATHER_REPORT_CONFIG_DIR";
const LAST_CITY_FILE: &str = "last_city.txt";

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    pub weather: WeatherConfig,
    /// `None` when no assistant key is configured.
    pub assistant: Option<AssistantConfig>,
    pub utc_offset: FixedOffset,
    pub labels: LocaleLabels,
}

impl RuntimeSettings {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        cli.validate()?;
        let api_key = cli.api_key.as_deref().unwrap_or_default().trim();

        let weather = WeatherConfig::new(api_key)
            .with_base_url(&cli.base_url)
            .with_language(cli.lang.trim());

        let assistant = cli
            .assistant_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| {
                AssistantConfig::new(key)
                    .with_base_url(&cli.assistant_url)
                    .with_model(&cli.assistant_model)
            });

        Ok(Self {
            weather,
            assistant,
            utc_offset: fixed_offset(cli.utc_offset),
            labels: LocaleLabels::for_language(&cli.lang),
        })
    }

    pub fn aggregator(&self) -> ForecastAggregator {
        ForecastAggregator::new(self.utc_offset, self.labels)
    }
}

/// Single-line store for the last successfully queried city.
#[derive(Debug, Clone)]
pub struct LastCityStore {
    path: Option<PathBuf>,
}

impl LastCityStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn from_env() -> Self {
        Self {
            path: config_dir().map(|dir| dir.join(LAST_CITY_FILE)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Option<String> {
        let content = fs::read_to_string(self.path.as_ref()?).ok()?;
        let city = content.lines().next()?.trim();
        (!city.is_empty()).then(|| city.to_string())
    }

    pub fn save(&self, city: &str) -> anyhow::Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let city = city.trim();
        if city.is_empty() {
            anyhow::bail!("refusing to store an empty city name");
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("creating config directory failed")?;
        }
        fs::write(path, city).context("writing last city file failed")
    }
}

pub fn config_dir() -> Option<PathBuf> {
    if let Some(base) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(base));
    }

    let home = std::env::var_os("HOME")?;
    Some(PathBuf::from(home).join(".config").join("weather-report"))
}
