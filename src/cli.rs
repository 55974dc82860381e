#![allow(clippy::missing_errors_doc)]

use clap::Parser;

use crate::data::{
    assistant::{ASSISTANT_URL, DEFAULT_MODEL},
    openweather::{DEFAULT_LANGUAGE, OPENWEATHER_URL},
};

#[derive(Debug, Parser, Clone)]
#[command(
    name = "weather-report",
    version,
    about = "Current weather, 5-day forecast and clothing advice in the terminal"
)]
pub struct Cli {
    /// City name (default: last searched city)
    pub city: Option<String>,

    /// Language forwarded to the weather API (e.g. zh_cn, en)
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub lang: String,

    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Weather API base URL
    #[arg(long, default_value = OPENWEATHER_URL)]
    pub base_url: String,

    /// Display offset from UTC in hours (-12..14)
    #[arg(
        long,
        default_value_t = 8,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-12..=14)
    )]
    pub utc_offset: i32,

    /// Chat-completion API base URL for clothing advice
    #[arg(long, default_value = ASSISTANT_URL)]
    pub assistant_url: String,

    /// Chat-completion model
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub assistant_model: String,

    /// Chat-completion API key (assistant disabled when unset)
    #[arg(long, env = "WEATHER_ASSISTANT_API_KEY", hide_env_values = true)]
    pub assistant_key: Option<String>,

    /// Print a weather report to stdout and exit (non-interactive)
    #[arg(long)]
    pub one_shot: bool,
}

impl Cli {
    /// City given on the command line, trimmed; blank counts as absent.
    #[must_use]
    pub fn requested_city(&self) -> Option<String> {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .map(ToString::to_string)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(()),
            _ => anyhow::bail!(
                "an OpenWeatherMap API key is required (--api-key or OPENWEATHER_API_KEY)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_defaults() {
        let cli = Cli::parse_from(["weather-report", "--api-key", "k"]);
        assert_eq!(cli.lang, "zh_cn");
        assert_eq!(cli.utc_offset, 8);
        assert_eq!(cli.base_url, "https://api.openweathermap.org/data/2.5");
        assert_eq!(cli.assistant_model, "gpt-4o-mini");
        assert!(!cli.one_shot);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn parses_negative_offset() {
        let cli = Cli::parse_from(["weather-report", "--utc-offset", "-5"]);
        assert_eq!(cli.utc_offset, -5);
    }

    #[test]
    fn rejects_offset_out_of_range() {
        let err = Cli::try_parse_from(["weather-report", "--utc-offset", "20"])
            .expect_err("expected range error");
        assert!(err.to_string().contains("--utc-offset"));
    }

    #[test]
    fn blank_api_key_fails_validation() {
        let cli = Cli::parse_from(["weather-report", "--api-key", "  "]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn requested_city_is_trimmed() {
        let cli = Cli::parse_from(["weather-report", "  London "]);
        assert_eq!(cli.requested_city().as_deref(), Some("London"));

        let cli = Cli::parse_from(["weather-report", "   "]);
        assert_eq!(cli.requested_city(), None);
    }
}
