use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::{
    app::{
        events::{AppEvent, spawn_assistant_query, spawn_weather_fetch},
        settings::{LastCityStore, RuntimeSettings},
    },
    data::{
        assistant::{AssistantClient, CLOTHING_QUESTION},
        openweather::{WeatherClient, WeatherReport},
    },
    domain::aggregate::ForecastAggregator,
};

pub const EMPTY_CITY_HINT: &str = "Please enter a city name";
pub const ASSISTANT_UNAVAILABLE: &str =
    "Assistant unavailable: set --assistant-key or WEATHER_ASSISTANT_API_KEY to enable it.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    CityPrompt,
    Loading,
    Ready,
    Error,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Current,
    Forecast,
    Assistant,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Current, Panel::Forecast, Panel::Assistant];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Current => "Current",
            Panel::Forecast => "Forecast",
            Panel::Assistant => "Assistant",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Panel::Current => 0,
            Panel::Forecast => 1,
            Panel::Assistant => 2,
        }
    }

    fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatEntry {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub running: bool,
    pub panel: Panel,
    pub city_input: String,
    pub city_hint: Option<String>,
    /// City of the most recent fetch, used by retry.
    pub active_city: Option<String>,
    pub report: Option<WeatherReport>,
    pub last_error: Option<String>,
    pub forecast_scroll: usize,
    pub chat: Vec<ChatEntry>,
    pub chat_input: String,
    pub assistant_pending: bool,
    /// Bumped per loaded report; replies from older reports are dropped.
    pub chat_generation: u64,
    pub fetch_in_flight: bool,
    pub aggregator: ForecastAggregator,
    weather: Arc<WeatherClient>,
    assistant: Option<Arc<AssistantClient>>,
    store: LastCityStore,
}

impl AppState {
    pub fn new(settings: &RuntimeSettings, store: LastCityStore) -> Result<Self> {
        let weather = WeatherClient::new(settings.weather.clone())
            .context("building weather client failed")?;
        let assistant = settings
            .assistant
            .clone()
            .map(AssistantClient::new)
            .transpose()
            .context("building assistant client failed")?
            .map(Arc::new);

        Ok(Self {
            mode: AppMode::CityPrompt,
            running: true,
            panel: Panel::Current,
            city_input: store.load().unwrap_or_default(),
            city_hint: None,
            active_city: None,
            report: None,
            last_error: None,
            forecast_scroll: 0,
            chat: Vec::new(),
            chat_input: String::new(),
            assistant_pending: false,
            chat_generation: 0,
            fetch_in_flight: false,
            aggregator: settings.aggregator(),
            weather: Arc::new(weather),
            assistant,
            store,
        })
    }

    /// Fetches `city` right away when given, otherwise waits at the city prompt.
    pub fn start(&mut self, city: Option<String>, tx: &mpsc::Sender<AppEvent>) {
        match city {
            Some(city) => {
                self.city_input = city;
                self.submit_city(tx);
            }
            None => self.mode = AppMode::CityPrompt,
        }
    }

    pub fn assistant_enabled(&self) -> bool {
        self.assistant.is_some()
    }

    pub async fn handle_event(
        &mut self,
        event: AppEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match event {
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::WeatherLoaded(report) => self.apply_report(*report, tx),
            AppEvent::FetchFailed { city, message } => {
                self.fetch_in_flight = false;
                self.mode = AppMode::Error;
                self.last_error = Some(format!("Unable to fetch weather for {city}: {message}"));
            }
            AppEvent::AssistantReplied { generation, reply } => {
                if generation != self.chat_generation {
                    debug!(
                        generation,
                        current = self.chat_generation,
                        "dropping stale assistant reply"
                    );
                    return Ok(());
                }
                self.assistant_pending = false;
                let entry = match reply {
                    Ok(text) => ChatEntry::new(Speaker::Assistant, text),
                    Err(err) => ChatEntry::new(Speaker::System, format!("Error: {err}")),
                };
                self.chat.push(entry);
            }
            AppEvent::Quit => {
                self.mode = AppMode::Quit;
            }
        }

        Ok(())
    }

    fn apply_report(&mut self, report: WeatherReport, tx: &mpsc::Sender<AppEvent>) {
        self.fetch_in_flight = false;
        if let Err(err) = self.store.save(&report.query) {
            warn!(error = %err, "saving last city failed");
        }
        self.city_input = report.query.clone();
        self.report = Some(report);
        self.mode = AppMode::Ready;
        self.last_error = None;
        self.forecast_scroll = 0;
        self.chat.clear();
        self.chat_input.clear();
        self.assistant_pending = false;
        self.chat_generation = self.chat_generation.wrapping_add(1);
        if self.panel == Panel::Assistant {
            self.open_assistant(tx);
        }
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if is_ctrl_c(key) {
            tx.send(AppEvent::Quit).await?;
            return Ok(());
        }

        match self.mode {
            AppMode::CityPrompt => self.handle_city_prompt_key(key, tx).await?,
            AppMode::Loading | AppMode::Quit => {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
                    tx.send(AppEvent::Quit).await?;
                }
            }
            AppMode::Error => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => tx.send(AppEvent::Quit).await?,
                KeyCode::Char('r') | KeyCode::Enter => self.retry(tx),
                KeyCode::Char('c') => self.open_city_prompt(),
                _ => {}
            },
            AppMode::Ready if self.panel == Panel::Assistant => {
                self.handle_assistant_key(key, tx).await?;
            }
            AppMode::Ready => self.handle_ready_key(key, tx).await?,
        }

        Ok(())
    }

    async fn handle_city_prompt_key(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Esc if self.report.is_some() => {
                self.city_hint = None;
                self.mode = AppMode::Ready;
            }
            KeyCode::Esc => tx.send(AppEvent::Quit).await?,
            KeyCode::Enter => self.submit_city(tx),
            KeyCode::Backspace => {
                self.city_input.pop();
            }
            KeyCode::Char(ch) if is_city_char(ch) && !has_command_modifier(key) => {
                self.city_input.push(ch);
                self.city_hint = None;
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_ready_key(&mut self, key: KeyEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => tx.send(AppEvent::Quit).await?,
            KeyCode::Tab => self.switch_panel(self.panel.next(), tx),
            KeyCode::BackTab => self.switch_panel(self.panel.prev(), tx),
            KeyCode::Char('1') => self.switch_panel(Panel::Current, tx),
            KeyCode::Char('2') => self.switch_panel(Panel::Forecast, tx),
            KeyCode::Char('3') => self.switch_panel(Panel::Assistant, tx),
            KeyCode::Char('c') => self.open_city_prompt(),
            KeyCode::Char('r') => self.retry(tx),
            KeyCode::Up => self.forecast_scroll = self.forecast_scroll.saturating_sub(1),
            KeyCode::Down => {
                let max = self.forecast_days().saturating_sub(1);
                self.forecast_scroll = (self.forecast_scroll + 1).min(max);
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_assistant_key(
        &mut self,
        key: KeyEvent,
        tx: &mpsc::Sender<AppEvent>,
    ) -> Result<()> {
        match key.code {
            KeyCode::Esc => tx.send(AppEvent::Quit).await?,
            KeyCode::Tab => self.switch_panel(self.panel.next(), tx),
            KeyCode::BackTab => self.switch_panel(self.panel.prev(), tx),
            KeyCode::Enter => self.send_chat_input(tx),
            KeyCode::Backspace => {
                self.chat_input.pop();
            }
            KeyCode::Char(ch) if !has_command_modifier(key) => self.chat_input.push(ch),
            _ => {}
        }
        Ok(())
    }

    /// Validates the prompt and starts a fetch; blank input only sets the hint.
    pub fn submit_city(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let city = self.city_input.trim().to_string();
        if city.is_empty() {
            self.city_hint = Some(EMPTY_CITY_HINT.to_string());
            self.mode = AppMode::CityPrompt;
            return;
        }
        self.city_hint = None;
        self.start_fetch(tx, city);
    }

    pub fn start_fetch(&mut self, tx: &mpsc::Sender<AppEvent>, city: String) {
        if self.fetch_in_flight {
            return;
        }
        info!(city = %city, "fetching weather");
        self.fetch_in_flight = true;
        self.mode = AppMode::Loading;
        self.active_city = Some(city.clone());
        spawn_weather_fetch(tx.clone(), Arc::clone(&self.weather), city);
    }

    fn retry(&mut self, tx: &mpsc::Sender<AppEvent>) {
        match self.active_city.clone() {
            Some(city) => self.start_fetch(tx, city),
            None => self.open_city_prompt(),
        }
    }

    fn open_city_prompt(&mut self) {
        self.mode = AppMode::CityPrompt;
        self.city_hint = None;
    }

    fn switch_panel(&mut self, panel: Panel, tx: &mpsc::Sender<AppEvent>) {
        self.panel = panel;
        if panel == Panel::Assistant {
            self.open_assistant(tx);
        }
    }

    /// First visit to the assistant panel asks for clothing advice.
    fn open_assistant(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if !self.chat.is_empty() || self.assistant_pending {
            return;
        }
        if self.assistant.is_none() {
            self.chat
                .push(ChatEntry::new(Speaker::System, ASSISTANT_UNAVAILABLE));
            return;
        }
        self.ask_assistant(tx, CLOTHING_QUESTION.to_string());
    }

    fn send_chat_input(&mut self, tx: &mpsc::Sender<AppEvent>) {
        let question = self.chat_input.trim().to_string();
        if question.is_empty() || self.assistant_pending {
            return;
        }
        self.chat_input.clear();
        if self.assistant.is_none() {
            self.chat
                .push(ChatEntry::new(Speaker::System, ASSISTANT_UNAVAILABLE));
            return;
        }
        self.ask_assistant(tx, question);
    }

    fn ask_assistant(&mut self, tx: &mpsc::Sender<AppEvent>, question: String) {
        let (Some(client), Some(report)) = (self.assistant.as_ref(), self.report.as_ref()) else {
            return;
        };
        self.chat.push(ChatEntry::new(Speaker::User, question.clone()));
        self.assistant_pending = true;
        spawn_assistant_query(
            tx.clone(),
            Arc::clone(client),
            report.current.clone(),
            question,
            self.chat_generation,
        );
    }

    fn forecast_days(&self) -> usize {
        self.report
            .as_ref()
            .and_then(|report| report.forecast.as_ref().ok())
            .map_or(0, |samples| self.aggregator.aggregate(samples).len())
    }
}

pub(crate) fn is_city_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '\'' | '’' | ',' | '.')
}

fn has_command_modifier(key: KeyEvent) -> bool {
    key.modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER)
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(ch) if ch.eq_ignore_ascii_case(&'c'))
}
