use std::sync::Arc;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc::Sender;
use tracing::warn;

use crate::{
    data::{
        assistant::AssistantClient,
        openweather::{WeatherClient, WeatherReport},
        transport::Transport,
    },
    domain::weather::CurrentConditions,
};

#[derive(Debug)]
pub enum AppEvent {
    Input(Event),
    WeatherLoaded(Box<WeatherReport>),
    FetchFailed { city: String, message: String },
    /// `generation` ties the reply to the report it was asked about.
    AssistantReplied {
        generation: u64,
        reply: Result<String, String>,
    },
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

pub fn spawn_weather_fetch<T>(tx: Sender<AppEvent>, client: Arc<WeatherClient<T>>, city: String)
where
    T: Transport + 'static,
{
    tokio::spawn(async move {
        let event = match client.fetch_report(&city).await {
            Ok(report) => AppEvent::WeatherLoaded(Box::new(report)),
            Err(err) => {
                warn!(city = %city, error = %err, "weather fetch failed");
                AppEvent::FetchFailed {
                    city,
                    message: err.to_string(),
                }
            }
        };
        let _ = tx.send(event).await;
    });
}

pub fn spawn_assistant_query(
    tx: Sender<AppEvent>,
    client: Arc<AssistantClient>,
    current: CurrentConditions,
    question: String,
    generation: u64,
) {
    tokio::spawn(async move {
        let reply = client
            .ask(&current, &question)
            .await
            .map_err(|err| err.to_string());
        if let Err(err) = &reply {
            warn!(error = %err, "assistant request failed");
        }
        let _ = tx
            .send(AppEvent::AssistantReplied { generation, reply })
            .await;
    });
}
