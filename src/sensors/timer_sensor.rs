use crate::ghlocal_api::ghlocal_client::GhLocalClient;
use crate::ghlocal_api::models::timer::Timer;
use crate::sensors::{STATE_OFF, STATE_ON, Sensor};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct TimerSensor {
    name: String,
    client: Arc<GhLocalClient>,
    state: Option<String>,
    timers: Vec<Timer>,
}

impl TimerSensor {
    pub fn new(client: Arc<GhLocalClient>) -> Self {
        Self {
            name: format!("{} timers", client.device_name()),
            client,
            state: None,
            timers: Vec::new(),
        }
    }
}

#[async_trait]
impl Sensor for TimerSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "timers"
    }

    fn icon(&self) -> &'static str {
        "mdi:timer-sand"
    }

    fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    fn attributes(&self) -> serde_json::Value {
        json!({ "timers": self.timers })
    }

    async fn update(&mut self) {
        self.client.refresh().await;
        self.timers = self.client.timers().await;

        let state = if self.timers.is_empty() {
            STATE_OFF
        } else {
            STATE_ON
        };
        self.state = Some(state.to_string());
    }
}
