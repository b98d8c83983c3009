use crate::ghlocal_api::ghlocal_client::GhLocalClient;
use crate::ghlocal_api::models::alarm::Alarm;
use crate::sensors::{STATE_OFF, Sensor};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

pub struct AlarmSensor {
    name: String,
    client: Arc<GhLocalClient>,
    state: Option<String>,
    alarms: Vec<Alarm>,
}

impl AlarmSensor {
    pub fn new(client: Arc<GhLocalClient>) -> Self {
        Self {
            name: format!("{} alarms", client.device_name()),
            client,
            state: None,
            alarms: Vec::new(),
        }
    }
}

#[async_trait]
impl Sensor for AlarmSensor {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "alarms"
    }

    fn icon(&self) -> &'static str {
        "mdi:alarm-multiple"
    }

    fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    fn attributes(&self) -> serde_json::Value {
        json!({ "alarms": self.alarms })
    }

    async fn update(&mut self) {
        self.client.refresh().await;
        self.alarms = self.client.alarms().await;

        // the device lists the next alarm first
        let state = match self.alarms.first() {
            Some(alarm) => alarm.date_time.clone(),
            None => STATE_OFF.to_string(),
        };
        self.state = Some(state);
    }
}
