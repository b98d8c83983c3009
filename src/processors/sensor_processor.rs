use crate::home_assistant::availability::{Availability, AvailabilityState};
use crate::home_assistant::device::Device;
use crate::home_assistant::sensor::SensorDiscoveryPayload;
use crate::home_assistant::topics::Topics;
use crate::sensors::Sensor;
use dashmap::DashSet;
use rumqttc::QoS;
use std::sync::Arc;
use tokio::join;
use tracing::{error, trace};

/// Publishes sensors to Home Assistant over MQTT discovery.
#[derive(Clone)]
pub struct SensorProcessor {
    pub ha_client: rumqttc::AsyncClient,
    pub topics: Topics,
    pub device: Device,
    /// Unique ids whose discovery config went out in the current MQTT session.
    pub published_discovery: Arc<DashSet<String>>,
}

impl SensorProcessor {
    pub fn discovery_payload(&self, sensor: &dyn Sensor) -> SensorDiscoveryPayload {
        let kind = sensor.kind();
        SensorDiscoveryPayload {
            device: self.device.clone(),
            name: sensor.name().to_string(),
            unique_id: self.topics.unique_id(kind),
            state_topic: self.topics.state(kind),
            icon: Some(sensor.icon().to_string()),
            json_attributes_topic: Some(self.topics.attributes(kind)),
            availability: Some(vec![Availability::online_offline(
                &self.topics.availability(),
            )]),
            availability_mode: None, //defaults to "latest"
        }
    }

    pub async fn publish_availability(&self, state: AvailabilityState) -> anyhow::Result<()> {
        self.ha_client
            .publish(
                self.topics.availability(),
                QoS::AtLeastOnce,
                true,
                state.as_serde_value(),
            )
            .await?;
        Ok(())
    }

    pub async fn publish(&self, sensor: &dyn Sensor) -> anyhow::Result<()> {
        let kind = sensor.kind();
        let unique_id = self.topics.unique_id(kind);

        if self.published_discovery.insert(unique_id.clone()) {
            let discovery_payload = serde_json::to_string(&self.discovery_payload(sensor))?;
            trace!("{}", discovery_payload);

            if let Err(e) = self
                .ha_client
                .publish(
                    self.topics.discovery(&unique_id),
                    QoS::AtLeastOnce,
                    true,
                    discovery_payload,
                )
                .await
            {
                // try again on the next tick
                self.published_discovery.remove(&unique_id);
                return Err(e.into());
            }
        }

        let Some(state) = sensor.state() else {
            return Ok(());
        };
        let state_topic = self.topics.state(kind);
        match join!(
            self.ha_client
                .publish(&state_topic, QoS::AtMostOnce, true, state.to_string()),
            self.ha_client.publish(
                self.topics.attributes(kind),
                QoS::AtMostOnce,
                true,
                serde_json::to_string(&sensor.attributes())?,
            )
        ) {
            (Err(e), _) | (_, Err(e)) => {
                error!("Error publishing to {}: {:?}", state_topic, e);
                Err(anyhow::Error::from(e))
            }
            _ => Ok(()),
        }
    }
}
