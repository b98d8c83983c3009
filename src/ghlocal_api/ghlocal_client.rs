use crate::ghlocal_api::device_transport::{DeviceResponse, DeviceTransport};
use crate::ghlocal_api::error::GhLocalError;
use crate::ghlocal_api::models::alarm::Alarm;
use crate::ghlocal_api::models::request::delete_request::DeleteRequest;
use crate::ghlocal_api::models::response::alarms_response::AlarmsResponse;
use crate::ghlocal_api::models::response::delete_response::DeleteResponse;
use crate::ghlocal_api::models::timer::Timer;
use crate::ghlocal_api::normalizer::{normalize_alarms, normalize_timers};
use crate::ghlocal_api::token_provider::LocalTokenProvider;
use chrono::Local;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

const ALARMS_ENDPOINT: &str = "/setup/assistant/alarms";
const DELETE_ENDPOINT: &str = "/setup/assistant/alarms/delete";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub timers: Vec<Timer>,
    pub alarms: Vec<Alarm>,
}

/// Client for the timers and alarms exposed by a Google Home device on the LAN.
pub struct GhLocalClient {
    token_provider: Arc<dyn LocalTokenProvider>,
    transport: Arc<dyn DeviceTransport>,
    device_name: String,
    base_url: String,
    snapshot: RwLock<Snapshot>,
}

impl GhLocalClient {
    pub fn new(
        token_provider: Arc<dyn LocalTokenProvider>,
        transport: Arc<dyn DeviceTransport>,
        device_ip: &str,
        device_port: u16,
        device_name: &str,
    ) -> Self {
        Self {
            token_provider,
            transport,
            device_name: device_name.to_string(),
            base_url: format!("https://{}:{}", device_ip, device_port),
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub async fn timers(&self) -> Vec<Timer> {
        self.snapshot.read().await.timers.clone()
    }

    pub async fn alarms(&self) -> Vec<Alarm> {
        self.snapshot.read().await.alarms.clone()
    }

    async fn local_token(&self) -> Result<String, GhLocalError> {
        let devices = self
            .token_provider
            .get_google_devices()
            .await
            .map_err(GhLocalError::TokenProvider)?;

        devices
            .into_iter()
            .find(|device| device.device_name == self.device_name)
            .map(|device| device.local_auth_token)
            .ok_or_else(|| GhLocalError::DeviceNotFound(self.device_name.clone()))
    }

    async fn check_status(&self, response: &DeviceResponse) -> Result<(), GhLocalError> {
        if response.is_success() {
            return Ok(());
        }
        let error = GhLocalError::UnexpectedStatus(response.status);
        if error.is_unauthorized() {
            debug!("Device rejected the local auth token, dropping cached tokens");
            self.token_provider.invalidate().await;
        }
        Err(error)
    }

    /// Fetches timers and alarms and replaces the snapshot. The snapshot is
    /// only written when every step succeeds.
    pub async fn try_refresh(&self) -> Result<(), GhLocalError> {
        let local_token = self.local_token().await?;
        let url = format!("{}{}", self.base_url, ALARMS_ENDPOINT);

        let response = self
            .transport
            .get(&url, &local_token)
            .await
            .map_err(GhLocalError::Transport)?;
        self.check_status(&response).await?;

        let snapshot = parse_alarms_body(&response.body)?;
        debug!(
            "Device reported {} timers and {} alarms",
            snapshot.timers.len(),
            snapshot.alarms.len()
        );

        let mut write_lock = self.snapshot.write().await;
        *write_lock = snapshot;
        Ok(())
    }

    /// Like [`try_refresh`](Self::try_refresh) but only logs failures, keeping the
    /// previous snapshot.
    pub async fn refresh(&self) {
        if let Err(e) = self.try_refresh().await {
            error!("Refreshing timers and alarms of {} failed: {}", self.device_name, e);
        }
    }

    pub async fn try_delete(&self, id: &str) -> Result<(), GhLocalError> {
        let local_token = self.local_token().await?;
        let url = format!("{}{}", self.base_url, DELETE_ENDPOINT);
        let body = serde_json::to_string(&DeleteRequest::single(id))
            .map_err(|e| GhLocalError::Transport(e.into()))?;

        let response = self
            .transport
            .post(&url, &local_token, body)
            .await
            .map_err(GhLocalError::Transport)?;
        self.check_status(&response).await?;

        let result: DeleteResponse = serde_json::from_str(&response.body)
            .map_err(|e| GhLocalError::MalformedResponse(e.to_string()))?;
        if !result.is_success() {
            return Err(GhLocalError::Rejected);
        }
        Ok(())
    }

    pub async fn delete(&self, id: &str) {
        match self.try_delete(id).await {
            Ok(()) => info!("Deleted {} on {}", id, self.device_name),
            Err(e) => error!("Deleting {} on {} failed: {}", id, self.device_name, e),
        }
    }
}

fn parse_alarms_body(body: &str) -> Result<Snapshot, GhLocalError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| GhLocalError::MalformedResponse(e.to_string()))?;

    if value.get("timer").is_none() || value.get("alarm").is_none() {
        return Err(GhLocalError::MalformedResponse(
            "expected both \"timer\" and \"alarm\"".to_string(),
        ));
    }

    let response: AlarmsResponse =
        serde_json::from_value(value).map_err(|e| GhLocalError::MalformedResponse(e.to_string()))?;

    let timers = normalize_timers(&response.timer, &Local).ok_or_else(|| {
        GhLocalError::MalformedResponse("timer timestamp out of range".to_string())
    })?;
    let alarms = normalize_alarms(&response.alarm, &Local).ok_or_else(|| {
        GhLocalError::MalformedResponse("alarm timestamp out of range".to_string())
    })?;

    for timer in &timers {
        debug!("Timer {:?} fires at {}", timer.id(), timer.date_time);
    }
    for alarm in &alarms {
        debug!("Alarm {:?} fires at {}", alarm.id(), alarm.local_time);
    }

    Ok(Snapshot { timers, alarms })
}
