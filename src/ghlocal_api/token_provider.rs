use crate::ghlocal_api::google_auth_client::GoogleAuthClient;
use crate::ghlocal_api::home_graph::HomeGraphClient;
use crate::ghlocal_api::models::google_device::GoogleDevice;
use async_trait::async_trait;
use tracing::debug;

/// Source of the per-device local auth tokens registered on a Google account.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocalTokenProvider: Send + Sync {
    async fn get_google_devices(&self) -> anyhow::Result<Vec<GoogleDevice>>;

    /// Drops anything cached so the next call fetches fresh tokens.
    async fn invalidate(&self);
}

pub struct GoogleAccountTokenProvider {
    auth_client: GoogleAuthClient,
    home_graph_client: HomeGraphClient,
}

impl GoogleAccountTokenProvider {
    pub fn new(auth_client: GoogleAuthClient, home_graph_client: HomeGraphClient) -> Self {
        Self {
            auth_client,
            home_graph_client,
        }
    }
}

#[async_trait]
impl LocalTokenProvider for GoogleAccountTokenProvider {
    async fn get_google_devices(&self) -> anyhow::Result<Vec<GoogleDevice>> {
        let access_token = self.auth_client.get_access_token().await?;
        let devices = self.home_graph_client.get_google_devices(&access_token).await?;
        debug!("Home graph returned {} devices with local tokens", devices.len());
        Ok(devices)
    }

    async fn invalidate(&self) {
        self.auth_client.clear_access_token().await;
    }
}
