use crate::ghlocal_api::models::google_device::GoogleDevice;
use crate::ghlocal_api::token_provider::LocalTokenProvider;
use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

const DEVICES_KEY: &str = "devices";

pub struct CachedTokenProvider<T>
where
    T: LocalTokenProvider,
{
    provider: T,
    devices_cache: Cache<&'static str, Vec<GoogleDevice>>,
}

impl<T> CachedTokenProvider<T>
where
    T: LocalTokenProvider,
{
    pub fn new(provider: T, time_to_live: Duration) -> Self {
        Self {
            provider,
            devices_cache: Cache::builder().time_to_live(time_to_live).build(),
        }
    }
}

#[async_trait]
impl<T> LocalTokenProvider for CachedTokenProvider<T>
where
    T: LocalTokenProvider,
{
    async fn get_google_devices(&self) -> Result<Vec<GoogleDevice>> {
        self.devices_cache
            .try_get_with(DEVICES_KEY, async { self.provider.get_google_devices().await })
            .await
            .map_err(|e| anyhow::anyhow!("Failed to fetch Google devices: {:#}", e))
    }

    async fn invalidate(&self) {
        self.devices_cache.invalidate(DEVICES_KEY).await;
        self.provider.invalidate().await;
    }
}
