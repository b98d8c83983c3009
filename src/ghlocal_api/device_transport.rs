use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub const LOCAL_AUTH_HEADER: &str = "cast-local-authorization-token";

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceResponse {
    pub status: u16,
    pub body: String,
}

impl DeviceResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP access to the device's local setup API.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTransport: Send + Sync {
    async fn get(&self, url: &str, local_token: &str) -> anyhow::Result<DeviceResponse>;

    async fn post(&self, url: &str, local_token: &str, body: String) -> anyhow::Result<DeviceResponse>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            // the device serves a self-signed certificate
            .danger_accept_invalid_certs(true)
            .timeout(timeout)
            .build()
            .context("Unable to build device HTTP client")?;
        Ok(Self { client })
    }

    async fn into_device_response(response: reqwest::Response) -> anyhow::Result<DeviceResponse> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(DeviceResponse { status, body })
    }
}

#[async_trait]
impl DeviceTransport for ReqwestTransport {
    async fn get(&self, url: &str, local_token: &str) -> anyhow::Result<DeviceResponse> {
        let response = self
            .client
            .get(url)
            .header(LOCAL_AUTH_HEADER, local_token)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        Self::into_device_response(response).await
    }

    async fn post(&self, url: &str, local_token: &str, body: String) -> anyhow::Result<DeviceResponse> {
        let response = self
            .client
            .post(url)
            .header(LOCAL_AUTH_HEADER, local_token)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", url))?;
        Self::into_device_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_2xx_is_success() {
        let response = |status| DeviceResponse {
            status,
            body: String::new(),
        };

        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(301).is_success());
        assert!(!response(401).is_success());
        assert!(!response(500).is_success());
    }
}
