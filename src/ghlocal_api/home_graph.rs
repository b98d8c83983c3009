//! Client for the Google Home foyer `GetHomeGraph` call, which lists the
//! devices on the account together with their local auth tokens.

use crate::ghlocal_api::models::google_device::GoogleDevice;
use anyhow::Context;
use std::time::Duration;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, ClientTlsConfig};

const HOME_GRAPH_URL: &str = "https://googlehomefoyer-pa.googleapis.com";
const HOME_GRAPH_DOMAIN: &str = "googlehomefoyer-pa.googleapis.com";
const GET_HOME_GRAPH_PATH: &str = "/google.internal.home.foyer.v1.StructuresService/GetHomeGraph";

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetHomeGraphRequest {
    #[prost(string, tag = "1")]
    pub string1: String,
    #[prost(string, tag = "2")]
    pub num2: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetHomeGraphResponse {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(message, optional, tag = "2")]
    pub home: Option<Home>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Home {
    #[prost(message, repeated, tag = "4")]
    pub devices: Vec<HomeDevice>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct HomeDevice {
    #[prost(string, tag = "2")]
    pub local_auth_token: String,
    #[prost(message, optional, tag = "3")]
    pub device_info: Option<DeviceInfo>,
    #[prost(string, tag = "7")]
    pub device_name: String,
    #[prost(message, optional, tag = "9")]
    pub hardware: Option<Hardware>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeviceInfo {
    #[prost(string, tag = "1")]
    pub device_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Hardware {
    #[prost(string, tag = "2")]
    pub model: String,
}

pub struct HomeGraphClient {
    timeout: Duration,
}

impl HomeGraphClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn get_google_devices(&self, access_token: &str) -> anyhow::Result<Vec<GoogleDevice>> {
        let tls = ClientTlsConfig::new()
            .with_webpki_roots()
            .domain_name(HOME_GRAPH_DOMAIN);
        let channel = Channel::from_static(HOME_GRAPH_URL)
            .tls_config(tls)?
            .timeout(self.timeout)
            .connect()
            .await
            .context("Unable to connect to the home graph service")?;

        let mut grpc = tonic::client::Grpc::new(channel);
        grpc.ready()
            .await
            .context("Home graph channel is not ready")?;

        let authorization: MetadataValue<Ascii> = format!("Bearer {}", access_token).parse()?;
        let mut request = tonic::Request::new(GetHomeGraphRequest::default());
        request.metadata_mut().insert("authorization", authorization);

        let codec = ProstCodec::<GetHomeGraphRequest, GetHomeGraphResponse>::default();
        let response = grpc
            .unary(request, PathAndQuery::from_static(GET_HOME_GRAPH_PATH), codec)
            .await
            .context("GetHomeGraph call failed")?;

        Ok(devices_from_home_graph(response.into_inner()))
    }
}

/// Devices without a local auth token cannot be reached locally and are skipped.
pub fn devices_from_home_graph(response: GetHomeGraphResponse) -> Vec<GoogleDevice> {
    response
        .home
        .map(|home| home.devices)
        .unwrap_or_default()
        .into_iter()
        .filter(|device| !device.local_auth_token.is_empty())
        .map(|device| GoogleDevice {
            device_id: device.device_info.map(|info| info.device_id).unwrap_or_default(),
            device_name: device.device_name,
            local_auth_token: device.local_auth_token,
            hardware: device
                .hardware
                .map(|hardware| hardware.model)
                .filter(|model| !model.is_empty()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    fn home_device(name: &str, token: &str) -> HomeDevice {
        HomeDevice {
            local_auth_token: token.to_string(),
            device_info: Some(DeviceInfo {
                device_id: format!("{}-id", name),
            }),
            device_name: name.to_string(),
            hardware: Some(Hardware {
                model: "Google Nest Hub".to_string(),
            }),
        }
    }

    #[test]
    fn maps_devices_with_tokens() {
        let response = GetHomeGraphResponse {
            request_id: "req".to_string(),
            home: Some(Home {
                devices: vec![home_device("Kitchen", "token-1"), home_device("Light", "")],
            }),
        };

        let devices = devices_from_home_graph(response);

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].device_name, "Kitchen");
        assert_eq!(devices[0].device_id, "Kitchen-id");
        assert_eq!(devices[0].local_auth_token, "token-1");
        assert_eq!(devices[0].hardware.as_deref(), Some("Google Nest Hub"));
    }

    #[test]
    fn missing_home_means_no_devices() {
        assert!(devices_from_home_graph(GetHomeGraphResponse::default()).is_empty());
    }

    #[test]
    fn response_survives_wire_encoding() {
        let response = GetHomeGraphResponse {
            request_id: String::new(),
            home: Some(Home {
                devices: vec![home_device("Bedroom", "token-2")],
            }),
        };

        let decoded = GetHomeGraphResponse::decode(response.encode_to_vec().as_slice()).unwrap();
        let devices = devices_from_home_graph(decoded);

        assert_eq!(devices[0].device_name, "Bedroom");
        assert_eq!(devices[0].local_auth_token, "token-2");
    }
}
