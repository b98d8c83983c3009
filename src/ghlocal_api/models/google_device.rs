use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// A device registered on the Google account, as reported by the home graph.
#[derive(Serialize, Deserialize, Clone, PartialEq)]
pub struct GoogleDevice {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "deviceName")]
    pub device_name: String,
    #[serde(rename = "localAuthToken")]
    pub local_auth_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,
}

// Keeps the local auth token out of logs.
impl Debug for GoogleDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleDevice")
            .field("device_id", &self.device_id)
            .field("device_name", &self.device_name)
            .field("hardware", &self.hardware)
            .finish_non_exhaustive()
    }
}
