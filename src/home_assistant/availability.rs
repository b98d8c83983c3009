use serde::{Deserialize, Serialize};

/// Availability configuration of a Home Assistant entity.
///
/// Home Assistant watches `topic` and marks the entity unavailable when the
/// payload equals `payload_not_available`.
///
/// # Example
///
/// ```rust,ignore
/// let availability = Availability {
///     payload_available: Some("online".to_string()),
///     payload_not_available: Some("offline".to_string()),
///     topic: "ghlocal/kitchen_speaker/availability".to_string(),
///     value_template: None,
/// };
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_available: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_not_available: Option<String>,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_template: Option<String>,
}

impl Availability {
    pub fn online_offline(topic: &str) -> Self {
        Self {
            payload_available: Some(AvailabilityState::Online.as_serde_value().to_string()),
            payload_not_available: Some(AvailabilityState::Offline.as_serde_value().to_string()),
            topic: topic.to_string(),
            value_template: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum AvailabilityMode {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "any")]
    Any,
    #[serde(rename = "latest")]
    Latest,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum AvailabilityState {
    #[serde(rename = "online")]
    Online,
    #[serde(rename = "offline")]
    Offline,
}

impl AvailabilityState {
    pub fn as_serde_value(&self) -> &'static str {
        match self {
            AvailabilityState::Online => "online",
            AvailabilityState::Offline => "offline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_value_matches_rename() {
        for state in [AvailabilityState::Online, AvailabilityState::Offline] {
            let json = serde_json::to_value(state).unwrap();
            assert_eq!(json.as_str(), Some(state.as_serde_value()));
        }
    }
}
