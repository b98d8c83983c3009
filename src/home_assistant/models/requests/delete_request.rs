use serde::{Deserialize, Serialize};

/// Payload of the delete command topic.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DeleteTimerOrAlarmRequest {
    pub id: String,
}

