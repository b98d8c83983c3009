use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A timer entry exactly as the device reports it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawTimer {
    /// Epoch milliseconds, integral or fractional.
    pub fire_time: Number,
    /// Milliseconds.
    pub original_duration: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A timer decorated with human readable fields.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Timer {
    pub fire_time: Number,
    pub original_duration: Number,
    /// Local wall clock `HH:MM:SS` at which the timer fires.
    pub date_time: String,
    /// `HH:MM:SS` of the original duration.
    pub duration: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Timer {
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }
}
