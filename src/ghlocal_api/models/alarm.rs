use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// An alarm entry exactly as the device reports it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RawAlarm {
    /// Epoch milliseconds, integral or fractional.
    pub fire_time: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Alarm {
    pub fire_time: Number,
    /// UTC, `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
    pub date_time: String,
    /// Local wall clock, `YYYY-MM-DD HH:MM:SS`.
    pub local_time: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Alarm {
    pub fn id(&self) -> Option<&str> {
        self.extra.get("id").and_then(Value::as_str)
    }
}
