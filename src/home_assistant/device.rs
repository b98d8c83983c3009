use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Device {
    pub identifiers: Vec<String>,
    pub manufacturer: String,
    pub model: String,
    pub name: String,
}

impl Device {
    pub fn google_home(device_name: &str, slug: &str) -> Self {
        Self {
            identifiers: vec![format!("ghlocal_{}", slug)],
            manufacturer: "Google".to_string(),
            model: "Google Home".to_string(),
            name: device_name.to_string(),
        }
    }
}
