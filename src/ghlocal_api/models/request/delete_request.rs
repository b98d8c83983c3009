use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DeleteRequest {
    pub ids: Vec<String>,
}

impl DeleteRequest {
    pub fn single(id: &str) -> Self {
        Self {
            ids: vec![id.to_string()],
        }
    }
}
