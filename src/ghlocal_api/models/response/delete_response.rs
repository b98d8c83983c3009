use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct DeleteResponse {
    #[serde(default)]
    pub success: Option<bool>,
}

impl DeleteResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
    }
}
