use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhLocalError {
    #[error("No device named \"{0}\" is registered on the Google account")]
    DeviceNotFound(String),

    #[error("Unable to fetch local auth tokens: {0:#}")]
    TokenProvider(anyhow::Error),

    #[error("Request to device failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("API returned {0}")]
    UnexpectedStatus(u16),

    #[error("API returned unknown json structure: {0}")]
    MalformedResponse(String),

    #[error("API returned success false")]
    Rejected,
}

impl GhLocalError {
    /// The device refused the local auth token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GhLocalError::UnexpectedStatus(401 | 403))
    }
}
