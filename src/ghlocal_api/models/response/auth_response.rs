use std::collections::HashMap;

/// Body of the Android account auth endpoint: one `Key=Value` pair per line.
#[derive(Debug, Clone, Default)]
pub struct AuthResponse {
    fields: HashMap<String, String>,
}

impl AuthResponse {
    pub fn parse(body: &str) -> Self {
        let fields = body
            .lines()
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn error(&self) -> Option<&str> {
        self.get("Error")
    }

    /// Master token returned by a master login.
    pub fn token(&self) -> Option<&str> {
        self.get("Token")
    }

    /// OAuth access token returned by the token exchange.
    pub fn auth(&self) -> Option<&str> {
        self.get("Auth")
    }

    /// Access token expiry, epoch seconds.
    pub fn expiry(&self) -> Option<i64> {
        self.get("Expiry").and_then(|v| v.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_oauth_exchange_body() {
        let body = "issueAdvice=auto\nExpiry=1700003600\nExpiresInDurationSec=3599\nstoreConsentRemotely=0\nisTokenSnowballed=0\nAuth=ya29.a0Af_token==\n";
        let response = AuthResponse::parse(body);

        assert_eq!(response.auth(), Some("ya29.a0Af_token=="));
        assert_eq!(response.expiry(), Some(1_700_003_600));
        assert!(response.error().is_none());
    }

    #[test]
    fn parses_error_body() {
        let response = AuthResponse::parse("Error=BadAuthentication\n");

        assert_eq!(response.error(), Some("BadAuthentication"));
        assert!(response.token().is_none());
    }

    #[test]
    fn ignores_lines_without_separator() {
        let response = AuthResponse::parse("garbage\nToken=aas_et/xyz");
        assert_eq!(response.token(), Some("aas_et/xyz"));
    }
}
