use crate::ghlocal_api::models::response::auth_response::AuthResponse;
use anyhow::{Context, bail};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use chrono::Utc;
use rand::Rng;
use reqwest::header::USER_AGENT;
use rsa::{BigUint, Oaep, RsaPublicKey};
use sha1::{Digest, Sha1};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{error, info};

const AUTH_URL: &str = "https://android.clients.google.com/auth";
const AUTH_USER_AGENT: &str = "GoogleAuth/1.4";

const MASTER_LOGIN_SERVICE: &str = "ac2dm";
const MASTER_LOGIN_CLIENT_SIG: &str = "38918a453d07199354f8b19af05ec6562ced5788";

/// Google's Android login key: a length-prefixed modulus followed by a
/// length-prefixed public exponent.
const ANDROID_LOGIN_KEY: &str = "AAAAgMom/1a/v0lblO2Ubrt60J2gcuXSljGFQXgcyZWveWLEwo6prwgi3iJIZdodyhKZQrNWp5nKJ3srRXcUW+F1BD3baEVGcmEgqaLZUNBjm057pKRI16kB0YppeGx5qIQ5QjKzsR8ETQbKLNWgRY0QRNVz34kMJR3P/LgHax/6rmf5AAAAAwEAAQ==";

const ACCESS_TOKEN_SERVICE: &str = "oauth2:https://www.google.com/accounts/OAuthLogin";
const ACCESS_TOKEN_APP: &str = "com.google.android.apps.chromecast.app";
const ACCESS_TOKEN_CLIENT_SIG: &str = "24bb24c05e47e0aefa68a58a766179d9b613a600";
const DEFAULT_ACCESS_TOKEN_LIFETIME_SECONDS: i64 = 3600;

#[derive(Clone, Debug)]
struct AccessToken {
    token: String,
    expires_at: i64,
}

impl AccessToken {
    /// Check if the token is expired (with a 30s buffer)
    fn is_expired(&self) -> bool {
        Utc::now().timestamp() + 30 >= self.expires_at
    }
}

/// Android-style Google account authentication.
///
/// A master token is obtained once, from the configuration or by logging in
/// with the username and app password, and then exchanged for short-lived
/// access tokens for the Google Home app.
pub struct GoogleAuthClient {
    client: reqwest::Client,
    username: String,
    password: String,
    android_id: String,
    master_token: RwLock<Option<String>>,
    access_token: RwLock<Option<AccessToken>>,
}

impl GoogleAuthClient {
    pub fn new(
        username: &str,
        password: &str,
        master_token: Option<String>,
        android_id: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Unable to build account HTTP client")?;

        Ok(Self {
            client,
            username: username.to_string(),
            password: password.to_string(),
            android_id: android_id.unwrap_or_else(generate_android_id),
            master_token: RwLock::new(master_token),
            access_token: RwLock::new(None),
        })
    }

    async fn post_auth_form(&self, form: &[(&str, &str)]) -> anyhow::Result<AuthResponse> {
        let response = self
            .client
            .post(AUTH_URL)
            .header(USER_AGENT, AUTH_USER_AGENT)
            .form(form)
            .send()
            .await
            .context("Account auth request failed")?;
        let contents = response.text().await?;
        Ok(AuthResponse::parse(&contents))
    }

    async fn perform_master_login(&self) -> anyhow::Result<String> {
        let encrypted_password = encrypt_password(&self.username, &self.password)?;
        let form = [
            ("accountType", "HOSTED_OR_GOOGLE"),
            ("Email", self.username.as_str()),
            ("has_permission", "1"),
            ("add_account", "1"),
            ("EncryptedPasswd", encrypted_password.as_str()),
            ("service", MASTER_LOGIN_SERVICE),
            ("source", "android"),
            ("androidId", self.android_id.as_str()),
            ("device_country", "us"),
            ("operatorCountry", "us"),
            ("lang", "en"),
            ("sdk_version", "17"),
            ("client_sig", MASTER_LOGIN_CLIENT_SIG),
            ("callerSig", MASTER_LOGIN_CLIENT_SIG),
        ];
        let response = self.post_auth_form(&form).await?;

        if let Some(error) = response.error() {
            bail!("Master login failed: {}", error);
        }
        match response.token() {
            Some(token) => Ok(token.to_string()),
            None => bail!("Master login response did not contain a token"),
        }
    }

    async fn perform_oauth(&self, master_token: &str) -> anyhow::Result<AccessToken> {
        let form = [
            ("accountType", "HOSTED_OR_GOOGLE"),
            ("Email", self.username.as_str()),
            ("has_permission", "1"),
            ("EncryptedPasswd", master_token),
            ("service", ACCESS_TOKEN_SERVICE),
            ("source", "android"),
            ("androidId", self.android_id.as_str()),
            ("app", ACCESS_TOKEN_APP),
            ("client_sig", ACCESS_TOKEN_CLIENT_SIG),
            ("device_country", "us"),
            ("operatorCountry", "us"),
            ("lang", "en"),
            ("sdk_version", "17"),
        ];
        let response = self.post_auth_form(&form).await?;
        access_token_from_response(&response, Utc::now().timestamp())
    }

    async fn get_master_token(&self) -> anyhow::Result<String> {
        {
            let lock = self.master_token.read().await;
            if let Some(ref token) = *lock {
                return Ok(token.clone());
            }
        }

        let token = self.perform_master_login().await.inspect_err(|e| {
            error!("Failed to get master token via login: {}", e);
        })?;
        info!("Obtained master token for {}", self.username);

        let mut write_lock = self.master_token.write().await;
        *write_lock = Some(token.clone());
        Ok(token)
    }

    pub async fn get_access_token(&self) -> anyhow::Result<String> {
        {
            let lock = self.access_token.read().await;
            if let Some(ref token) = *lock
                && !token.is_expired()
            {
                return Ok(token.token.clone());
            }
        }

        let master_token = self.get_master_token().await?;
        let access_token = self.perform_oauth(&master_token).await.inspect_err(|e| {
            error!("Failed to exchange master token for an access token: {}", e);
        })?;
        info!(
            "Access token acquired, expires in {} sec",
            access_token.expires_at - Utc::now().timestamp()
        );

        let mut write_lock = self.access_token.write().await;
        *write_lock = Some(access_token.clone());
        Ok(access_token.token)
    }

    pub async fn clear_access_token(&self) {
        let mut write_lock = self.access_token.write().await;
        *write_lock = None;
    }
}

fn access_token_from_response(response: &AuthResponse, now: i64) -> anyhow::Result<AccessToken> {
    if let Some(error) = response.error() {
        bail!("Access token exchange failed: {}", error);
    }
    let Some(token) = response.auth() else {
        bail!("Access token response did not contain Auth");
    };
    Ok(AccessToken {
        token: token.to_string(),
        expires_at: response
            .expiry()
            .unwrap_or(now + DEFAULT_ACCESS_TOKEN_LIFETIME_SECONDS),
    })
}

fn read_length_prefixed<'a>(bytes: &'a [u8], offset: &mut usize) -> anyhow::Result<&'a [u8]> {
    let Some(prefix) = bytes.get(*offset..*offset + 4) else {
        bail!("Login key is truncated");
    };
    let length = u32::from_be_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    let start = *offset + 4;
    let Some(value) = bytes.get(start..start + length) else {
        bail!("Login key is truncated");
    };
    *offset = start + length;
    Ok(value)
}

fn android_login_key() -> anyhow::Result<(RsaPublicKey, Vec<u8>)> {
    let key_bytes = STANDARD
        .decode(ANDROID_LOGIN_KEY)
        .context("Login key is not valid base64")?;

    let mut offset = 0;
    let modulus = read_length_prefixed(&key_bytes, &mut offset)?;
    let exponent = read_length_prefixed(&key_bytes, &mut offset)?;
    let key = RsaPublicKey::new(
        BigUint::from_bytes_be(modulus),
        BigUint::from_bytes_be(exponent),
    )
    .context("Login key is not a valid RSA key")?;

    Ok((key, key_bytes))
}

/// `EncryptedPasswd` form value: a zero byte, the first four bytes of the
/// key's SHA-1, then `email \0 password` under RSA-OAEP, URL-safe base64.
fn encrypt_password(email: &str, password: &str) -> anyhow::Result<String> {
    let (key, key_bytes) = android_login_key()?;
    let key_hash = Sha1::digest(&key_bytes);

    let message = format!("{}\u{0}{}", email, password);
    let encrypted = key
        .encrypt(&mut rand::thread_rng(), Oaep::new::<Sha1>(), message.as_bytes())
        .context("Unable to encrypt the account password")?;

    let mut signature = Vec::with_capacity(1 + 4 + encrypted.len());
    signature.push(0);
    signature.extend_from_slice(&key_hash[..4]);
    signature.extend_from_slice(&encrypted);
    Ok(URL_SAFE.encode(signature))
}

/// 16 random lowercase hex characters, the shape of an Android device id.
fn generate_android_id() -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    (0..16)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect()
}
