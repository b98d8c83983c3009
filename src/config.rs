use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    pub logging: LoggingConfig,
    pub google: GoogleConfig,
    pub device: DeviceConfig,
    pub home_assistant: HomeAssistantConfig,
    pub intervals: IntervalConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub directory: String,
    pub debug_file: String,
    pub info_file: String,
    pub warn_file: String,
    pub error_file: String,
    pub console_level: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleConfig {
    pub username: String,
    pub app_password: String,
    /// Skips the username/password login when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub android_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeviceConfig {
    pub ip: String,
    /// Must match the device name registered on the Google account exactly.
    pub name: String,
    #[serde(default = "default_device_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct HomeAssistantConfig {
    pub mqtt_host: String,
    pub mqtt_port: u16,
    pub mqtt_username: String,
    pub mqtt_password: String,
    pub client_id: String,
    #[serde(default = "default_discovery_prefix")]
    pub discovery_prefix: String,
    #[serde(default = "default_topic_prefix")]
    pub topic_prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IntervalConfig {
    #[serde(default = "default_scan_interval")]
    pub scan_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_device_cache")]
    pub device_cache_seconds: u64,
    pub mqtt_keep_alive_seconds: u64,
    pub reconnect_delay_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LimitsConfig {
    pub mqtt_queue_size: usize,
    pub command_channel_size: usize,
}

fn default_device_port() -> u16 {
    8443
}

fn default_discovery_prefix() -> String {
    "homeassistant".to_string()
}

fn default_topic_prefix() -> String {
    "ghlocal".to_string()
}

fn default_scan_interval() -> u64 {
    15
}

fn default_request_timeout() -> u64 {
    10
}

fn default_device_cache() -> u64 {
    3600
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid config.toml")?;
        Ok(config)
    }

    pub fn example() -> Self {
        Config {
            logging: LoggingConfig {
                directory: "./logs".to_string(),
                debug_file: "log_debug.log".to_string(),
                info_file: "log_info.log".to_string(),
                warn_file: "log_warn.log".to_string(),
                error_file: "log_error.log".to_string(),
                console_level: "info".to_string(),
            },
            google: GoogleConfig {
                username: "REPLACE_WITH_YOUR_GOOGLE_ACCOUNT".to_string(),
                app_password: "REPLACE_WITH_YOUR_APP_PASSWORD".to_string(),
                master_token: None,
                android_id: None,
            },
            device: DeviceConfig {
                ip: "192.168.1.50".to_string(),
                name: "Kitchen speaker".to_string(),
                port: default_device_port(),
            },
            home_assistant: HomeAssistantConfig {
                mqtt_host: "192.168.1.40".to_string(),
                mqtt_port: 1883,
                mqtt_username: "homeassistant".to_string(),
                mqtt_password: "REPLACE_WITH_YOUR_HOMEASSISTANT_MQTT_PASSWORD".to_string(),
                client_id: "ghlocal-bridge".to_string(),
                discovery_prefix: default_discovery_prefix(),
                topic_prefix: default_topic_prefix(),
            },
            intervals: IntervalConfig {
                scan_interval_seconds: default_scan_interval(),
                request_timeout_seconds: default_request_timeout(),
                device_cache_seconds: default_device_cache(),
                mqtt_keep_alive_seconds: 30,
                reconnect_delay_seconds: 5,
            },
            limits: LimitsConfig {
                mqtt_queue_size: 100,
                command_channel_size: 10,
            },
        }
    }

    pub fn save_example(path: &str) -> Result<()> {
        let toml_content = toml::to_string_pretty(&Self::example())?;
        fs::write(path, toml_content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_config_parses_back() {
        let content = toml::to_string_pretty(&Config::example()).unwrap();
        let config = Config::from_toml(&content).unwrap();

        assert_eq!(config.device.port, 8443);
        assert_eq!(config.device.name, "Kitchen speaker");
        assert_eq!(config.intervals.scan_interval_seconds, 15);
        assert_eq!(config.intervals.request_timeout_seconds, 10);
        assert!(config.google.master_token.is_none());
    }

    #[test]
    fn optional_fields_fall_back_to_defaults() {
        let content = r#"
            [logging]
            directory = "./logs"
            debug_file = "d.log"
            info_file = "i.log"
            warn_file = "w.log"
            error_file = "e.log"
            console_level = "debug"

            [google]
            username = "someone@example.com"
            app_password = "secret"
            master_token = "aas_et/abc"

            [device]
            ip = "10.0.0.5"
            name = "Bedroom"

            [home_assistant]
            mqtt_host = "localhost"
            mqtt_port = 1883
            mqtt_username = "ha"
            mqtt_password = "pw"
            client_id = "bridge"

            [intervals]
            mqtt_keep_alive_seconds = 30
            reconnect_delay_seconds = 5

            [limits]
            mqtt_queue_size = 10
            command_channel_size = 10
        "#;

        let config = Config::from_toml(content).unwrap();

        assert_eq!(config.google.master_token.as_deref(), Some("aas_et/abc"));
        assert_eq!(config.device.port, 8443);
        assert_eq!(config.home_assistant.discovery_prefix, "homeassistant");
        assert_eq!(config.home_assistant.topic_prefix, "ghlocal");
        assert_eq!(config.intervals.device_cache_seconds, 3600);
    }

    #[test]
    fn missing_device_section_is_an_error() {
        assert!(Config::from_toml("[logging]\ndirectory = \"x\"").is_err());
    }
}
