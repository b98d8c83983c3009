mod config;
mod ghlocal_api;
mod home_assistant;
mod processors;
mod sensors;

use tracing::{debug, error, info, trace, warn};
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt};

use crate::config::Config;
use crate::ghlocal_api::cached_token_provider::CachedTokenProvider;
use crate::ghlocal_api::device_transport::ReqwestTransport;
use crate::ghlocal_api::ghlocal_client::GhLocalClient;
use crate::ghlocal_api::google_auth_client::GoogleAuthClient;
use crate::ghlocal_api::home_graph::HomeGraphClient;
use crate::ghlocal_api::token_provider::GoogleAccountTokenProvider;
use crate::home_assistant::availability::AvailabilityState;
use crate::home_assistant::device::Device;
use crate::home_assistant::topics::Topics;
use crate::processors::command_processor::{CommandProcessor, GhLocalCommand, command_topic_parser};
use crate::processors::sensor_processor::SensorProcessor;
use crate::sensors::Sensor;
use crate::sensors::alarm_sensor::AlarmSensor;
use crate::sensors::timer_sensor::TimerSensor;
use dashmap::DashSet;
use rumqttc::{AsyncClient, Event, LastWill, MqttOptions, Packet, QoS};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
pub async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_file("config.toml").or_else(|e| {
        println!("Config file not found. Creating example config.toml...");
        Config::save_example("config.toml")?;
        println!("Please edit config.toml with your settings and restart the application.");
        Err(e)
    })?;

    // Directory for logs
    let log_dir = &config.logging.directory;

    // One file per level
    let debug_file = rolling::daily(log_dir, &config.logging.debug_file);
    let info_file = rolling::daily(log_dir, &config.logging.info_file);
    let warn_file = rolling::daily(log_dir, &config.logging.warn_file);
    let error_file = rolling::daily(log_dir, &config.logging.error_file);

    let debug_layer = fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(EnvFilter::new("debug"));

    let info_layer = fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::INFO);

    let warn_layer = fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::WARN);

    let error_layer = fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(tracing_subscriber::filter::LevelFilter::ERROR);

    let console_layer = fmt::layer()
        .pretty()
        .with_filter(EnvFilter::new(&config.logging.console_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(debug_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    let request_timeout = Duration::from_secs(config.intervals.request_timeout_seconds);

    // Google account -> home graph -> local auth token of our device
    let auth_client = GoogleAuthClient::new(
        &config.google.username,
        &config.google.app_password,
        config.google.master_token.clone(),
        config.google.android_id.clone(),
        request_timeout,
    )?;
    let token_provider = CachedTokenProvider::new(
        GoogleAccountTokenProvider::new(auth_client, HomeGraphClient::new(request_timeout)),
        Duration::from_secs(config.intervals.device_cache_seconds),
    );

    let client = Arc::new(GhLocalClient::new(
        Arc::new(token_provider),
        Arc::new(ReqwestTransport::new(request_timeout)?),
        &config.device.ip,
        config.device.port,
        &config.device.name,
    ));
    client.refresh().await;

    let topics = Topics::new(
        &config.home_assistant.discovery_prefix,
        &config.home_assistant.topic_prefix,
        &config.device.name,
    );

    let mut ha_options = MqttOptions::new(
        &config.home_assistant.client_id,
        &config.home_assistant.mqtt_host,
        config.home_assistant.mqtt_port,
    );
    ha_options.set_credentials(
        &config.home_assistant.mqtt_username,
        &config.home_assistant.mqtt_password,
    );
    ha_options.set_keep_alive(Duration::from_secs(
        config.intervals.mqtt_keep_alive_seconds,
    ));
    ha_options.set_last_will(LastWill::new(
        topics.availability(),
        AvailabilityState::Offline.as_serde_value(),
        QoS::AtLeastOnce,
        true,
    ));
    let (ha_client, mut ha_eventloop) = AsyncClient::new(ha_options, config.limits.mqtt_queue_size);

    let published_discovery = Arc::new(DashSet::new());

    let (tx, mut rx) = mpsc::channel::<GhLocalCommand>(config.limits.command_channel_size);

    let command_processor = CommandProcessor {
        client: client.clone(),
    };
    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            command_processor.process(cmd).await;
        }
    });

    // Run HA event loop in background
    let router_topics = topics.clone();
    let router_client = ha_client.clone();
    let ha_published_discovery = published_discovery.clone();
    let reconnect_delay = Duration::from_secs(config.intervals.reconnect_delay_seconds);
    tokio::spawn(async move {
        let subscriptions = [
            router_topics.delete_command(),
            router_topics.home_assistant_status(),
        ];
        loop {
            match ha_eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("Connected to Home Assistant MQTT broker");
                    ha_published_discovery.clear();
                    for topic in &subscriptions {
                        if let Err(e) = router_client.try_subscribe(topic, QoS::AtLeastOnce) {
                            error!("Failed to subscribe to {}: {:?}", topic, e);
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Publish(p))) => {
                    let payload = String::from_utf8_lossy(&p.payload).to_string();

                    if p.topic == router_topics.home_assistant_status() {
                        if payload == AvailabilityState::Online.as_serde_value() {
                            debug!("Home Assistant came online, republishing discovery");
                            ha_published_discovery.clear();
                        }
                        continue;
                    }

                    match command_topic_parser(&router_topics, &p.topic, &payload) {
                        None => {
                            warn!("Failed to parse topic: {:?}", p.topic);
                        }
                        Some(command) => {
                            if let Err(e) = tx.send(command).await {
                                error!("Failed to send command: {:?}", e);
                            }
                        }
                    }
                }
                Ok(e) => {
                    trace!("{:?}", e)
                }
                Err(e) => {
                    error!(
                        "HA event loop failed: {:?}. Forcing rediscovery and resubscriptions",
                        e
                    );
                    ha_published_discovery.clear();
                    tokio::time::sleep(reconnect_delay).await;
                }
            }
        }
    });

    let sensor_processor = SensorProcessor {
        ha_client: ha_client.clone(),
        device: Device::google_home(&config.device.name, topics.slug()),
        topics,
        published_discovery,
    };

    let mut sensors: Vec<Box<dyn Sensor>> = vec![
        Box::new(TimerSensor::new(client.clone())),
        Box::new(AlarmSensor::new(client.clone())),
    ];

    let mut scan_tick =
        tokio::time::interval(Duration::from_secs(config.intervals.scan_interval_seconds));
    loop {
        let _ = scan_tick.tick().await;

        if let Err(e) = sensor_processor
            .publish_availability(AvailabilityState::Online)
            .await
        {
            error!("Error occurred while publishing availability: {:?}", e);
        }

        for sensor in sensors.iter_mut() {
            sensor.update().await;
            if let Err(e) = sensor_processor.publish(&**sensor).await {
                error!("Error occurred while publishing {}: {:?}", sensor.name(), e);
            }
        }
    }
}
