use async_trait::async_trait;

pub mod alarm_sensor;
pub mod timer_sensor;

pub const STATE_ON: &str = "on";
pub const STATE_OFF: &str = "off";

/// An entity exposed to Home Assistant.
#[async_trait]
pub trait Sensor: Send + Sync {
    fn name(&self) -> &str;

    /// Short identifier used in topics and unique ids.
    fn kind(&self) -> &'static str;

    fn icon(&self) -> &'static str;

    /// `None` until the first update.
    fn state(&self) -> Option<&str>;

    fn attributes(&self) -> serde_json::Value;

    /// Refreshes the device data and recomputes state and attributes.
    async fn update(&mut self);
}
