use crate::ghlocal_api::models::alarm::RawAlarm;
use crate::ghlocal_api::models::timer::RawTimer;
use serde::Deserialize;

/// Body of `GET /setup/assistant/alarms`.
#[derive(Deserialize, Clone, Debug)]
pub struct AlarmsResponse {
    pub timer: Vec<RawTimer>,
    pub alarm: Vec<RawAlarm>,
}
