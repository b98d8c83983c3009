//! Turns raw device entries into their human readable form.
//!
//! Every function here is pure: the derived fields depend only on
//! `fire_time` / `original_duration` and the time zone passed in.

use crate::ghlocal_api::models::alarm::{Alarm, RawAlarm};
use crate::ghlocal_api::models::timer::{RawTimer, Timer};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Number;
use std::fmt::Display;

const TIME_FORMAT: &str = "%H:%M:%S";
const UTC_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DERIVED_TIMER_FIELDS: [&str; 2] = ["date_time", "duration"];
const DERIVED_ALARM_FIELDS: [&str; 2] = ["date_time", "local_time"];

/// The device writes epoch milliseconds either as integers or as floats.
/// Fractional milliseconds are kept down to the microsecond.
fn from_epoch_millis(millis: &Number) -> Option<DateTime<Utc>> {
    if let Some(millis) = millis.as_i64() {
        return DateTime::from_timestamp_millis(millis);
    }
    let millis = millis.as_f64().filter(|millis| millis.is_finite())?;
    DateTime::from_timestamp_micros((millis * 1000.0) as i64)
}

/// Returns `None` when a timestamp is outside the representable range.
pub fn normalize_timer<Tz>(raw: &RawTimer, tz: &Tz) -> Option<Timer>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let fire_time = from_epoch_millis(&raw.fire_time)?;
    // elapsed time, so it is rendered in UTC and never shifted by the local offset
    let duration = from_epoch_millis(&raw.original_duration)?;

    let mut extra = raw.extra.clone();
    for field in DERIVED_TIMER_FIELDS {
        extra.remove(field);
    }

    Some(Timer {
        fire_time: raw.fire_time.clone(),
        original_duration: raw.original_duration.clone(),
        date_time: fire_time.with_timezone(tz).format(TIME_FORMAT).to_string(),
        duration: duration.format(TIME_FORMAT).to_string(),
        extra,
    })
}

pub fn normalize_alarm<Tz>(raw: &RawAlarm, tz: &Tz) -> Option<Alarm>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let fire_time = from_epoch_millis(&raw.fire_time)?;

    let mut extra = raw.extra.clone();
    for field in DERIVED_ALARM_FIELDS {
        extra.remove(field);
    }

    Some(Alarm {
        fire_time: raw.fire_time.clone(),
        date_time: fire_time.format(UTC_TIMESTAMP_FORMAT).to_string(),
        local_time: fire_time
            .with_timezone(tz)
            .format(LOCAL_TIMESTAMP_FORMAT)
            .to_string(),
        extra,
    })
}

pub fn normalize_timers<Tz>(raw: &[RawTimer], tz: &Tz) -> Option<Vec<Timer>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    raw.iter().map(|timer| normalize_timer(timer, tz)).collect()
}

pub fn normalize_alarms<Tz>(raw: &[RawAlarm], tz: &Tz) -> Option<Vec<Alarm>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    raw.iter().map(|alarm| normalize_alarm(alarm, tz)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use serde_json::{Map, Value, json};

    fn timer_with(fire_time: Number, original_duration: Number) -> RawTimer {
        let mut extra = Map::new();
        extra.insert("id".to_string(), json!("timer/1"));
        extra.insert("label".to_string(), json!("pasta"));
        RawTimer {
            fire_time,
            original_duration,
            extra,
        }
    }

    fn alarm_with(fire_time: Number) -> RawAlarm {
        let mut extra = Map::new();
        extra.insert("id".to_string(), json!("alarm/1"));
        RawAlarm { fire_time, extra }
    }

    fn raw_timer(fire_time: i64, original_duration: i64) -> RawTimer {
        timer_with(fire_time.into(), original_duration.into())
    }

    fn raw_alarm(fire_time: i64) -> RawAlarm {
        alarm_with(fire_time.into())
    }

    fn float(value: f64) -> Number {
        Number::from_f64(value).unwrap()
    }

    #[test]
    fn one_minute_timer_duration() {
        let timer = normalize_timer(&raw_timer(1_700_000_000_000, 60_000), &Utc).unwrap();

        assert_eq!(timer.duration, "00:01:00");
        assert_eq!(timer.date_time, "22:13:20");
        assert_eq!(timer.id(), Some("timer/1"));
        assert_eq!(timer.extra.get("label"), Some(&json!("pasta")));
    }

    #[test]
    fn timer_fire_time_follows_local_zone_but_duration_does_not() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let timer = normalize_timer(&raw_timer(1_700_000_000_000, 5_400_000), &tz).unwrap();

        assert_eq!(timer.date_time, "00:13:20");
        assert_eq!(timer.duration, "01:30:00");
    }

    #[test]
    fn duration_wraps_as_time_of_day() {
        let timer = normalize_timer(&raw_timer(1_700_000_000_000, 90_000_000), &Utc).unwrap();
        assert_eq!(timer.duration, "01:00:00");
    }

    #[test]
    fn sub_second_precision_is_truncated() {
        let timer = normalize_timer(&raw_timer(1_700_000_000_999, 60_999), &Utc).unwrap();

        assert_eq!(timer.date_time, "22:13:20");
        assert_eq!(timer.duration, "00:01:00");
    }

    #[test]
    fn alarm_formats() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let alarm = normalize_alarm(&raw_alarm(1_700_000_000_000), &tz).unwrap();

        assert_eq!(alarm.date_time, "2023-11-14T22:13:20.000000Z");
        assert_eq!(alarm.local_time, "2023-11-14 17:13:20");
        assert_eq!(alarm.id(), Some("alarm/1"));
    }

    #[test]
    fn alarm_microseconds_come_from_milliseconds() {
        let alarm = normalize_alarm(&raw_alarm(1_700_000_000_250), &Utc).unwrap();
        assert_eq!(alarm.date_time, "2023-11-14T22:13:20.250000Z");
    }

    #[test]
    fn float_timestamps_are_accepted() {
        let timer = normalize_timer(&timer_with(float(1_700_000_000_000.0), float(60_000.0)), &Utc).unwrap();

        assert_eq!(timer.date_time, "22:13:20");
        assert_eq!(timer.duration, "00:01:00");
        assert_eq!(timer.fire_time, float(1_700_000_000_000.0));
    }

    #[test]
    fn fractional_milliseconds_reach_the_alarm_microseconds() {
        let alarm = normalize_alarm(&alarm_with(float(1_700_000_000_000.25)), &Utc).unwrap();

        assert_eq!(alarm.date_time, "2023-11-14T22:13:20.000250Z");
        assert_eq!(alarm.local_time, "2023-11-14 22:13:20");
    }

    #[test]
    fn out_of_range_float_is_rejected() {
        assert!(normalize_alarm(&alarm_with(float(1e300)), &Utc).is_none());
        assert!(normalize_timer(&timer_with(0.into(), float(-1e300)), &Utc).is_none());
    }

    #[test]
    fn normalizing_twice_gives_the_same_result() {
        let tz = FixedOffset::east_opt(3600).unwrap();
        let raw = raw_timer(1_700_000_123_456, 300_000);

        let first = normalize_timer(&raw, &tz).unwrap();
        let second = normalize_timer(&raw, &tz).unwrap();
        assert_eq!(first, second);

        // feeding a decorated entry back in yields the same derived fields
        let decorated: RawTimer = serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
        assert_eq!(normalize_timer(&decorated, &tz).unwrap(), first);
    }

    #[test]
    fn raw_input_is_left_untouched() {
        let raw = raw_alarm(1_700_000_000_000);
        let before = raw.clone();

        let _ = normalize_alarm(&raw, &Utc);
        assert_eq!(raw, before);
    }

    #[test]
    fn serialized_timer_is_a_flat_mapping() {
        let timer = normalize_timer(&raw_timer(1_700_000_000_000, 60_000), &Utc).unwrap();
        let value = serde_json::to_value(&timer).unwrap();

        assert_eq!(value["id"], Value::from("timer/1"));
        assert_eq!(value["duration"], Value::from("00:01:00"));
        assert_eq!(value["fire_time"], Value::from(1_700_000_000_000_i64));
    }

    #[test]
    fn out_of_range_fire_time_is_rejected() {
        assert!(normalize_alarm(&raw_alarm(i64::MAX), &Utc).is_none());
        assert!(normalize_alarms(&[raw_alarm(0), raw_alarm(i64::MAX)], &Utc).is_none());
        assert!(normalize_alarm(&alarm_with(u64::MAX.into()), &Utc).is_none());
    }

    #[test]
    fn empty_lists_stay_empty() {
        assert_eq!(normalize_timers(&[], &Utc), Some(vec![]));
        assert_eq!(normalize_alarms(&[], &Utc), Some(vec![]));
    }
}
