//! Wall-clock helpers: epoch millis and timezone resolution.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Resolve an IANA timezone id, falling back to UTC for unknown ids.
pub fn resolve_time_zone(id: &str) -> Tz {
    match id.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            log::warn!("Unknown timezone id {:?}, rendering in UTC", id);
            Tz::UTC
        }
    }
}

/// Local wall-clock time for an epoch-millisecond instant in the given zone.
///
/// Instants outside chrono's representable range clamp to the Unix epoch.
pub fn local_time(now_ms: i64, time_zone_id: &str) -> NaiveDateTime {
    let utc = DateTime::<Utc>::from_timestamp_millis(now_ms).unwrap_or_default();
    utc.with_timezone(&resolve_time_zone(time_zone_id))
        .naive_local()
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
