use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{Result, ShipByError};

/// The listing filter for one run: sales created on or after
/// `created_since` and touched on or after `updated_since`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncWindow {
    pub created_since: NaiveDate,
    pub updated_since: DateTime<Utc>,
}

impl SyncWindow {
    /// Compute the window relative to `now`.
    ///
    /// `created_since` is a calendar date in `tz` so that a sale backdated
    /// across the local midnight is still picked up.
    pub fn at(
        now: DateTime<Utc>,
        tz: Tz,
        created_lookback_days: u32,
        updated_lookback_secs: u32,
    ) -> Self {
        let today = now.with_timezone(&tz).date_naive();
        let created_since = today
            .checked_sub_days(Days::new(u64::from(created_lookback_days)))
            .unwrap_or(NaiveDate::MIN);
        let updated_since = now - Duration::seconds(i64::from(updated_lookback_secs));
        Self {
            created_since,
            updated_since,
        }
    }

    /// `YYYY-MM-DD`
    pub fn created_since_param(&self) -> String {
        self.created_since.format("%Y-%m-%d").to_string()
    }

    /// RFC 3339 in UTC with millisecond precision.
    pub fn updated_since_param(&self) -> String {
        self.updated_since
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| ShipByError::UnknownTimeZone(name.to_string()))
}
