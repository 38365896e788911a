use chrono::{Days, NaiveDate, NaiveTime, Utc};

/// UTC timestamp format used for the Convictional `createdAt` filters.
const BOUND_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// The date pair bounding a fetch run: yesterday through today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchWindow {
    /// Window ending on the current UTC date, starting the day before.
    #[must_use]
    pub fn yesterday_to_today() -> Self {
        Self::ending_on(Utc::now().date_naive())
    }

    /// Window ending on `today`, starting the day before.
    #[must_use]
    pub fn ending_on(today: NaiveDate) -> Self {
        let start = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        Self { start, end: today }
    }

    /// Renders the window as `createdAt[after]` / `createdAt[before]` bounds,
    /// attaching the configured times of day to the start and end dates.
    #[must_use]
    pub fn bounds(&self, start_time: NaiveTime, end_time: NaiveTime) -> (String, String) {
        let after = self.start.and_time(start_time).format(BOUND_FORMAT);
        let before = self.end.and_time(end_time).format(BOUND_FORMAT);
        (after.to_string(), before.to_string())
    }
}
