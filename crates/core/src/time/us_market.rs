use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether a research refresh should run at `now_utc`. US markets are closed
/// on weekends, so company news is left as-is until Monday.
pub fn is_refresh_day(now_utc: DateTime<Utc>) -> bool {
    !is_weekend(now_utc.date_naive())
}
