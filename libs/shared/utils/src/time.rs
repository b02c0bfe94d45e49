// libs/shared/utils/src/time.rs
//
// Calendar math shared by every scheduling path. All intervals are half-open
// [start, end) and all day bucketing uses the UTC calendar date, so capacity
// counts come out the same no matter which host evaluates them.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

/// Whether two half-open intervals [start_a, end_a) and [start_b, end_b)
/// share any instant. Back-to-back slots (one ending exactly when the other
/// starts) do not overlap.
pub fn overlaps(
    start_a: DateTime<Utc>,
    end_a: DateTime<Utc>,
    start_b: DateTime<Utc>,
    end_b: DateTime<Utc>,
) -> bool {
    start_a < end_b && start_b < end_a
}

/// Derived end of a booking: `start` plus the service duration.
pub fn end_of(start: DateTime<Utc>, duration_minutes: i64) -> DateTime<Utc> {
    start + Duration::minutes(duration_minutes)
}

/// The UTC calendar day a timestamp falls on.
pub fn utc_day(t: DateTime<Utc>) -> NaiveDate {
    t.date_naive()
}

/// Whether two timestamps fall on the same UTC calendar day.
pub fn same_utc_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Half-open [midnight, next midnight) bounds of a UTC calendar day.
pub fn utc_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&day.and_time(NaiveTime::MIN));
    let end = Utc.from_utc_datetime(&(day + Duration::days(1)).and_time(NaiveTime::MIN));
    (start, end)
}
