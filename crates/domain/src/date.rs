use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

/// Number of whole days elapsed from `start` until `now`, rounded towards
/// negative infinity so that a `start` later in the same day as `now`
/// counts as `-1` and not `0`.
pub fn whole_days_between(start: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let elapsed_millis = (now - start).num_milliseconds();
    elapsed_millis.div_euclid(MILLIS_PER_DAY)
}

/// Returns true iff at least `threshold_days` whole days have passed since `start`.
///
/// A missing `start` never crosses any threshold. A malformed `Campaign` should not
/// be able to trigger notifications, and it must not block the evaluation of other
/// `Campaign`s either, so this never fails.
pub fn has_crossed_threshold(
    start: Option<DateTime<Utc>>,
    threshold_days: i64,
    now: DateTime<Utc>,
) -> bool {
    match start {
        Some(start) => whole_days_between(start, now) >= threshold_days,
        None => false,
    }
}
