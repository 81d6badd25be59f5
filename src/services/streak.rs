//! Streak and backfill arithmetic over a user's entry dates.
//!
//! All functions are pure: callers pass "today" explicitly and supply the
//! dates they loaded from the entry store.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

/// Upper bound on how far back the current streak walk looks.
pub const MAX_STREAK_LOOKBACK_DAYS: i32 = 365;

/// Consecutive days ending at `today` that have a qualifying entry.
///
/// Returns 0 when today itself has no qualifying entry, even if yesterday
/// closed a long run.
pub fn current_streak(qualifying: &BTreeSet<NaiveDate>, today: NaiveDate) -> i32 {
    let mut streak = 0i32;
    let mut check_date = today;

    while streak < MAX_STREAK_LOOKBACK_DAYS && qualifying.contains(&check_date) {
        streak += 1;
        check_date -= Duration::days(1);
    }

    streak
}

/// Longest run of calendar-consecutive qualifying dates.
pub fn longest_streak(qualifying: &BTreeSet<NaiveDate>) -> i32 {
    let mut longest = 0i32;
    let mut run = 0i32;
    let mut prev: Option<NaiveDate> = None;

    for date in qualifying {
        run = match prev {
            Some(p) if *date == p + Duration::days(1) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(*date);
    }

    longest
}

/// Days from `signup_date` through yesterday with no entry row at all,
/// oldest first. Skipped days count as logged.
pub fn missed_days(
    signup_date: NaiveDate,
    today: NaiveDate,
    logged: &BTreeSet<NaiveDate>,
) -> Vec<NaiveDate> {
    signup_date
        .iter_days()
        .take_while(|d| *d < today)
        .filter(|d| !logged.contains(d))
        .collect()
}
