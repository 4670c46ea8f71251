/// Recurrence engine: next-occurrence computation
///
/// Pure calendar arithmetic over a rule, a start instant, and "now". The
/// returned instant always carries the start instant's time-of-day; "now"
/// only decides how far the calendar has advanced.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use crate::domain::RecurrenceRule;

/// Scan window for Weekly rules, in days
///
/// Two full weeks: with a single selected weekday the next match can be
/// almost two weeks out once today's instant has already passed.
const WEEKLY_SCAN_DAYS: i64 = 14;

/// Compute the earliest occurrence of `rule` strictly after `now`
///
/// Returns the start instant itself while it is still in the future. Returns
/// None only for a Once rule whose start instant has passed - a fired
/// one-time item has no next occurrence.
pub fn next_occurrence(
    rule: &RecurrenceRule,
    start_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match rule {
        RecurrenceRule::Once => {
            if start_at > now {
                Some(start_at)
            } else {
                None
            }
        }
        RecurrenceRule::EveryNDays(interval) => {
            if start_at > now {
                return Some(start_at);
            }
            // Whole days elapsed on the wall clock, floored - not calendar
            // days truncated by zone boundaries.
            let step = i64::from((*interval).max(1));
            let elapsed_days = (now - start_at).num_days();
            let cycles = elapsed_days / step + 1;
            Some(start_at + Duration::days(cycles * step))
        }
        RecurrenceRule::Weekly(days) => {
            if start_at > now {
                return Some(start_at);
            }
            let time = start_at.time();
            let today = now.date_naive();
            for offset in 0..WEEKLY_SCAN_DAYS {
                let date = today + Duration::days(offset);
                if days.contains(&date.weekday()) {
                    let candidate = date.and_time(time).and_utc();
                    if candidate > now {
                        return Some(candidate);
                    }
                }
            }
            // Unreachable for a non-empty day set; a degenerate rule falls
            // back to the start instant.
            Some(start_at)
        }
        RecurrenceRule::Monthly => {
            if start_at > now {
                return Some(start_at);
            }
            let anchor_day = start_at.day();
            let time = start_at.time();
            if let Some(candidate) = clamped_instant(now.year(), now.month(), anchor_day, time) {
                if candidate > now {
                    return Some(candidate);
                }
            }
            let (year, month) = next_month(now.year(), now.month());
            clamped_instant(year, month, anchor_day, time)
        }
        RecurrenceRule::Yearly => {
            if start_at > now {
                return Some(start_at);
            }
            let anchor_month = start_at.month();
            let anchor_day = start_at.day();
            let time = start_at.time();
            if let Some(candidate) = clamped_instant(now.year(), anchor_month, anchor_day, time) {
                if candidate > now {
                    return Some(candidate);
                }
            }
            clamped_instant(now.year() + 1, anchor_month, anchor_day, time)
        }
    }
}

/// Month following (year, month), rolling over the year boundary
fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// Number of days in the given month
fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_m) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_m, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Build an instant in the given month with the day clamped to the month's end
fn clamped_instant(year: i32, month: u32, day: u32, time: NaiveTime) -> Option<DateTime<Utc>> {
    let clamped = day.min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, clamped).map(|date| date.and_time(time).and_utc())
}
