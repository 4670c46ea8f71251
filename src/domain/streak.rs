/// Streak calculation over expected occurrence dates
///
/// Derives current and best consecutive-completion runs from a recurrence
/// rule, a start instant, and the sparse completion set. Results are
/// recomputed on demand and never persisted.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use crate::domain::{epoch_day_from_date, CompletionInstance, RecurrenceRule};

/// Current and best completion runs for one item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakResult {
    /// Consecutive expected occurrences completed up to now
    pub current_streak: u32,
    /// Best run ever achieved
    pub best_streak: u32,
}

/// Calculate streak statistics for an item
///
/// `today` comes from the wall-clock collaborator so the function itself
/// stays pure. Expected dates are every calendar day from the start date
/// through today that passes the rule's weekday test; only Weekly actually
/// narrows the set, the other rules expect every day.
pub fn calculate_streaks(
    rule: &RecurrenceRule,
    start_at: DateTime<Utc>,
    completions: &[CompletionInstance],
    today: NaiveDate,
) -> StreakResult {
    if completions.is_empty() {
        return StreakResult::default();
    }

    let expected = expected_dates(rule, start_at.date_naive(), today);
    if expected.is_empty() {
        return StreakResult::default();
    }

    let completed: HashSet<i64> = completions.iter().map(|c| c.epoch_day).collect();

    let current_streak = current_run(&expected, &completed);
    let best_streak = best_run(&expected, &completed);

    StreakResult {
        current_streak,
        best_streak: best_streak.max(current_streak),
    }
}

/// Every date in [start, today] the rule expects an occurrence on
fn expected_dates(rule: &RecurrenceRule, start: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut date = start;
    while date <= today {
        if rule.is_date_allowed(date) {
            dates.push(date);
        }
        date = date + Duration::days(1);
    }
    dates
}

/// Count backward from the most recent expected date
///
/// A still-open "today" does not break the run: if the last expected date is
/// uncompleted, counting starts one expected entry earlier. Two consecutive
/// missing entries mean the streak is over.
fn current_run(expected: &[NaiveDate], completed: &HashSet<i64>) -> u32 {
    let is_done = |date: NaiveDate| completed.contains(&epoch_day_from_date(date));

    let mut idx = expected.len() - 1;
    if !is_done(expected[idx]) {
        if idx == 0 {
            return 0;
        }
        idx -= 1;
    }

    if !is_done(expected[idx]) {
        return 0;
    }

    let mut run = 1;
    while idx > 0 && is_done(expected[idx - 1]) {
        run += 1;
        idx -= 1;
    }
    run
}

/// Longest run anywhere in the expected-date sequence
fn best_run(expected: &[NaiveDate], completed: &HashSet<i64>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    for date in expected {
        if completed.contains(&epoch_day_from_date(*date)) {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}
