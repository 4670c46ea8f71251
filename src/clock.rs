/// Wall-clock capability
///
/// The engine and streak calculator take instants as arguments; everything
/// that needs "now" receives it through this trait so the arithmetic stays
/// testable with a pinned clock.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current instant and the current calendar date
///
/// `today` is separate from `now` so a deployment can apply a local-zone
/// day boundary without the core ever consulting ambient time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
    fn today(&self) -> NaiveDate;
}

/// Production clock backed by the system time
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to one instant, for tests
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
