use chrono::{DateTime, NaiveDate, Utc};
use hourglass_rs::{SafeTimeProvider, TimeSource};

/// source of "now" for anything that depends on elapsed time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// calendar day of `now`, in utc
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Clock for SafeTimeProvider {
    fn now(&self) -> DateTime<Utc> {
        SafeTimeProvider::now(self)
    }
}

/// a clock frozen at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// wall clock
pub fn system_clock() -> SafeTimeProvider {
    SafeTimeProvider::new(TimeSource::System)
}
