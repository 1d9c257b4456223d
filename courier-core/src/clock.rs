//! Timestamp source for new delivery records.

use chrono::{DateTime, Utc};

/// Supplies the creation time stamped on each submitted delivery.
///
/// The dispatch service never reads the system clock directly, so tests can
/// substitute a fixed or stepping clock.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}
