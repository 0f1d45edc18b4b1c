//! Time sources consumed by the ledger.
//!
//! The ledger never reads wall-clock time directly; it asks an injected
//! [`Clock`] for the current instant so tests can drive time explicitly.

use std::{cell::Cell, rc::Rc};

use chrono::{DateTime, Duration, Utc};

use crate::errors::ClockRangeError;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Wall clock backed by `chrono::Utc::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Deterministic clock whose instant only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle while the
/// ledger owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: DateTime<Utc>,
    current: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    /// Starts at the Unix epoch.
    pub fn new() -> Self {
        Self::with_origin(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn with_origin(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            current: Rc::new(Cell::new(origin)),
        }
    }

    /// Moves the clock to `origin + seconds`. Out-of-range targets leave the
    /// clock where it was.
    pub fn set_now(&self, seconds: i64) -> Result<(), ClockRangeError> {
        let target = offset(self.origin, seconds)?;
        self.current.set(target);
        Ok(())
    }

    pub fn advance(&self, seconds: i64) -> Result<(), ClockRangeError> {
        let target = offset(self.current.get(), seconds)?;
        self.current.set(target);
        Ok(())
    }

    pub fn origin(&self) -> DateTime<Utc> {
        self.origin
    }

    pub fn elapsed_since_origin(&self) -> i64 {
        (self.current.get() - self.origin).num_seconds()
    }
}

fn offset(from: DateTime<Utc>, seconds: i64) -> Result<DateTime<Utc>, ClockRangeError> {
    Duration::try_seconds(seconds)
        .and_then(|delta| from.checked_add_signed(delta))
        .ok_or(ClockRangeError { seconds })
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}
