use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Money owed, in whole currency units.
pub type Amount = u64;

/// Fixed charge per second of parked time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(u64);

impl Rate {
    pub const fn per_second(units: u64) -> Self {
        Self(units)
    }

    pub fn units_per_second(&self) -> u64 {
        self.0
    }

    pub fn charge(&self, seconds: u64) -> Amount {
        self.0.saturating_mul(seconds)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/s", self.0)
    }
}

/// Whole seconds between two instants, truncated toward zero.
///
/// A clock that went backwards yields zero instead of a negative duration.
pub fn elapsed_seconds(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let seconds = (now - start).num_seconds();
    if seconds < 0 {
        tracing::warn!(%start, %now, "clock moved backwards; treating elapsed time as zero");
        return 0;
    }
    seconds as u64
}
