use thiserror::Error;

use crate::vehicle::VehiclePlate;

/// Contract violations reported by the ledger. State is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("vehicle {0} is already parked")]
    AlreadyParked(VehiclePlate),
    #[error("vehicle {0} is not parked")]
    NotParked(VehiclePlate),
}

/// A manual clock move that would leave the representable time range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("moving the clock by {seconds}s leaves the supported time range")]
pub struct ClockRangeError {
    pub seconds: i64,
}

/// Failures while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("No configuration directory available on this platform")]
    MissingConfigDir,
}
