#![doc(test(attr(deny(warnings))))]

//! Parking Ledger tracks vehicles parked at a single facility, accumulates
//! billable time across park/withdraw cycles, and settles charges at a fixed
//! per-second rate.

pub mod billing;
pub mod cli;
pub mod clock;
pub mod config;
pub mod errors;
pub mod ledger;
pub mod utils;
pub mod vehicle;

use std::sync::Once;

pub use billing::{Amount, Rate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use errors::LedgerError;
pub use ledger::{Ledger, Settlement};
pub use vehicle::VehiclePlate;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Parking Ledger tracing initialized.");
    });
}
