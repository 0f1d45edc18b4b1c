//! Parking ledger: open sessions, settled balances, and period settlement.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod snapshot;

pub use ledger::{Ledger, Settlement};
pub use snapshot::{ActiveSession, LedgerSnapshot};
