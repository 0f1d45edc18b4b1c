use std::collections::{hash_map::Entry, BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use super::snapshot::{ActiveSession, LedgerSnapshot};
use crate::{
    billing::{elapsed_seconds, Amount, Rate},
    clock::Clock,
    errors::LedgerError,
    vehicle::VehiclePlate,
};

/// Charges owed per vehicle at the close of a billing period.
pub type Settlement = BTreeMap<VehiclePlate, Amount>;

/// Billing ledger for a single parking facility.
///
/// Tracks open sessions (`active`) and the seconds accumulated by completed
/// sessions since the last settlement (`settled`). A vehicle can be in both
/// maps at once when it parks again before the period is closed.
///
/// The ledger is not synchronised; callers sharing it across threads must
/// serialise access themselves.
#[derive(Debug)]
pub struct Ledger<C> {
    rate: Rate,
    clock: C,
    active: HashMap<VehiclePlate, DateTime<Utc>>,
    settled: HashMap<VehiclePlate, u64>,
}

impl<C: Clock> Ledger<C> {
    pub fn new(rate: Rate, clock: C) -> Self {
        Self {
            rate,
            clock,
            active: HashMap::new(),
            settled: HashMap::new(),
        }
    }

    pub fn rate(&self) -> Rate {
        self.rate
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Opens a session for `plate` starting now.
    pub fn park(&mut self, plate: VehiclePlate) -> Result<(), LedgerError> {
        match self.active.entry(plate) {
            Entry::Occupied(_) => Err(LedgerError::AlreadyParked(plate)),
            Entry::Vacant(slot) => {
                let started = self.clock.now();
                slot.insert(started);
                tracing::debug!(%plate, %started, "vehicle parked");
                Ok(())
            }
        }
    }

    /// Closes the open session for `plate`, moving its whole seconds into the
    /// settled balance.
    pub fn withdraw(&mut self, plate: &VehiclePlate) -> Result<(), LedgerError> {
        let started = self
            .active
            .remove(plate)
            .ok_or(LedgerError::NotParked(*plate))?;
        let seconds = elapsed_seconds(started, self.clock.now());
        let balance = self.settled.entry(*plate).or_insert(0);
        *balance = balance.saturating_add(seconds);
        tracing::debug!(%plate, seconds, balance = *balance, "vehicle withdrawn");
        Ok(())
    }

    /// Amount owed by `plate` right now: settled seconds plus the open
    /// session, if any. Unknown vehicles owe nothing.
    pub fn current_bill(&self, plate: &VehiclePlate) -> Amount {
        let active = self
            .active
            .get(plate)
            .map(|started| elapsed_seconds(*started, self.clock.now()))
            .unwrap_or(0);
        let settled = self.settled.get(plate).copied().unwrap_or(0);
        self.rate.charge(active.saturating_add(settled))
    }

    /// Closes the billing period.
    ///
    /// Settled balances are charged and cleared; balances of zero seconds are
    /// dropped without appearing in the result. Every open session is charged
    /// for the time since its start and re-based to now, so the same interval
    /// is never billed twice. Vehicles with an open session always appear in
    /// the result. A start instant is never moved backwards.
    pub fn settle_all(&mut self) -> Settlement {
        let now = self.clock.now();
        let mut charges = Settlement::new();

        for (plate, seconds) in self.settled.drain() {
            if seconds > 0 {
                charges.insert(plate, self.rate.charge(seconds));
            }
        }

        for (plate, started) in self.active.iter_mut() {
            let seconds = elapsed_seconds(*started, now);
            let owed = charges.entry(*plate).or_insert(0);
            *owed = owed.saturating_add(self.rate.charge(seconds));
            // a clock that ran backwards keeps the later start
            *started = (*started).max(now);
        }

        let total = charges
            .values()
            .fold(0, |sum: Amount, amount| sum.saturating_add(*amount));
        tracing::info!(vehicles = charges.len(), total, "billing period settled");
        charges
    }

    pub fn is_parked(&self, plate: &VehiclePlate) -> bool {
        self.active.contains_key(plate)
    }

    /// Open sessions and their start instants.
    pub fn active_sessions(&self) -> impl Iterator<Item = (&VehiclePlate, &DateTime<Utc>)> {
        self.active.iter()
    }

    /// Seconds accumulated by completed sessions since the last settlement.
    pub fn settled_balances(&self) -> impl Iterator<Item = (&VehiclePlate, u64)> + '_ {
        self.settled.iter().map(|(plate, seconds)| (plate, *seconds))
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        let taken_at = self.clock.now();
        let mut active: Vec<ActiveSession> = self
            .active
            .iter()
            .map(|(plate, started)| ActiveSession {
                plate: *plate,
                started_at: *started,
                elapsed_seconds: elapsed_seconds(*started, taken_at),
            })
            .collect();
        active.sort_by_key(|session| session.plate);

        LedgerSnapshot {
            rate: self.rate,
            taken_at,
            active,
            settled: self.settled.iter().map(|(p, s)| (*p, *s)).collect(),
        }
    }
}
