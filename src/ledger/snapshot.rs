use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{billing::Rate, vehicle::VehiclePlate};

/// Point-in-time view of a ledger, suitable for display or export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub rate: Rate,
    pub taken_at: DateTime<Utc>,
    pub active: Vec<ActiveSession>,
    pub settled: BTreeMap<VehiclePlate, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveSession {
    pub plate: VehiclePlate,
    pub started_at: DateTime<Utc>,
    pub elapsed_seconds: u64,
}

impl LedgerSnapshot {
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.settled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_plates_as_strings() {
        let plate = VehiclePlate::new('A', 'A', 111, 'A', 99);
        let snapshot = LedgerSnapshot {
            rate: Rate::per_second(10),
            taken_at: DateTime::<Utc>::UNIX_EPOCH,
            active: vec![ActiveSession {
                plate,
                started_at: DateTime::<Utc>::UNIX_EPOCH,
                elapsed_seconds: 0,
            }],
            settled: BTreeMap::from([(plate, 12)]),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["rate"], 10);
        assert_eq!(json["active"][0]["plate"], "AA111A99");
        assert_eq!(json["settled"]["AA111A99"], 12);
        assert!(!snapshot.is_empty());
    }
}
