// registry-core/src/participant.rs

use registry_types::{Address, Amount, RoleId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Registration record for one (participant, role) pair.
///
/// Created on registration and closed (never deleted) on unregistration;
/// a closed record keeps the pair's history and blocks re-registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Deposit locked when the record was opened
    pub registration_deposit_amount: Amount,
    /// When the record was opened
    pub registration_timestamp: Timestamp,
    /// False once the participant has unregistered
    pub is_active: bool,
}

/// Registration records plus the per-address role index.
///
/// The index is the append-only ordered sequence of role ids each address
/// has ever registered for, used for enumeration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticipantBook {
    records: BTreeMap<Address, BTreeMap<RoleId, Participant>>,
    role_index: BTreeMap<Address, Vec<RoleId>>,
}

impl ParticipantBook {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            role_index: BTreeMap::new(),
        }
    }

    pub fn get(&self, address: &Address, role_id: RoleId) -> Option<&Participant> {
        self.records.get(address).and_then(|roles| roles.get(&role_id))
    }

    /// Whether any record (active or closed) exists for the pair
    pub fn contains(&self, address: &Address, role_id: RoleId) -> bool {
        self.get(address, role_id).is_some()
    }

    /// Open a registration record. The caller must have checked that no
    /// record exists for the pair.
    pub fn open(&mut self, address: Address, role_id: RoleId, deposit: Amount, now: Timestamp) {
        debug_assert!(!self.contains(&address, role_id));

        self.records.entry(address).or_default().insert(
            role_id,
            Participant {
                registration_deposit_amount: deposit,
                registration_timestamp: now,
                is_active: true,
            },
        );
        self.role_index.entry(address).or_default().push(role_id);
    }

    /// Close an active record. The caller must have checked it is active.
    pub fn close(&mut self, address: &Address, role_id: RoleId) {
        let record = self
            .records
            .get_mut(address)
            .and_then(|roles| roles.get_mut(&role_id));
        debug_assert!(record.as_deref().map_or(false, |p| p.is_active));

        if let Some(participant) = record {
            participant.is_active = false;
        }
    }

    /// Ordered role ids this address has ever registered for
    pub fn role_ids(&self, address: &Address) -> &[RoleId] {
        self.role_index
            .get(address)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The address's most recent still-active registration, if any
    pub fn latest_active(&self, address: &Address) -> Option<RoleId> {
        self.role_ids(address)
            .iter()
            .rev()
            .copied()
            .find(|role_id| {
                self.get(address, *role_id)
                    .map(|p| p.is_active)
                    .unwrap_or(false)
            })
    }

    /// Sum of deposits held for currently active records
    pub fn total_active_deposits(&self) -> Amount {
        self.records
            .values()
            .flat_map(|roles| roles.values())
            .filter(|participant| participant.is_active)
            .fold(Amount::zero(), |acc, participant| {
                acc.checked_add(&participant.registration_deposit_amount)
                    .unwrap_or(acc)
            })
    }
}
