// registry-core/src/events.rs

use crate::access::Capability;
use registry_types::{Address, Amount, RoleId};
use serde::{Deserialize, Serialize};

/// Audit records appended by every mutating registry operation.
///
/// The serialized form is the durable audit trail consumed by downstream
/// indexers: variant names, field names and field order are stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    ConfigurationUpdated {
        deposit_amount: Amount,
        wait_time: u64,
    },
    Registered {
        participant: Address,
        deposit_amount: Amount,
    },
    Unregistered {
        participant: Address,
        refund: Amount,
    },
    Staked {
        staker: Address,
        amount: Amount,
    },
    Unstaked {
        staker: Address,
        amount: Amount,
    },
    Slashed {
        staker: Address,
        amount: Amount,
    },
    RoleDeactivated {
        role_id: RoleId,
    },
    CapabilityGranted {
        capability: Capability,
        address: Address,
    },
    CapabilityRevoked {
        capability: Capability,
        address: Address,
    },
}

/// Append-only audit log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<RegistryEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, event: RegistryEvent) {
        self.records.push(event);
    }

    pub fn records(&self) -> &[RegistryEvent] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
