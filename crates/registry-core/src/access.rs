// registry-core/src/access.rs

use registry_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Named capabilities gating restricted registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Capability {
    /// May create roles and deactivate them
    ConfigKeeper,
    /// May slash stakers and administer capability grants
    Admin,
}

/// Capability-to-authorized-addresses table.
///
/// Restricted operations check this table at their entry point; the mapping
/// is mutated only through Admin-gated grant/revoke operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControl {
    grants: BTreeMap<Capability, BTreeSet<Address>>,
}

impl AccessControl {
    /// Create an access table with a founding admin
    pub fn new(admin: Address) -> Self {
        let mut grants = BTreeMap::new();
        grants.insert(Capability::Admin, BTreeSet::from([admin]));
        Self { grants }
    }

    /// Grant a capability. Returns false if the address already held it.
    pub fn grant(&mut self, capability: Capability, address: Address) -> bool {
        self.grants.entry(capability).or_default().insert(address)
    }

    /// Revoke a capability. Returns false if the address did not hold it.
    pub fn revoke(&mut self, capability: Capability, address: &Address) -> bool {
        self.grants
            .get_mut(&capability)
            .map(|holders| holders.remove(address))
            .unwrap_or(false)
    }

    /// Check whether an address holds a capability
    pub fn is_authorized(&self, capability: Capability, address: &Address) -> bool {
        self.grants
            .get(&capability)
            .map(|holders| holders.contains(address))
            .unwrap_or(false)
    }

    /// All addresses holding a capability
    pub fn holders(&self, capability: Capability) -> Vec<Address> {
        self.grants
            .get(&capability)
            .map(|holders| holders.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = byte;
        Address::new(bytes)
    }

    #[test]
    fn test_founding_admin() {
        let admin = addr(1);
        let access = AccessControl::new(admin);

        assert!(access.is_authorized(Capability::Admin, &admin));
        assert!(!access.is_authorized(Capability::ConfigKeeper, &admin));
    }

    #[test]
    fn test_grant_and_revoke() {
        let admin = addr(1);
        let keeper = addr(2);
        let mut access = AccessControl::new(admin);

        assert!(access.grant(Capability::ConfigKeeper, keeper));
        assert!(access.is_authorized(Capability::ConfigKeeper, &keeper));

        // Granting again is a no-op
        assert!(!access.grant(Capability::ConfigKeeper, keeper));

        assert!(access.revoke(Capability::ConfigKeeper, &keeper));
        assert!(!access.is_authorized(Capability::ConfigKeeper, &keeper));
        assert!(!access.revoke(Capability::ConfigKeeper, &keeper));
    }

    #[test]
    fn test_holders() {
        let admin = addr(1);
        let mut access = AccessControl::new(admin);
        access.grant(Capability::ConfigKeeper, addr(2));
        access.grant(Capability::ConfigKeeper, addr(3));

        assert_eq!(access.holders(Capability::ConfigKeeper).len(), 2);
        assert_eq!(access.holders(Capability::Admin), vec![admin]);
    }
}
