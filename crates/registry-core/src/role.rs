// registry-core/src/role.rs

use crate::{RegistryError, RegistryResult};
use registry_types::{Amount, RoleId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Admission tier configuration.
///
/// Immutable after creation except `is_active`, which deactivation flips to
/// false one way. `deadline` is computed once as creation time plus the
/// registration wait time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Deposit required to register for this role
    pub registration_deposit_amount: Amount,
    /// Earliest time registrants may unregister and reclaim the deposit
    pub deadline: Timestamp,
    /// Whether new registrations are accepted
    pub is_active: bool,
}

/// Append-only book of configured roles.
///
/// Reconfiguration always adds a new role, so participants registered under
/// an old role's terms are unaffected by later configuration calls. Role ids
/// are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleBook {
    roles: BTreeMap<RoleId, RoleConfig>,
    next_role_id: RoleId,
}

impl RoleBook {
    pub fn new() -> Self {
        Self {
            roles: BTreeMap::new(),
            next_role_id: 0,
        }
    }

    /// Add a new role and return its id
    pub fn configure(&mut self, deposit_amount: Amount, wait_time: u64, now: Timestamp) -> RoleId {
        let role_id = self.next_role_id;
        self.roles.insert(
            role_id,
            RoleConfig {
                registration_deposit_amount: deposit_amount,
                deadline: now + wait_time,
                is_active: true,
            },
        );
        self.next_role_id += 1;
        role_id
    }

    pub fn get(&self, role_id: RoleId) -> RegistryResult<&RoleConfig> {
        self.roles
            .get(&role_id)
            .ok_or(RegistryError::RoleNotFound(role_id))
    }

    /// Look up a role that must still accept new registrations
    pub fn get_active(&self, role_id: RoleId) -> RegistryResult<&RoleConfig> {
        let role = self.get(role_id)?;
        if !role.is_active {
            return Err(RegistryError::RoleInactive(role_id));
        }
        Ok(role)
    }

    /// Stop new registrations for a role; already-held deposits are unaffected
    pub fn deactivate(&mut self, role_id: RoleId) -> RegistryResult<()> {
        let role = self
            .roles
            .get_mut(&role_id)
            .ok_or(RegistryError::RoleNotFound(role_id))?;
        if !role.is_active {
            return Err(RegistryError::RoleInactive(role_id));
        }
        role.is_active = false;
        Ok(())
    }

    /// Id the next configuration call will be assigned
    pub fn next_role_id(&self) -> RoleId {
        self.next_role_id
    }

    /// Most recently configured role, if any
    pub fn latest(&self) -> Option<RoleId> {
        self.next_role_id.checked_sub(1)
    }

    pub fn count(&self) -> usize {
        self.roles.len()
    }
}
