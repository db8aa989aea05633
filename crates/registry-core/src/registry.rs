// registry-core/src/registry.rs

use crate::{
    access::{AccessControl, Capability},
    events::{EventLog, RegistryEvent},
    ledger::Ledger,
    participant::{Participant, ParticipantBook},
    role::{RoleBook, RoleConfig},
    RegistryError, RegistryResult,
};
use registry_types::{Address, Amount, RoleId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved ledger account that custodies all registry-held funds
pub fn vault_address() -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = 0x01;
    Address::new(bytes)
}

/// Role-gated staking registry.
///
/// Admits participants into roles against a time-locked refundable deposit,
/// tracks separate at-risk staker balances, and lets the admin authority
/// slash them. Every mutating operation checks all of its preconditions
/// before touching state, appends exactly one audit record on success, and
/// maintains the conservation law
/// `vault balance == active deposits + staker balances`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    access: AccessControl,
    ledger: Ledger,
    roles: RoleBook,
    participants: ParticipantBook,
    staker_balances: BTreeMap<Address, Amount>,
    events: EventLog,
    /// Reserved account holding all custodied funds
    vault: Address,
    /// Destination of slashed funds
    treasury: Address,
}

impl Registry {
    /// Create a registry with a founding admin.
    ///
    /// `treasury` receives slashed funds and must be distinct from the
    /// vault account.
    pub fn new(admin: Address, treasury: Address) -> Self {
        let vault = vault_address();
        debug_assert_ne!(treasury, vault);

        Self {
            access: AccessControl::new(admin),
            ledger: Ledger::new(),
            roles: RoleBook::new(),
            participants: ParticipantBook::new(),
            staker_balances: BTreeMap::new(),
            events: EventLog::new(),
            vault,
            treasury,
        }
    }

    fn require(&self, capability: Capability, caller: &Address) -> RegistryResult<()> {
        if !self.access.is_authorized(capability, caller) {
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                capability,
            });
        }
        Ok(())
    }

    fn ensure_external(&self, address: &Address) -> RegistryResult<()> {
        if *address == self.vault {
            return Err(RegistryError::ReservedAccount(*address));
        }
        Ok(())
    }

    /// Create a new role with the given deposit and wait time.
    ///
    /// Requires the `ConfigKeeper` capability. Always appends a new role;
    /// existing roles and their registrants are unaffected.
    pub fn set_configuration(
        &mut self,
        caller: Address,
        deposit_amount: Amount,
        wait_time: u64,
        now: Timestamp,
    ) -> RegistryResult<RoleId> {
        self.require(Capability::ConfigKeeper, &caller)?;

        let role_id = self
            .roles
            .configure(deposit_amount.clone(), wait_time, now);
        self.events.append(RegistryEvent::ConfigurationUpdated {
            deposit_amount,
            wait_time,
        });

        tracing::debug!("role {} configured with wait time {}s", role_id, wait_time);
        self.assert_conserved();
        Ok(role_id)
    }

    /// Register the caller for a role.
    ///
    /// `value` is the amount transferred with the call and must equal the
    /// role's registration deposit exactly. The deposit moves into the vault
    /// in the same atomic step.
    pub fn register(
        &mut self,
        caller: Address,
        role_id: RoleId,
        value: Amount,
        now: Timestamp,
    ) -> RegistryResult<()> {
        self.ensure_external(&caller)?;

        let role = self.roles.get_active(role_id)?;
        if value != role.registration_deposit_amount {
            return Err(RegistryError::AmountMismatch {
                required: role.registration_deposit_amount.clone(),
                provided: value,
            });
        }
        let deposit = role.registration_deposit_amount.clone();

        // A closed record blocks re-registration for the same role
        if self.participants.contains(&caller, role_id) {
            return Err(RegistryError::AlreadyRegistered {
                participant: caller,
                role_id,
            });
        }

        self.ledger.transfer(&caller, &self.vault, &deposit)?;
        self.participants.open(caller, role_id, deposit.clone(), now);
        self.events.append(RegistryEvent::Registered {
            participant: caller,
            deposit_amount: deposit,
        });

        tracing::debug!("{} registered for role {}", caller, role_id);
        self.assert_conserved();
        Ok(())
    }

    /// Close the caller's registration and refund the exact deposit.
    ///
    /// The deposit stays locked until the role's deadline; the comparison is
    /// inclusive, so unregistering exactly at the deadline succeeds. Remains
    /// possible after the role has been deactivated.
    pub fn unregister(
        &mut self,
        caller: Address,
        role_id: RoleId,
        now: Timestamp,
    ) -> RegistryResult<Amount> {
        let record = self
            .participants
            .get(&caller, role_id)
            .filter(|participant| participant.is_active)
            .ok_or(RegistryError::NotRegistered {
                participant: caller,
                role_id,
            })?;
        let refund = record.registration_deposit_amount.clone();

        let role = self.roles.get(role_id)?;
        if now < role.deadline {
            return Err(RegistryError::DepositLocked {
                deadline: role.deadline,
                now,
            });
        }

        self.ledger.transfer(&self.vault, &caller, &refund)?;
        self.participants.close(&caller, role_id);
        self.events.append(RegistryEvent::Unregistered {
            participant: caller,
            refund: refund.clone(),
        });

        tracing::debug!("{} unregistered from role {}", caller, role_id);
        self.assert_conserved();
        Ok(refund)
    }

    /// Add at-risk stake. Independent of role registration.
    pub fn stake(&mut self, caller: Address, amount: Amount) -> RegistryResult<()> {
        self.ensure_external(&caller)?;
        if amount.is_zero() {
            return Err(RegistryError::InsufficientBalance);
        }

        self.ledger.transfer(&caller, &self.vault, &amount)?;
        let updated = self.staker_balance(&caller) + amount.clone();
        self.staker_balances.insert(caller, updated);
        self.events.append(RegistryEvent::Staked {
            staker: caller,
            amount: amount.clone(),
        });

        tracing::debug!("{} staked {}", caller, amount);
        self.assert_conserved();
        Ok(())
    }

    /// Withdraw the caller's entire staker balance. Full-or-nothing.
    pub fn unstake(&mut self, caller: Address) -> RegistryResult<Amount> {
        let balance = self.staker_balance(&caller);
        if balance.is_zero() {
            return Err(RegistryError::InsufficientBalance);
        }

        self.ledger.transfer(&self.vault, &caller, &balance)?;
        self.staker_balances.insert(caller, Amount::zero());
        self.events.append(RegistryEvent::Unstaked {
            staker: caller,
            amount: balance.clone(),
        });

        tracing::debug!("{} unstaked {}", caller, balance);
        self.assert_conserved();
        Ok(balance)
    }

    /// Confiscate part of a staker's balance.
    ///
    /// Requires the `Admin` capability. The amount cannot exceed the current
    /// staker balance; slashed funds leave the vault for the treasury.
    pub fn slash(
        &mut self,
        caller: Address,
        staker: Address,
        amount: Amount,
    ) -> RegistryResult<()> {
        self.require(Capability::Admin, &caller)?;

        let remaining = self
            .staker_balance(&staker)
            .checked_sub(&amount)
            .ok_or(RegistryError::InsufficientBalance)?;

        self.ledger.transfer(&self.vault, &self.treasury, &amount)?;
        self.staker_balances.insert(staker, remaining);
        self.events.append(RegistryEvent::Slashed {
            staker,
            amount: amount.clone(),
        });

        tracing::warn!("{} slashed by {}", staker, amount);
        self.assert_conserved();
        Ok(())
    }

    /// Stop new registrations for a role.
    ///
    /// Requires the `ConfigKeeper` capability. Participants already
    /// registered under the role can still unregister.
    pub fn deactivate_role(&mut self, caller: Address, role_id: RoleId) -> RegistryResult<()> {
        self.require(Capability::ConfigKeeper, &caller)?;

        self.roles.deactivate(role_id)?;
        self.events
            .append(RegistryEvent::RoleDeactivated { role_id });

        tracing::debug!("role {} deactivated", role_id);
        Ok(())
    }

    /// Grant a capability. Requires the `Admin` capability.
    pub fn grant(
        &mut self,
        caller: Address,
        capability: Capability,
        address: Address,
    ) -> RegistryResult<()> {
        self.require(Capability::Admin, &caller)?;

        if self.access.grant(capability, address) {
            self.events
                .append(RegistryEvent::CapabilityGranted { capability, address });
        }
        Ok(())
    }

    /// Revoke a capability. Requires the `Admin` capability.
    pub fn revoke(
        &mut self,
        caller: Address,
        capability: Capability,
        address: Address,
    ) -> RegistryResult<()> {
        self.require(Capability::Admin, &caller)?;

        if self.access.revoke(capability, &address) {
            self.events
                .append(RegistryEvent::CapabilityRevoked { capability, address });
        }
        Ok(())
    }

    /// Credit an external account with spendable funds (genesis/dev tool).
    ///
    /// The vault is managed exclusively by registry operations and cannot be
    /// credited here.
    pub fn fund(&mut self, address: Address, amount: Amount) -> RegistryResult<()> {
        self.ensure_external(&address)?;
        self.ledger.credit(address, &amount);
        Ok(())
    }

    // --- Read-only accessors ---

    /// Id the next configuration call will be assigned
    pub fn next_role_id(&self) -> RoleId {
        self.roles.next_role_id()
    }

    /// Most recently configured role, if any
    pub fn latest_role(&self) -> Option<RoleId> {
        self.roles.latest()
    }

    pub fn role(&self, role_id: RoleId) -> Option<&RoleConfig> {
        self.roles.get(role_id).ok()
    }

    pub fn participant(&self, address: &Address, role_id: RoleId) -> Option<&Participant> {
        self.participants.get(address, role_id)
    }

    /// Ordered role ids this address has ever registered for
    pub fn participant_role_ids(&self, address: &Address) -> &[RoleId] {
        self.participants.role_ids(address)
    }

    /// The address's most recent still-active registration, if any
    pub fn latest_active_registration(&self, address: &Address) -> Option<RoleId> {
        self.participants.latest_active(address)
    }

    pub fn staker_balance(&self, address: &Address) -> Amount {
        self.staker_balances
            .get(address)
            .cloned()
            .unwrap_or_else(Amount::zero)
    }

    /// Spendable ledger balance of any account
    pub fn ledger_balance(&self, address: &Address) -> Amount {
        self.ledger.balance(address)
    }

    /// Funds currently custodied by the registry
    pub fn vault_balance(&self) -> Amount {
        self.ledger.balance(&self.vault)
    }

    pub fn total_active_deposits(&self) -> Amount {
        self.participants.total_active_deposits()
    }

    pub fn total_staked(&self) -> Amount {
        self.staker_balances
            .values()
            .fold(Amount::zero(), |acc, balance| {
                acc.checked_add(balance).unwrap_or(acc)
            })
    }

    /// Funds the registry must be holding: active deposits plus stakes
    pub fn expected_holdings(&self) -> Amount {
        self.total_active_deposits() + self.total_staked()
    }

    pub fn events(&self) -> &[RegistryEvent] {
        self.events.records()
    }

    pub fn is_authorized(&self, capability: Capability, address: &Address) -> bool {
        self.access.is_authorized(capability, address)
    }

    pub fn vault(&self) -> Address {
        self.vault
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn role_count(&self) -> usize {
        self.roles.count()
    }

    fn assert_conserved(&self) {
        debug_assert_eq!(
            self.vault_balance(),
            self.expected_holdings(),
            "vault balance must equal active deposits plus staker balances"
        );
    }
}
