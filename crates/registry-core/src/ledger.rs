// registry-core/src/ledger.rs

use crate::{RegistryError, RegistryResult};
use registry_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Debit/credit funds ledger over an address-to-amount mapping.
///
/// The ledger is the only place funds move; every transfer happens inside
/// the same atomic step as the registry state change it accompanies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    accounts: BTreeMap<Address, Amount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: BTreeMap::new(),
        }
    }

    /// Balance of an account (zero if the account has never been touched)
    pub fn balance(&self, address: &Address) -> Amount {
        self.accounts
            .get(address)
            .cloned()
            .unwrap_or_else(Amount::zero)
    }

    /// Credit an account
    pub fn credit(&mut self, address: Address, amount: &Amount) {
        let updated = self.balance(&address) + amount.clone();
        self.accounts.insert(address, updated);
    }

    /// Debit an account; fails without mutating if the balance is too low
    pub fn debit(&mut self, address: &Address, amount: &Amount) -> RegistryResult<()> {
        let remaining = self
            .balance(address)
            .checked_sub(amount)
            .ok_or(RegistryError::InsufficientBalance)?;
        self.accounts.insert(*address, remaining);
        Ok(())
    }

    /// Move funds between two accounts as a single step
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: &Amount,
    ) -> RegistryResult<()> {
        self.debit(from, amount)?;
        self.credit(*to, amount);
        Ok(())
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
    fn test_untouched_account_is_zero() {
        let ledger = Ledger::new();
        assert!(ledger.balance(&addr(1)).is_zero());
    }

    #[test]
    fn test_credit_and_debit() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), &Amount::from_u64(100));
        assert_eq!(ledger.balance(&addr(1)), Amount::from_u64(100));

        ledger.debit(&addr(1), &Amount::from_u64(40)).unwrap();
        assert_eq!(ledger.balance(&addr(1)), Amount::from_u64(60));
    }

    #[test]
    fn test_overdraft_rejected() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), &Amount::from_u64(10));

        let result = ledger.debit(&addr(1), &Amount::from_u64(11));
        assert!(matches!(result, Err(RegistryError::InsufficientBalance)));

        // Failed debit must not mutate
        assert_eq!(ledger.balance(&addr(1)), Amount::from_u64(10));
    }

    #[test]
    fn test_transfer() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), &Amount::from_u64(100));

        ledger
            .transfer(&addr(1), &addr(2), &Amount::from_u64(30))
            .unwrap();

        assert_eq!(ledger.balance(&addr(1)), Amount::from_u64(70));
        assert_eq!(ledger.balance(&addr(2)), Amount::from_u64(30));
    }

    #[test]
    fn test_transfer_insufficient_leaves_state_unchanged() {
        let mut ledger = Ledger::new();
        ledger.credit(addr(1), &Amount::from_u64(5));

        assert!(ledger
            .transfer(&addr(1), &addr(2), &Amount::from_u64(6))
            .is_err());
        assert_eq!(ledger.balance(&addr(1)), Amount::from_u64(5));
        assert!(ledger.balance(&addr(2)).is_zero());
    }
}
