// Property tests for the conservation law: whatever sequence of operations
// runs, the vault's ledger balance equals the sum of active registration
// deposits and staker balances, and funds are only ever moved, never minted
// or destroyed, after genesis.

use proptest::prelude::*;
use registry_core::{Capability, Registry};
use registry_types::{Address, Amount};

const ONE_DAY: u64 = 86_400;

fn addr(byte: u8) -> Address {
    let mut bytes = [0u8; 20];
    bytes[19] = byte;
    Address::new(bytes)
}

// User bytes stay clear of the reserved vault account (0x..01)
const USERS: [u8; 3] = [0x11, 0x12, 0x13];
const TREASURY: u8 = 0xee;

#[derive(Debug, Clone)]
enum Op {
    Configure { deposit: u64, wait_days: u64 },
    Register { user: u8, role: u64 },
    Unregister { user: u8, role: u64 },
    Stake { user: u8, amount: u64 },
    Unstake { user: u8 },
    Slash { user: u8, amount: u64 },
    Deactivate { role: u64 },
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u64..=1_000, 0u64..=3).prop_map(|(deposit, wait_days)| Op::Configure {
            deposit,
            wait_days
        }),
        (0usize..USERS.len(), 0u64..4)
            .prop_map(|(user, role)| Op::Register { user: USERS[user], role }),
        (0usize..USERS.len(), 0u64..4)
            .prop_map(|(user, role)| Op::Unregister { user: USERS[user], role }),
        (0usize..USERS.len(), 0u64..=500)
            .prop_map(|(user, amount)| Op::Stake { user: USERS[user], amount }),
        (0usize..USERS.len()).prop_map(|user| Op::Unstake { user: USERS[user] }),
        (0usize..USERS.len(), 0u64..=500)
            .prop_map(|(user, amount)| Op::Slash { user: USERS[user], amount }),
        (0u64..4).prop_map(|role| Op::Deactivate { role }),
        (0u64..=3 * ONE_DAY).prop_map(|secs| Op::Advance { secs }),
    ]
}

/// Sum of every account the scenario can touch
fn circulating_total(registry: &Registry) -> Amount {
    let mut total = registry.vault_balance() + registry.ledger_balance(&addr(TREASURY));
    for user in USERS {
        total = total + registry.ledger_balance(&addr(user));
    }
    total
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn conservation_holds_across_random_operations(
        ops in proptest::collection::vec(op_strategy(), 1..60)
    ) {
        let admin = addr(0xa0);
        let keeper = addr(0xb0);
        let mut registry = Registry::new(admin, addr(TREASURY));
        registry.grant(admin, Capability::ConfigKeeper, keeper).unwrap();

        for user in USERS {
            registry.fund(addr(user), Amount::from_u64(100_000)).unwrap();
        }
        let genesis_total = circulating_total(&registry);

        let mut now = 0u64;
        for op in ops {
            // Individual operations may fail; conservation must survive
            // both outcomes.
            match op {
                Op::Configure { deposit, wait_days } => {
                    let _ = registry.set_configuration(
                        keeper,
                        Amount::from_u64(deposit),
                        wait_days * ONE_DAY,
                        now,
                    );
                }
                Op::Register { user, role } => {
                    let value = registry
                        .role(role)
                        .map(|r| r.registration_deposit_amount.clone())
                        .unwrap_or_else(Amount::zero);
                    let _ = registry.register(addr(user), role, value, now);
                }
                Op::Unregister { user, role } => {
                    let _ = registry.unregister(addr(user), role, now);
                }
                Op::Stake { user, amount } => {
                    let _ = registry.stake(addr(user), Amount::from_u64(amount));
                }
                Op::Unstake { user } => {
                    let _ = registry.unstake(addr(user));
                }
                Op::Slash { user, amount } => {
                    let _ = registry.slash(admin, addr(user), Amount::from_u64(amount));
                }
                Op::Deactivate { role } => {
                    let _ = registry.deactivate_role(keeper, role);
                }
                Op::Advance { secs } => {
                    now += secs;
                }
            }

            prop_assert_eq!(registry.vault_balance(), registry.expected_holdings());
        }

        // Funds moved between accounts, never in or out of the system
        prop_assert_eq!(circulating_total(&registry), genesis_total);
    }

    #[test]
    fn unstake_pays_out_exactly_the_staked_total(
        amounts in proptest::collection::vec(1u64..=1_000, 1..10)
    ) {
        let admin = addr(0xa0);
        let mut registry = Registry::new(admin, addr(TREASURY));
        let user = addr(0x11);
        registry.fund(user, Amount::from_u64(1_000_000)).unwrap();

        let mut staked = Amount::zero();
        for amount in amounts {
            registry.stake(user, Amount::from_u64(amount)).unwrap();
            staked = staked + Amount::from_u64(amount);
        }

        let withdrawn = registry.unstake(user).unwrap();
        prop_assert_eq!(withdrawn, staked);
        prop_assert!(registry.staker_balance(&user).is_zero());
        prop_assert_eq!(registry.ledger_balance(&user), Amount::from_u64(1_000_000));
    }
}
