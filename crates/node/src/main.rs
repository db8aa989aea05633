// node/src/main.rs

use clap::{Parser, Subcommand};
use node::{NodeConfig, Store};
use registry_core::{Capability, Registry};
use registry_types::{Address, Amount, RoleId, Timestamp};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "registry-node")]
#[command(about = "Role-gated staking registry", version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Data directory holding the registry snapshot
    #[arg(long, global = true, default_value = "./data")]
    data_dir: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a data directory from a TOML config
    Init {
        /// Configuration file path (written with defaults if missing)
        #[arg(short, long, default_value = "./registry.toml")]
        config: String,
    },

    /// Create a new role (config keeper only)
    SetConfiguration {
        #[arg(short, long)]
        caller: Address,

        /// Registration deposit in base units
        #[arg(short, long)]
        deposit: Amount,

        /// Registration wait time in seconds
        #[arg(short, long)]
        wait_time: u64,
    },

    /// Register for a role, locking its deposit
    Register {
        #[arg(short, long)]
        caller: Address,

        /// Target role (defaults to the newest role)
        #[arg(short, long)]
        role: Option<RoleId>,

        /// Transferred value (defaults to the role's exact deposit)
        #[arg(short, long)]
        value: Option<Amount>,
    },

    /// Unregister and reclaim the deposit
    Unregister {
        #[arg(short, long)]
        caller: Address,

        /// Target role (defaults to the most recent active registration)
        #[arg(short, long)]
        role: Option<RoleId>,
    },

    /// Add at-risk stake
    Stake {
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        amount: Amount,
    },

    /// Withdraw the entire staker balance
    Unstake {
        #[arg(short, long)]
        caller: Address,
    },

    /// Confiscate part of a staker's balance (admin only)
    Slash {
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        staker: Address,

        #[arg(short, long)]
        amount: Amount,
    },

    /// Stop new registrations for a role (config keeper only)
    DeactivateRole {
        #[arg(short, long)]
        caller: Address,

        #[arg(short, long)]
        role: RoleId,
    },

    /// Grant a capability (admin only)
    Grant {
        #[arg(short, long)]
        caller: Address,

        #[arg(long, value_enum)]
        capability: CapabilityArg,

        #[arg(short, long)]
        address: Address,
    },

    /// Revoke a capability (admin only)
    Revoke {
        #[arg(short, long)]
        caller: Address,

        #[arg(long, value_enum)]
        capability: CapabilityArg,

        #[arg(short, long)]
        address: Address,
    },

    /// Credit an external account (dev tool)
    Fund {
        #[arg(long)]
        address: Address,

        #[arg(long)]
        amount: Amount,
    },

    /// Show roles, balances and the conservation totals
    Status,

    /// Print the audit log, one JSON record per line
    Events,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CapabilityArg {
    ConfigKeeper,
    Admin,
}

impl From<CapabilityArg> for Capability {
    fn from(arg: CapabilityArg) -> Self {
        match arg {
            CapabilityArg::ConfigKeeper => Capability::ConfigKeeper,
            CapabilityArg::Admin => Capability::Admin,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}={},registry_core={}",
                    env!("CARGO_PKG_NAME"),
                    log_level,
                    log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = Store::new(&cli.data_dir);

    match cli.command {
        Commands::Init { config } => init_registry(&cli.data_dir, &config)?,
        Commands::Status => show_status(&store.load()?),
        Commands::Events => show_events(&store.load()?)?,
        command => {
            let mut registry = store.load()?;
            apply_command(&mut registry, command, current_timestamp())?;
            store.save(&registry)?;
        }
    }

    Ok(())
}

/// Clock read for the operation being executed
fn current_timestamp() -> Timestamp {
    chrono::Utc::now().timestamp() as Timestamp
}

fn init_registry(data_dir: &str, config_path: &str) -> anyhow::Result<()> {
    let config = if Path::new(config_path).exists() {
        tracing::info!("Loading configuration from {}", config_path);
        NodeConfig::from_file(config_path)?
    } else {
        tracing::info!("Writing default configuration to {}", config_path);
        let config = NodeConfig::default();
        config.to_file(config_path)?;
        config
    };

    std::fs::create_dir_all(data_dir)?;
    let store = Store::new(data_dir);
    if store.exists() {
        anyhow::bail!("snapshot already exists at {}", store.path().display());
    }

    let admin = config.access.admin;
    let mut registry = Registry::new(admin, config.funds.treasury);
    for keeper in &config.access.config_keepers {
        registry.grant(admin, Capability::ConfigKeeper, *keeper)?;
    }
    for (address, amount) in &config.funds.genesis_balances {
        registry.fund(*address, amount.clone())?;
    }
    store.save(&registry)?;

    tracing::info!("Registry initialized at {}", store.path().display());
    tracing::info!("Edit {} to adjust genesis settings", config_path);
    Ok(())
}

fn apply_command(
    registry: &mut Registry,
    command: Commands,
    now: Timestamp,
) -> anyhow::Result<()> {
    match command {
        Commands::SetConfiguration {
            caller,
            deposit,
            wait_time,
        } => {
            let role_id = registry.set_configuration(caller, deposit, wait_time, now)?;
            tracing::info!("Configured role {}", role_id);
        }
        Commands::Register {
            caller,
            role,
            value,
        } => {
            let role_id = role
                .or_else(|| registry.latest_role())
                .ok_or_else(|| anyhow::anyhow!("no roles configured yet"))?;
            let value = match value {
                Some(value) => value,
                None => registry
                    .role(role_id)
                    .map(|r| r.registration_deposit_amount.clone())
                    .unwrap_or_else(Amount::zero),
            };
            registry.register(caller, role_id, value, now)?;
            tracing::info!("{} registered for role {}", caller, role_id);
        }
        Commands::Unregister { caller, role } => {
            let role_id = role
                .or_else(|| registry.latest_active_registration(&caller))
                .ok_or_else(|| anyhow::anyhow!("{} has no active registration", caller))?;
            let refund = registry.unregister(caller, role_id, now)?;
            tracing::info!("{} unregistered from role {}, refunded {}", caller, role_id, refund);
        }
        Commands::Stake { caller, amount } => {
            registry.stake(caller, amount.clone())?;
            tracing::info!("{} staked {}", caller, amount);
        }
        Commands::Unstake { caller } => {
            let withdrawn = registry.unstake(caller)?;
            tracing::info!("{} unstaked {}", caller, withdrawn);
        }
        Commands::Slash {
            caller,
            staker,
            amount,
        } => {
            registry.slash(caller, staker, amount.clone())?;
            tracing::info!("Slashed {} by {}", staker, amount);
        }
        Commands::DeactivateRole { caller, role } => {
            registry.deactivate_role(caller, role)?;
            tracing::info!("Deactivated role {}", role);
        }
        Commands::Grant {
            caller,
            capability,
            address,
        } => {
            registry.grant(caller, capability.into(), address)?;
            tracing::info!("Granted capability to {}", address);
        }
        Commands::Revoke {
            caller,
            capability,
            address,
        } => {
            registry.revoke(caller, capability.into(), address)?;
            tracing::info!("Revoked capability from {}", address);
        }
        Commands::Fund { address, amount } => {
            registry.fund(address, amount.clone())?;
            tracing::info!("Funded {} with {}", address, amount);
        }
        Commands::Init { .. } | Commands::Status | Commands::Events => unreachable!(),
    }
    Ok(())
}

fn show_status(registry: &Registry) {
    tracing::info!(
        "Roles: {} configured, next role id {}",
        registry.role_count(),
        registry.next_role_id()
    );
    for role_id in 0..registry.next_role_id() {
        if let Some(role) = registry.role(role_id) {
            tracing::info!(
                "  role {}: deposit {}, deadline {}, active {}",
                role_id,
                role.registration_deposit_amount,
                role.deadline,
                role.is_active
            );
        }
    }
    tracing::info!("Vault balance:   {}", registry.vault_balance());
    tracing::info!("Active deposits: {}", registry.total_active_deposits());
    tracing::info!("Staked total:    {}", registry.total_staked());
    tracing::info!("Audit records:   {}", registry.events().len());
}

fn show_events(registry: &Registry) -> anyhow::Result<()> {
    for event in registry.events() {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
