// node/src/config.rs

use registry_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub access: AccessConfig,
    pub funds: FundsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Founding admin; may slash and administer capability grants
    pub admin: Address,
    /// Addresses granted the config-keeper capability at genesis
    pub config_keepers: Vec<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundsConfig {
    /// Destination account for slashed funds
    pub treasury: Address,
    /// Ledger balances credited at genesis (dev/test convenience)
    #[serde(default)]
    pub genesis_balances: BTreeMap<Address, Amount>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            access: AccessConfig {
                admin: "0x00000000000000000000000000000000000000a0"
                    .parse()
                    .unwrap(),
                config_keepers: vec![],
            },
            funds: FundsConfig {
                treasury: "0x00000000000000000000000000000000000000ee"
                    .parse()
                    .unwrap(),
                genesis_balances: BTreeMap::new(),
            },
        }
    }
}

impl NodeConfig {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn to_file(&self, path: &str) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roundtrips_through_toml() {
        let config = NodeConfig::default();
        let contents = toml::to_string_pretty(&config).unwrap();
        let parsed: NodeConfig = toml::from_str(&contents).unwrap();

        assert_eq!(parsed.access.admin, config.access.admin);
        assert_eq!(parsed.funds.treasury, config.funds.treasury);
        assert!(parsed.funds.genesis_balances.is_empty());
    }

    #[test]
    fn test_genesis_balances_parse() {
        let contents = r#"
            [access]
            admin = "0x00000000000000000000000000000000000000a0"
            config_keepers = ["0x00000000000000000000000000000000000000b0"]

            [funds]
            treasury = "0x00000000000000000000000000000000000000ee"

            [funds.genesis_balances]
            "0x0000000000000000000000000000000000000001" = "1000000000000000000"
        "#;

        let config: NodeConfig = toml::from_str(contents).unwrap();
        assert_eq!(config.access.config_keepers.len(), 1);

        let user: Address = "0x0000000000000000000000000000000000000001"
            .parse()
            .unwrap();
        assert_eq!(
            config.funds.genesis_balances.get(&user),
            Some(&Amount::from_tokens(1))
        );
    }
}
