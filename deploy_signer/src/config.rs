use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use serde::Deserialize;

use casper_deploy_types::{CLType, Deploy, DeployHash, PublicKey, TimeDiff, Timestamp};

/// Reads and parses the TOML deploy description at `config_path`.
pub fn read_config<P: AsRef<Path>>(config_path: P) -> Result<DeployConfig, Error> {
    let toml_content = std::fs::read_to_string(config_path.as_ref())
        .with_context(|| format!("Error reading {}", config_path.as_ref().display()))?;
    toml::from_str(&toml_content).context("Error parsing config into TOML format")
}

fn default_ttl() -> TimeDiff {
    Deploy::DEFAULT_TTL
}

fn default_gas_price() -> u64 {
    Deploy::DEFAULT_GAS_PRICE
}

/// Describes a deploy to be built and signed.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    pub chain_name: String,
    /// Defaults to the public key of the first signer.
    #[serde(default)]
    pub account: Option<PublicKey>,
    /// Defaults to the moment the deploy is built.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    #[serde(default = "default_ttl")]
    pub ttl: TimeDiff,
    #[serde(default = "default_gas_price")]
    pub gas_price: u64,
    #[serde(default)]
    pub dependencies: Vec<DeployHash>,
    /// Key files of the signers, in signing order. Relative paths are resolved against the
    /// directory of the config file.
    pub secret_key_paths: Vec<PathBuf>,
    pub payment: ItemConfig,
    pub session: ItemConfig,
}

/// Describes a payment or session item.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum ItemConfig {
    /// Standard payment: empty module bytes with a single `amount` argument.
    StandardPayment {
        /// Decimal motes.
        amount: String,
    },
    ModuleBytes {
        /// Path to the Wasm module, resolved like `secret_key_paths`.
        module_path: PathBuf,
        #[serde(default)]
        args: Vec<ArgConfig>,
    },
    StoredContractByHash {
        hash: String,
        entry_point: String,
        #[serde(default)]
        args: Vec<ArgConfig>,
    },
    StoredContractByName {
        name: String,
        entry_point: String,
        #[serde(default)]
        args: Vec<ArgConfig>,
    },
    StoredVersionedContractByHash {
        hash: String,
        #[serde(default)]
        version: Option<u32>,
        entry_point: String,
        #[serde(default)]
        args: Vec<ArgConfig>,
    },
    StoredVersionedContractByName {
        name: String,
        #[serde(default)]
        version: Option<u32>,
        entry_point: String,
        #[serde(default)]
        args: Vec<ArgConfig>,
    },
    Transfer {
        /// Decimal motes.
        amount: String,
        /// A public key in hex, or a formatted URef.
        target: String,
        /// A formatted URef; the account's main purse when absent.
        #[serde(default)]
        source: Option<String>,
        #[serde(default)]
        id: Option<u64>,
    },
}

/// A single typed runtime argument.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ArgConfig {
    pub name: String,
    pub cl_type: CLType,
    /// Omitted for `Unit` and for an empty `Option`.
    #[serde(default)]
    pub value: Option<toml::Value>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn should_parse_example_config() {
        let parsed_config =
            read_config("EXAMPLE_DEPLOY.toml").expect("Error parsing EXAMPLE_DEPLOY.toml");

        assert_eq!(parsed_config.chain_name, "casper-test");
        assert_eq!(parsed_config.account, None);
        assert_eq!(
            parsed_config.timestamp,
            Some("2020-11-17T00:39:24.072Z".parse().unwrap())
        );
        assert_eq!(parsed_config.ttl, TimeDiff::from_seconds(30 * 60));
        assert_eq!(parsed_config.gas_price, 1);
        assert_eq!(parsed_config.secret_key_paths.len(), 1);
        assert_eq!(
            parsed_config.payment,
            ItemConfig::StandardPayment {
                amount: "2500000000".to_string()
            }
        );
        match &parsed_config.session {
            ItemConfig::StoredContractByName {
                name,
                entry_point,
                args,
            } => {
                assert_eq!(name, "faucet");
                assert_eq!(entry_point, "call_faucet");
                let types: Vec<&CLType> = args.iter().map(|arg| &arg.cl_type).collect();
                assert_eq!(
                    types,
                    vec![
                        &CLType::U512,
                        &CLType::option(CLType::U64),
                        &CLType::list(CLType::String),
                        &CLType::ByteArray(4),
                        &CLType::tuple2(CLType::Bool, CLType::I32),
                    ]
                );
            }
            other => panic!("unexpected session {:?}", other),
        }
    }

    #[test]
    fn defaults_should_apply() {
        let config: DeployConfig = toml::from_str(
            r#"
            chain_name = "casper"
            secret_key_paths = ["a.toml"]

            [payment]
            type = "standard_payment"
            amount = "1"

            [session]
            type = "transfer"
            amount = "2500000000"
            target = "uref-0000000000000000000000000000000000000000000000000000000000000000-007"
            "#,
        )
        .unwrap();
        assert_eq!(config.ttl, Deploy::DEFAULT_TTL);
        assert_eq!(config.gas_price, Deploy::DEFAULT_GAS_PRICE);
        assert!(config.dependencies.is_empty());
        assert!(matches!(
            config.session,
            ItemConfig::Transfer {
                source: None,
                id: None,
                ..
            }
        ));
    }

    #[test]
    fn unknown_fields_should_be_rejected() {
        let result = toml::from_str::<DeployConfig>(
            r#"
            chain_name = "casper"
            chain_id = 7
            secret_key_paths = []
            payment = { type = "standard_payment", amount = "1" }
            session = { type = "standard_payment", amount = "1" }
            "#,
        );
        assert!(result.is_err());
    }
}
