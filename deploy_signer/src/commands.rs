use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Error};
use tracing::info;

use casper_deploy_types::{
    bytesrepr::Bytes, ContractHash, ContractPackageHash, Deploy, DeployConfigurationFailure,
    DeployValidationFailure, ExecutableDeployItem, PublicKey, TimeDiff, Timestamp,
    TransferTarget, URef, U512,
};

use crate::{
    cl_args,
    config::{read_config, DeployConfig, ItemConfig},
    keys,
};

/// Limits a deploy is checked against by `validate` when a chain name is given.
#[derive(Clone, Debug)]
pub struct ChainLimits {
    pub chain_name: String,
    pub max_ttl: TimeDiff,
    pub max_dependencies: u8,
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Builds and signs the deploy described by the config file at `config_path`.
pub fn make(config_path: &Path) -> Result<Deploy, Error> {
    let config = read_config(config_path).context("Error constructing config")?;
    info!("Configuration loaded");
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    build_deploy(&config, base_dir)
}

/// Builds the deploy described by `config`, then signs it with every configured key in order.
pub fn build_deploy(config: &DeployConfig, base_dir: &Path) -> Result<Deploy, Error> {
    let secret_keys = config
        .secret_key_paths
        .iter()
        .map(|path| keys::read_secret_key(resolve(base_dir, path)))
        .collect::<Result<Vec<_>, _>>()?;

    let account = match (&config.account, secret_keys.first()) {
        (Some(account), _) => *account,
        (None, Some(first_signer)) => PublicKey::from(first_signer),
        (None, None) => return Err(anyhow!("no account given and no signers to default to")),
    };

    let payment = build_item(&config.payment, base_dir).context("Error building payment")?;
    let session = build_item(&config.session, base_dir).context("Error building session")?;

    let mut deploy = Deploy::new(
        config.timestamp.unwrap_or_else(Timestamp::now),
        config.ttl,
        config.gas_price,
        config.dependencies.clone(),
        config.chain_name.clone(),
        account,
        payment,
        session,
    )
    .context("Error encoding deploy")?;

    for secret_key in &secret_keys {
        deploy.sign(secret_key);
    }
    Ok(deploy)
}

/// Builds the execution item described by `item`.
pub fn build_item(item: &ItemConfig, base_dir: &Path) -> Result<ExecutableDeployItem, Error> {
    let item = match item {
        ItemConfig::StandardPayment { amount } => {
            ExecutableDeployItem::new_standard_payment(parse_amount(amount)?)?
        }
        ItemConfig::ModuleBytes { module_path, args } => {
            let module_path = resolve(base_dir, module_path);
            let module_bytes = std::fs::read(&module_path)
                .with_context(|| format!("Error reading {}", module_path.display()))?;
            ExecutableDeployItem::new_module_bytes(
                Bytes::from(module_bytes),
                cl_args::runtime_args(args)?,
            )
        }
        ItemConfig::StoredContractByHash {
            hash,
            entry_point,
            args,
        } => ExecutableDeployItem::new_stored_contract_by_hash(
            ContractHash::from_hex(hash).context("Error parsing contract hash")?,
            entry_point.clone(),
            cl_args::runtime_args(args)?,
        ),
        ItemConfig::StoredContractByName {
            name,
            entry_point,
            args,
        } => ExecutableDeployItem::new_stored_contract_by_name(
            name.clone(),
            entry_point.clone(),
            cl_args::runtime_args(args)?,
        ),
        ItemConfig::StoredVersionedContractByHash {
            hash,
            version,
            entry_point,
            args,
        } => ExecutableDeployItem::new_stored_versioned_contract_by_hash(
            ContractPackageHash::from_hex(hash).context("Error parsing contract package hash")?,
            *version,
            entry_point.clone(),
            cl_args::runtime_args(args)?,
        ),
        ItemConfig::StoredVersionedContractByName {
            name,
            version,
            entry_point,
            args,
        } => ExecutableDeployItem::new_stored_versioned_contract_by_name(
            name.clone(),
            *version,
            entry_point.clone(),
            cl_args::runtime_args(args)?,
        ),
        ItemConfig::Transfer {
            amount,
            target,
            source,
            id,
        } => {
            let target = if target.starts_with("uref-") {
                TransferTarget::URef(URef::from_formatted_str(target)?)
            } else {
                TransferTarget::PublicKey(PublicKey::from_hex(target)?)
            };
            let source = source
                .as_deref()
                .map(URef::from_formatted_str)
                .transpose()
                .context("Error parsing transfer source")?;
            ExecutableDeployItem::new_transfer(parse_amount(amount)?, source, target, *id)?
        }
    };
    Ok(item)
}

fn parse_amount(amount: &str) -> Result<U512, Error> {
    U512::from_dec_str(amount).map_err(|error| anyhow!("invalid amount '{}': {:?}", amount, error))
}

/// Reads a deploy from its JSON form.
pub fn read_deploy(path: &Path) -> Result<Deploy, Error> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Error reading deploy {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Error parsing deploy {}", path.display()))
}

/// Appends an approval by the key in `secret_key_path` to the deploy at `deploy_path`.
pub fn sign(deploy_path: &Path, secret_key_path: &Path) -> Result<Deploy, Error> {
    let mut deploy = read_deploy(deploy_path)?;
    let secret_key = keys::read_secret_key(secret_key_path)?;
    deploy.sign(&secret_key);
    Ok(deploy)
}

/// Checks the deploy's hashes and approvals, then its compliance with `limits` if given.
///
/// Returns a one-line verdict naming the deploy.
pub fn validate(deploy: &Deploy, limits: Option<&ChainLimits>) -> Result<String, Error> {
    deploy.is_valid().map_err(|failure: DeployValidationFailure| {
        anyhow!(failure).context(format!("Deploy {} is invalid", deploy.hash()))
    })?;
    if let Some(limits) = limits {
        deploy
            .is_config_compliant(&limits.chain_name, limits.max_ttl, limits.max_dependencies)
            .map_err(|failure: DeployConfigurationFailure| {
                anyhow!(failure).context(format!(
                    "Deploy {} does not comply with chain {}",
                    deploy.hash(),
                    limits.chain_name
                ))
            })?;
    }
    let verdict = match limits {
        Some(limits) => format!(
            "Deploy {} is valid for chain {}",
            deploy.hash(),
            limits.chain_name
        ),
        None => format!("Deploy {} is valid", deploy.hash()),
    };
    info!("{}", verdict);
    Ok(verdict)
}
