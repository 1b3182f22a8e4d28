#![deny(clippy::complexity)]
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Error};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use casper_deploy_signer::{
    commands::{self, ChainLimits},
    keys,
};
use casper_deploy_types::{AlgorithmTag, TimeDiff};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CmdLineArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and sign a deploy from a TOML description, printing its JSON form
    Make {
        /// Path to the TOML-formatted deploy description
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,
        /// Write the deploy here instead of to stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Add an approval to an existing JSON deploy
    Sign {
        #[arg(short, long, value_name = "FILE")]
        deploy: PathBuf,
        /// Path to the TOML-formatted key file of the signer
        #[arg(short, long, value_name = "FILE")]
        secret_key: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Check a JSON deploy's hashes and approvals, and its limits when a chain name is given
    Validate {
        #[arg(short, long, value_name = "FILE")]
        deploy: PathBuf,
        #[arg(long)]
        chain_name: Option<String>,
        #[arg(long, default_value = "18h")]
        max_ttl: TimeDiff,
        #[arg(long, default_value_t = 10)]
        max_dependencies: u8,
    },
    /// Generate a key file
    Keygen {
        #[arg(short, long, default_value = "ed25519")]
        algorithm: AlgorithmTag,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<(), Error> {
    // Install global collector for tracing, keeping stdout for the command's output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = CmdLineArgs::parse();
    run(args.command)
}

fn run(command: Command) -> Result<(), Error> {
    match command {
        Command::Make { config, output } => {
            let deploy = commands::make(&config)?;
            emit(&to_json(&deploy)?, output.as_deref())
        }
        Command::Sign {
            deploy,
            secret_key,
            output,
        } => {
            let deploy = commands::sign(&deploy, &secret_key)?;
            emit(&to_json(&deploy)?, output.as_deref())
        }
        Command::Validate {
            deploy,
            chain_name,
            max_ttl,
            max_dependencies,
        } => {
            let deploy = commands::read_deploy(&deploy)?;
            let limits = chain_name.map(|chain_name| ChainLimits {
                chain_name,
                max_ttl,
                max_dependencies,
            });
            let verdict = commands::validate(&deploy, limits.as_ref())?;
            println!("{}", verdict);
            Ok(())
        }
        Command::Keygen { algorithm, output } => {
            let key_file = keys::generate(algorithm);
            let toml_content =
                toml::to_string(&key_file).context("Error serializing key file")?;
            emit(&toml_content, output.as_deref())
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).context("Error serializing deploy")
}

fn emit(content: &str, output: Option<&Path>) -> Result<(), Error> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Error writing {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_should_be_well_formed() {
        CmdLineArgs::command().debug_assert();
    }

    #[test]
    fn validate_should_default_its_limits() {
        let args = CmdLineArgs::parse_from([
            "casper-deploy-signer",
            "validate",
            "--deploy",
            "deploy.json",
            "--chain-name",
            "casper-test",
        ]);
        match args.command {
            Command::Validate {
                chain_name,
                max_ttl,
                max_dependencies,
                ..
            } => {
                assert_eq!(chain_name.as_deref(), Some("casper-test"));
                assert_eq!(max_ttl, TimeDiff::from_seconds(18 * 3_600));
                assert_eq!(max_dependencies, 10);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn keygen_should_parse_algorithm() {
        let args = CmdLineArgs::parse_from(["casper-deploy-signer", "keygen", "-a", "secp256k1"]);
        assert!(matches!(
            args.command,
            Command::Keygen {
                algorithm: AlgorithmTag::Secp256k1,
                output: None
            }
        ));
    }
}
