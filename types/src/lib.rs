//! Canonical encoding, hashing and signing of Casper deploys.
//!
//! A [`Deploy`] is built from a header and two [`ExecutableDeployItem`]s whose arguments are
//! [`CLValue`]s. Construction hashes the encoded body into the header and the encoded header into
//! the deploy hash, which is what each [`Approval`] signs.

#![deny(clippy::complexity)]
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]

pub mod bytesrepr;
mod cl_type;
mod cl_value;
pub mod crypto;
mod deploy;
mod digest;
mod executable_deploy_item;
mod runtime_args;
#[cfg(any(feature = "testing", test))]
pub mod testing;
mod timestamp;
mod uint;
mod uref;
mod validation;

pub use cl_type::{CLType, CLTyped, CL_TYPE_RECURSION_DEPTH};
pub use cl_value::{CLValue, CLValueError};
pub use crypto::{AlgorithmTag, PublicKey, SecretKey, Signature};
pub use deploy::{
    Approval, Deploy, DeployHash, DeployHeader, MAX_SERIALIZED_SIZE_OF_DEPLOY,
};
pub use digest::Digest;
pub use executable_deploy_item::{
    ContractHash, ContractPackageHash, ContractVersion, ExecutableDeployItem, TransferTarget,
    ARG_AMOUNT, ARG_ID, ARG_SOURCE, ARG_TARGET,
};
pub use runtime_args::{NamedArg, RuntimeArgs};
pub use timestamp::{TimeDiff, Timestamp};
pub use uint::{U128, U256, U512};
pub use uref::{AccessRights, URef, URefAddr, URefFromStrError};
pub use validation::{DeployConfigurationFailure, DeployValidationFailure, ExcessiveSizeError};
