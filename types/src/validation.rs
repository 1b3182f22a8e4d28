use serde::Serialize;
use thiserror::Error;

use crate::{bytesrepr, digest::Digest, timestamp::TimeDiff};

/// A representation of the way in which a deploy failed its integrity checks.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum DeployValidationFailure {
    /// The provided body hash does not match the actual hash of the body.
    #[error(
        "the provided body hash {} does not match the computed body hash {}",
        .provided.to_hex(),
        .computed.to_hex()
    )]
    InvalidBodyHash {
        /// The body hash stored in the header.
        provided: Digest,
        /// The hash of the stored payment and session.
        computed: Digest,
    },

    /// The provided deploy hash does not match the actual hash of the deploy.
    #[error(
        "the provided hash {} does not match the computed deploy hash {}",
        .provided.to_hex(),
        .computed.to_hex()
    )]
    InvalidDeployHash {
        /// The hash stored in the deploy.
        provided: Digest,
        /// The hash of the stored header.
        computed: Digest,
    },

    /// The deploy has no approvals.
    #[error("the deploy has no approvals")]
    EmptyApprovals,

    /// Invalid approval.
    #[error("the approval at index {index} is invalid: {error_msg}")]
    InvalidApproval {
        /// The index of the approval at fault.
        index: usize,
        /// The approval validation error.
        error_msg: String,
    },

    /// Part of the deploy could not be re-encoded for hashing.
    #[error("failed to encode deploy: {0}")]
    Encoding(#[from] bytesrepr::Error),
}

/// A representation of the way in which a deploy fails the policy of the chain it targets.
#[derive(Clone, Eq, PartialEq, Debug, Error, Serialize)]
pub enum DeployConfigurationFailure {
    /// Invalid chain name.
    #[error("invalid chain name: expected {expected}, got {got}")]
    InvalidChainName {
        /// The expected chain name.
        expected: String,
        /// The received chain name.
        got: String,
    },

    /// Too many dependencies.
    #[error("{got} dependencies exceeds limit of {max_dependencies}")]
    ExcessiveDependencies {
        /// The dependencies limit.
        max_dependencies: u8,
        /// The actual number of dependencies provided.
        got: usize,
    },

    /// Deploy is too large.
    #[error("deploy size too large: {0}")]
    ExcessiveSize(#[from] ExcessiveSizeError),

    /// Excessive time-to-live.
    #[error("time-to-live of {got} exceeds limit of {max_ttl}")]
    ExcessiveTimeToLive {
        /// The time-to-live limit.
        max_ttl: TimeDiff,
        /// The received time-to-live.
        got: TimeDiff,
    },
}

/// Error returned when a Deploy is too large.
#[derive(Clone, Eq, PartialEq, Debug, Error, Serialize)]
#[error("deploy size of {actual_deploy_size} bytes exceeds limit of {max_deploy_size}")]
pub struct ExcessiveSizeError {
    /// The maximum permitted serialized deploy size, in bytes.
    pub max_deploy_size: u32,
    /// The serialized size of the deploy provided, in bytes.
    pub actual_deploy_size: usize,
}
