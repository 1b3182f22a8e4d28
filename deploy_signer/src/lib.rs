//! Builds, signs and validates Casper deploys described in TOML.

#![deny(clippy::complexity)]
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]

pub mod cl_args;
pub mod commands;
pub mod config;
pub mod keys;
