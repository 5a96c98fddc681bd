//! Azure Resource Manager transport
//!
//! Shared HTTP plumbing for the provider clients: URL construction under a
//! subscription and resource group, bearer authentication, request
//! correlation and mapping of ARM error envelopes to [`ArmError`].

pub mod client;
pub mod credential;

use crate::domain::ArmError;

pub use client::ArmClient;
pub use credential::{
    resource_manager_scope, token_source_from_config, AccessTokenSource, ClientSecretTokenSource,
    StaticTokenSource,
};

/// Result of a Resource Manager call
pub type ArmResult<T> = std::result::Result<T, ArmError>;
