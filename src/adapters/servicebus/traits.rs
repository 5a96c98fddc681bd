//! Service Bus namespace key client trait

use super::models::AccessKeys;
use crate::adapters::arm::ArmResult;
use async_trait::async_trait;

/// Access to the keys of a namespace authorization rule
#[async_trait]
pub trait NamespaceKeysClient: Send + Sync {
    /// List the primary and secondary keys of an authorization rule
    async fn list_keys(
        &self,
        resource_group: &str,
        namespace_name: &str,
        authorization_rule: &str,
    ) -> ArmResult<AccessKeys>;
}
