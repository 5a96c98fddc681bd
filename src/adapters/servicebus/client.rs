//! REST implementation of [`NamespaceKeysClient`]

use super::models::AccessKeys;
use super::traits::NamespaceKeysClient;
use crate::adapters::arm::{ArmClient, ArmResult};
use async_trait::async_trait;
use std::sync::Arc;

const PROVIDER: &str = "Microsoft.ServiceBus";

/// Namespace key client backed by the `Microsoft.ServiceBus` provider API
pub struct ServiceBusNamespacesClient {
    arm: Arc<ArmClient>,
    api_version: String,
}

impl ServiceBusNamespacesClient {
    pub fn new(arm: Arc<ArmClient>, api_version: impl Into<String>) -> Self {
        Self {
            arm,
            api_version: api_version.into(),
        }
    }
}

#[async_trait]
impl NamespaceKeysClient for ServiceBusNamespacesClient {
    async fn list_keys(
        &self,
        resource_group: &str,
        namespace_name: &str,
        authorization_rule: &str,
    ) -> ArmResult<AccessKeys> {
        let url = self.arm.resource_url(
            resource_group,
            PROVIDER,
            &[
                "namespaces",
                namespace_name,
                "AuthorizationRules",
                authorization_rule,
                "listKeys",
            ],
            &self.api_version,
        )?;

        tracing::debug!(
            resource_group = %resource_group,
            namespace_name = %namespace_name,
            authorization_rule = %authorization_rule,
            "Listing namespace authorization rule keys"
        );
        self.arm.post_json(url).await
    }
}
