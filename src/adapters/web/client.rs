//! REST implementation of [`HybridConnectionsClient`]

use super::models::HybridConnection;
use super::traits::HybridConnectionsClient;
use crate::adapters::arm::{ArmClient, ArmResult};
use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

const PROVIDER: &str = "Microsoft.Web";

/// Hybrid connection client backed by the `Microsoft.Web` provider API
pub struct WebAppsClient {
    arm: Arc<ArmClient>,
    api_version: String,
}

impl WebAppsClient {
    pub fn new(arm: Arc<ArmClient>, api_version: impl Into<String>) -> Self {
        Self {
            arm,
            api_version: api_version.into(),
        }
    }

    fn relay_url(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<Url> {
        self.arm.resource_url(
            resource_group,
            PROVIDER,
            &[
                "sites",
                site_name,
                "hybridConnectionNamespaces",
                namespace_name,
                "relays",
                relay_name,
            ],
            &self.api_version,
        )
    }
}

#[async_trait]
impl HybridConnectionsClient for WebAppsClient {
    async fn get_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<HybridConnection> {
        let url = self.relay_url(resource_group, site_name, namespace_name, relay_name)?;
        tracing::debug!(
            resource_group = %resource_group,
            site_name = %site_name,
            namespace_name = %namespace_name,
            relay_name = %relay_name,
            "Getting hybrid connection"
        );
        self.arm.get_json(url).await
    }

    async fn create_or_update_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
        envelope: &HybridConnection,
    ) -> ArmResult<HybridConnection> {
        let url = self.relay_url(resource_group, site_name, namespace_name, relay_name)?;
        tracing::debug!(
            resource_group = %resource_group,
            site_name = %site_name,
            namespace_name = %namespace_name,
            relay_name = %relay_name,
            "Upserting hybrid connection"
        );
        self.arm.put_json(url, envelope).await
    }

    async fn delete_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<()> {
        let url = self.relay_url(resource_group, site_name, namespace_name, relay_name)?;
        tracing::debug!(
            resource_group = %resource_group,
            site_name = %site_name,
            namespace_name = %namespace_name,
            relay_name = %relay_name,
            "Deleting hybrid connection"
        );
        self.arm.delete(url).await
    }
}
