//! App Service hybrid connection client trait

use super::models::HybridConnection;
use crate::adapters::arm::ArmResult;
use async_trait::async_trait;

/// Operations on `Microsoft.Web/sites/hybridConnectionNamespaces/relays`
///
/// Implementations report a missing object as [`ArmError::NotFound`](crate::domain::ArmError::NotFound)
/// so that callers can tell absence apart from other failures.
#[async_trait]
pub trait HybridConnectionsClient: Send + Sync {
    /// Fetch a hybrid connection
    async fn get_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<HybridConnection>;

    /// Create or replace a hybrid connection and return the stored resource
    async fn create_or_update_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
        envelope: &HybridConnection,
    ) -> ArmResult<HybridConnection>;

    /// Delete a hybrid connection
    async fn delete_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<()>;
}
