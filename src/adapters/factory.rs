//! Client factory
//!
//! Builds the remote API clients the lifecycle operations take by injection.

use crate::adapters::arm::ArmClient;
use crate::adapters::servicebus::{NamespaceKeysClient, ServiceBusNamespacesClient};
use crate::adapters::web::{HybridConnectionsClient, WebAppsClient};
use crate::config::AzureConfig;
use crate::domain::Result;
use std::sync::Arc;

/// Remote API clients sharing one authenticated transport
#[derive(Clone)]
pub struct ClientHandles {
    pub hybrid_connections: Arc<dyn HybridConnectionsClient>,
    pub namespace_keys: Arc<dyn NamespaceKeysClient>,
}

/// Create the hybrid connection and namespace key clients
///
/// # Errors
///
/// Returns an error if the credential or the HTTP client cannot be created
pub fn create_clients(config: &AzureConfig) -> Result<ClientHandles> {
    let arm = Arc::new(ArmClient::from_config(config)?);
    tracing::info!(
        endpoint = %config.resource_manager_endpoint,
        subscription_id = %config.subscription_id,
        "Creating Azure Resource Manager clients"
    );

    Ok(ClientHandles {
        hybrid_connections: Arc::new(WebAppsClient::new(
            Arc::clone(&arm),
            config.web_api_version.clone(),
        )),
        namespace_keys: Arc::new(ServiceBusNamespacesClient::new(
            arm,
            config.service_bus_api_version.clone(),
        )),
    })
}
