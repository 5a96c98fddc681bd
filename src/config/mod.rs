//! Configuration management for hybridconn.
//!
//! hybridconn reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HYBRIDCONN_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation of every section
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AzureConfig`] - Resource Manager endpoint, subscription and credentials
//! - [`FeaturesConfig`] - Import-conflict precheck and delete policy
//! - [`TimeoutsConfig`] - Create, read, update and delete deadlines
//! - [`StateConfig`] - Location of the persisted state
//! - `[resource]` - The declared [`HybridConnectionBinding`](crate::domain::HybridConnectionBinding)
//! - [`LoggingConfig`] - Console and file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [azure]
//! subscription_id = "00000000-0000-0000-0000-000000000000"
//! tenant_id = "11111111-1111-1111-1111-111111111111"
//! client_id = "22222222-2222-2222-2222-222222222222"
//! client_secret = "${HYBRIDCONN_AZURE_CLIENT_SECRET}"
//!
//! [resource]
//! app_service_name = "site1"
//! resource_group_name = "rg1"
//! relay_id = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Relay/namespaces/ns1/hybridConnections/relay1"
//! hostname = "h.example.net"
//! port = 443
//! service_bus_namespace = "ns1"
//! send_key_name = "key1"
//! send_key_value = "${HYBRIDCONN_SEND_KEY_VALUE}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, AuthType, AzureConfig, DeletePolicy, FeaturesConfig, HybridConnConfig,
    LoggingConfig, StateConfig, TimeoutsConfig, MAX_TIMEOUT_SECONDS,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
