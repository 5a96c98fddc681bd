//! External system integrations for hybridconn.
//!
//! - [`arm`] - Azure Resource Manager transport and credentials
//! - [`web`] - App Service hybrid connections (`Microsoft.Web`)
//! - [`servicebus`] - Service Bus namespace keys (`Microsoft.ServiceBus`)
//!
//! # Design Pattern
//!
//! Each remote API sits behind an `async_trait` trait. The lifecycle
//! operations receive `Arc<dyn ...>` handles, so tests substitute in-memory
//! implementations.
//!
//! ```rust,no_run
//! use hybridconn::adapters::create_clients;
//! use hybridconn::config::{AuthType, AzureConfig, secret_string};
//!
//! # fn example() -> hybridconn::domain::Result<()> {
//! let config = AzureConfig {
//!     subscription_id: "00000000-0000-0000-0000-000000000000".to_string(),
//!     auth_type: AuthType::AccessToken,
//!     access_token: Some(secret_string("token".to_string())),
//!     ..Default::default()
//! };
//!
//! let clients = create_clients(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod arm;
pub mod factory;
pub mod servicebus;
pub mod web;

pub use factory::{create_clients, ClientHandles};
