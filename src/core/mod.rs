//! Core lifecycle logic for hybridconn.
//!
//! # Modules
//!
//! - [`resource`] - CreateOrUpdate, Read, Delete and Import of the hybrid connection
//! - [`context`] - Per-operation deadline and stop signal
//! - [`state`] - Persisted identifier and observed attributes
//! - [`plan`] - Create, update or replace decision for `apply`
//!
//! # Example
//!
//! ```rust,no_run
//! use hybridconn::adapters::create_clients;
//! use hybridconn::config::load_config;
//! use hybridconn::core::{HybridConnectionResource, StopSignal};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hybridconn.toml")?;
//! let clients = create_clients(&config.azure)?;
//!
//! let (_stop_tx, stop_rx) = tokio::sync::watch::channel(false);
//! let resource = HybridConnectionResource::from_config(&config, clients)
//!     .with_stop_signal(StopSignal::new(stop_rx));
//!
//! let data = resource.create_or_update(&config.resource, None).await?;
//! println!("Managing {}", data.id);
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod plan;
pub mod resource;
pub mod state;

pub use context::{Operation, OperationContext, StopSignal};
pub use plan::Plan;
pub use resource::{HybridConnectionResource, ResourceData, SendKeyLookup};
pub use state::{ResourceState, StateStore, STATE_VERSION};
