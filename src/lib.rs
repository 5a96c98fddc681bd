// hybridconn - Azure App Service Hybrid Connection reconciler
// Copyright (c) 2025 Hybridconn Contributors
// Licensed under the MIT License

//! # hybridconn - App Service Hybrid Connection reconciler
//!
//! hybridconn manages one Azure App Service Hybrid Connection: the binding
//! from an App Service site to an Azure Relay hybrid connection endpoint. It
//! reconciles the declared binding against Azure Resource Manager through
//! the lifecycle callbacks of a declarative infrastructure resource.
//!
//! ## Overview
//!
//! - **CreateOrUpdate** validates the declared fields, refuses to adopt an
//!   unmanaged remote object, upserts the binding and reads it back
//! - **Read** refreshes the observed state and recovers the send key value
//!   from the Service Bus namespace
//! - **Delete** removes the binding under a configurable delete policy
//! - **Import** adopts an existing binding by identifier
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Resource lifecycle, operation deadlines, state and planning
//! - [`adapters`] - Azure Resource Manager clients (Microsoft.Web, Microsoft.ServiceBus)
//! - [`domain`] - Identifiers, the binding model, validation and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hybridconn::adapters::create_clients;
//! use hybridconn::config::load_config;
//! use hybridconn::core::HybridConnectionResource;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("hybridconn.toml")?;
//!     let clients = create_clients(&config.azure)?;
//!     let resource = HybridConnectionResource::from_config(&config, clients);
//!
//!     let data = resource.create_or_update(&config.resource, None).await?;
//!     println!("Managing {}", data.id);
//!
//!     if let Some(refreshed) = resource.read(&data.id.to_string()).await? {
//!         println!("Relay {} on port {:?}", refreshed.state.relay_name, refreshed.state.port);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result<T>`], an alias for
//! `Result<T, HybridConnError>`. Transport failures are carried as
//! [`domain::ArmError`], with "not found" kept apart from every other status.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

pub use domain::{HybridConnError, Result};
