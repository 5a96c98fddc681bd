//! Domain models and types for hybridconn.
//!
//! The domain layer provides:
//! - **Identifiers** ([`HybridConnectionId`], [`RelayId`], [`ResourceId`]) as parse/format pairs
//! - **The binding model** ([`HybridConnectionBinding`] declared, [`BindingState`] observed)
//! - **Field validators** ([`validation`])
//! - **Error types** ([`HybridConnError`], [`ArmError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use hybridconn::domain::{HybridConnectionId, RelayId};
//!
//! # fn example() -> Result<(), String> {
//! let relay = RelayId::parse(
//!     "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Relay/namespaces/ns1/hybridConnections/relay1",
//! )?;
//! let id = HybridConnectionId::new("0000", "rg1", "site1", &relay.namespace_name, &relay.name);
//! assert_eq!(HybridConnectionId::parse(&id.to_string())?, id);
//! # Ok(())
//! # }
//! ```

pub mod binding;
pub mod errors;
pub mod ids;
pub mod result;
pub mod validation;

pub use binding::{BindingState, HybridConnectionBinding, DEFAULT_SERVICE_BUS_SUFFIX};
pub use errors::{ArmError, HybridConnError};
pub use ids::{HybridConnectionId, RelayId, ResourceId};
pub use result::Result;
