//! Service Bus (`Microsoft.ServiceBus`) namespace authorization rule adapter
//!
//! Only the `listKeys` action is used: it recovers the send key value that
//! the hybrid connection read never returns.

pub mod client;
pub mod models;
pub mod traits;

pub use client::ServiceBusNamespacesClient;
pub use models::AccessKeys;
pub use traits::NamespaceKeysClient;
