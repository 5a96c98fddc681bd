//! App Service (`Microsoft.Web`) hybrid connection adapter

pub mod client;
pub mod models;
pub mod traits;

pub use client::WebAppsClient;
pub use models::{HybridConnection, HybridConnectionProperties};
pub use traits::HybridConnectionsClient;
