//! Destroy command implementation

use super::{build_resource, report_failure};
use crate::config::load_config;
use crate::core::StateStore;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the destroy command
#[derive(Args, Debug)]
pub struct DestroyArgs {}

impl DestroyArgs {
    /// Execute the destroy command
    pub async fn execute(
        &self,
        config_path: &str,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting destroy command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Loading configuration", &e)),
        };

        let store = StateStore::new(&config.state.path);
        let state = match store.load() {
            Ok(Some(s)) => s,
            Ok(None) => {
                println!("ℹ️  Nothing to destroy, no hybrid connection recorded");
                return Ok(0);
            }
            Err(e) => return Ok(report_failure("Loading state", &e)),
        };

        let resource = match build_resource(&config, stop_signal) {
            Ok(r) => r,
            Err(e) => return Ok(report_failure("Connecting to Azure", &e)),
        };

        println!("🗑️  Deleting {}", state.id);
        if let Err(e) = resource.delete(&state.id).await {
            return Ok(report_failure("Destroy", &e));
        }

        if let Err(e) = store.clear() {
            return Ok(report_failure("Clearing state", &e));
        }

        println!("✅ App Service Hybrid Connection destroyed");
        Ok(0)
    }
}
