//! Refresh command implementation

use super::{build_resource, print_send_key_warning, print_state, report_failure};
use crate::config::load_config;
use crate::core::{ResourceState, StateStore};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the refresh command
#[derive(Args, Debug)]
pub struct RefreshArgs {}

impl RefreshArgs {
    /// Execute the refresh command
    ///
    /// Reads the managed hybrid connection and records what was observed. A
    /// remote object that no longer exists clears the state.
    pub async fn execute(
        &self,
        config_path: &str,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting refresh command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Loading configuration", &e)),
        };

        let store = StateStore::new(&config.state.path);
        let previous = match store.load() {
            Ok(Some(p)) => p,
            Ok(None) => {
                println!("ℹ️  No hybrid connection recorded in {}", store.path().display());
                return Ok(0);
            }
            Err(e) => return Ok(report_failure("Loading state", &e)),
        };

        let resource = match build_resource(&config, stop_signal) {
            Ok(r) => r,
            Err(e) => return Ok(report_failure("Connecting to Azure", &e)),
        };

        match resource.read(&previous.id).await {
            Ok(Some(data)) => {
                let state = ResourceState::from_read(&data, Some(&previous));
                if let Err(e) = store.save(&state) {
                    return Ok(report_failure("Saving state", &e));
                }
                println!("✅ Refresh complete");
                print_send_key_warning(&data.send_key);
                print_state(&state);
                Ok(0)
            }
            Ok(None) => {
                if let Err(e) = store.clear() {
                    return Ok(report_failure("Clearing state", &e));
                }
                println!("⚠️  {} was deleted outside hybridconn, state cleared", previous.id);
                Ok(0)
            }
            Err(e) => Ok(report_failure("Refresh", &e)),
        }
    }
}
