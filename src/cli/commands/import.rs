//! Import command implementation

use super::{build_resource, print_send_key_warning, print_state, report_failure};
use crate::config::load_config;
use crate::core::{ResourceState, StateStore};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Resource ID of the existing hybrid connection
    #[arg(long)]
    pub id: String,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(
        &self,
        config_path: &str,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, id = %self.id, "Starting import command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Loading configuration", &e)),
        };

        let store = StateStore::new(&config.state.path);
        match store.load() {
            Ok(Some(existing)) => {
                println!("❌ State already manages {}", existing.id);
                println!("   Run destroy or remove {} first", store.path().display());
                return Ok(2);
            }
            Ok(None) => {}
            Err(e) => return Ok(report_failure("Loading state", &e)),
        }

        let resource = match build_resource(&config, stop_signal) {
            Ok(r) => r,
            Err(e) => return Ok(report_failure("Connecting to Azure", &e)),
        };

        let data = match resource.import(&self.id).await {
            Ok(d) => d,
            Err(e) => return Ok(report_failure("Import", &e)),
        };

        let state = ResourceState::from_read(&data, None);
        if let Err(e) = store.save(&state) {
            return Ok(report_failure("Saving state", &e));
        }

        println!("✅ Import complete");
        print_send_key_warning(&data.send_key);
        print_state(&state);
        Ok(0)
    }
}
