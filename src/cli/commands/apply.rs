//! Apply command implementation
//!
//! Plans the change for the declared hybrid connection, then creates,
//! updates or replaces it and records the resulting state.

use super::{build_resource, print_send_key_warning, print_state, report_failure};
use crate::config::load_config;
use crate::core::{Plan, ResourceState, StateStore};
use clap::Args;
use tokio::sync::watch;

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Show the plan without calling Azure
    #[arg(long)]
    pub dry_run: bool,
}

impl ApplyArgs {
    /// Execute the apply command
    pub async fn execute(
        &self,
        config_path: &str,
        stop_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, dry_run = self.dry_run, "Starting apply command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(report_failure("Loading configuration", &e)),
        };

        if let Err(e) = config.resource.validate() {
            return Ok(report_failure("Resource validation", &e));
        }

        let store = StateStore::new(&config.state.path);
        let previous = match store.load() {
            Ok(p) => p,
            Err(e) => return Ok(report_failure("Loading state", &e)),
        };

        let plan = Plan::for_binding(previous.as_ref(), &config.resource);
        tracing::info!(plan = %plan, "Planned change");
        println!("📋 Plan: {plan}");

        if self.dry_run {
            println!("   Dry run, no changes made");
            return Ok(0);
        }

        let resource = match build_resource(&config, stop_signal) {
            Ok(r) => r,
            Err(e) => return Ok(report_failure("Connecting to Azure", &e)),
        };

        let existing_id = match &plan {
            Plan::Create => None,
            Plan::Update { id } => Some(id.as_str()),
            Plan::Replace { id, reasons } => {
                tracing::info!(id = %id, reasons = ?reasons, "Replacing App Service Hybrid Connection");
                println!("🗑️  Deleting {id}");
                if let Err(e) = resource.delete(id).await {
                    return Ok(report_failure("Delete before replace", &e));
                }
                if let Err(e) = store.clear() {
                    return Ok(report_failure("Clearing state", &e));
                }
                None
            }
        };

        println!("🚀 Applying App Service Hybrid Connection...");
        let data = match resource.create_or_update(&config.resource, existing_id).await {
            Ok(d) => d,
            Err(e) => {
                if let Some(id) = e.stored_id() {
                    tracing::warn!(id = %id, "Recording stored App Service Hybrid Connection despite failed read");
                    if let Err(save_err) = store.save(&ResourceState::declared(id, &config.resource)) {
                        report_failure("Saving state", &save_err);
                    }
                }
                return Ok(report_failure("Apply", &e));
            }
        };

        // The value just sent is the best knowledge when the lookup failed.
        let mut state = ResourceState::from_read(&data, None);
        if state.attributes.send_key_value.is_none() {
            state.attributes.send_key_value = Some(config.resource.send_key_value.clone());
        }

        if let Err(e) = store.save(&state) {
            return Ok(report_failure("Saving state", &e));
        }

        println!("✅ Apply complete");
        print_send_key_warning(&data.send_key);
        print_state(&state);
        Ok(0)
    }
}
