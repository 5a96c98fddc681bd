//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating the
//! configuration file and the declared hybrid connection.

use super::report_failure;
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration file loaded successfully");
                c
            }
            Err(e) => return Ok(report_failure("Loading configuration", &e)),
        };

        let relay = match config
            .resource
            .relay()
            .and_then(|relay| config.resource.validate().map(|_| relay))
        {
            Ok(relay) => relay,
            Err(e) => return Ok(report_failure("Resource validation", &e)),
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Subscription: {}", config.azure.subscription_id);
        println!("  Resource Manager: {}", config.azure.resource_manager_endpoint);
        println!("  Import Check: {}", config.features.import_existing_check);
        println!("  Delete Policy: {:?}", config.features.delete_policy);
        println!("  State File: {}", config.state.path);
        println!("  App Service: {}", config.resource.app_service_name);
        println!("  Resource Group: {}", config.resource.resource_group_name);
        println!("  Relay Namespace: {}", relay.namespace_name);
        println!("  Relay: {}", relay.name);
        println!(
            "  Endpoint: {}:{}",
            config.resource.hostname, config.resource.port
        );
        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }
}
