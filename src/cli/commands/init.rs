//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "hybridconn.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing hybridconn configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, Self::sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your subscription and resource", self.output);
                println!("  2. Create a .env file with your credentials:");
                println!("     - HYBRIDCONN_AZURE_CLIENT_SECRET");
                println!("     - HYBRIDCONN_SEND_KEY_VALUE");
                println!("  3. Validate configuration: hybridconn validate-config");
                println!("  4. Preview the change: hybridconn apply --dry-run");
                println!("  5. Apply: hybridconn apply");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Sample configuration with every section
    pub fn sample_config() -> &'static str {
        r#"# hybridconn configuration
# Reconciles one App Service Hybrid Connection against Azure Resource Manager.

[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

[azure]
subscription_id = "00000000-0000-0000-0000-000000000000"

# client_secret | access_token
auth_type = "client_secret"
tenant_id = "11111111-1111-1111-1111-111111111111"
client_id = "22222222-2222-2222-2222-222222222222"
client_secret = "${HYBRIDCONN_AZURE_CLIENT_SECRET}"

resource_manager_endpoint = "https://management.azure.com"
request_timeout_seconds = 60

[features]
# Refuse to create over an existing hybrid connection that is not in the state
import_existing_check = true

# legacy: deleting a missing object is an error, other delete errors are ignored
# idempotent: deleting a missing object succeeds, other delete errors fail
delete_policy = "legacy"

[timeouts]
create_seconds = 1800
read_seconds = 300
update_seconds = 1800
delete_seconds = 1800

[state]
path = "hybridconn.state.json"

[resource]
app_service_name = "my-app"
resource_group_name = "my-rg"
relay_id = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/my-rg/providers/Microsoft.Relay/namespaces/my-relay-ns/hybridConnections/my-relay"
hostname = "backend.internal.example.com"
port = 443
service_bus_namespace = "my-relay-ns"
service_bus_suffix = ".servicebus.windows.net"
send_key_name = "RootManageSharedAccessKey"
send_key_value = "${HYBRIDCONN_SEND_KEY_VALUE}"

[logging]
local_enabled = false
local_path = "/var/log/hybridconn"
local_rotation = "daily"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HybridConnConfig;
    use tempfile::TempDir;

    #[test]
    fn test_sample_config_parses() {
        let config: HybridConnConfig = toml::from_str(InitArgs::sample_config()).unwrap();
        assert_eq!(config.state.path, "hybridconn.state.json");
        assert_eq!(config.resource.port, 443);
        assert!(config.resource.relay().is_ok());
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("hybridconn.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_writes_sample() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("hybridconn.toml");
        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[resource]"));
    }
}
