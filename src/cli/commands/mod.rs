//! CLI command implementations
//!
//! Commands print a human readable report and return the process exit code:
//! 0 success, 2 configuration or validation error, 4 connection or
//! authentication error, 5 any other failure.

pub mod apply;
pub mod destroy;
pub mod import;
pub mod init;
pub mod refresh;
pub mod validate;

use crate::adapters::create_clients;
use crate::config::HybridConnConfig;
use crate::core::{HybridConnectionResource, ResourceState, SendKeyLookup, StopSignal};
use crate::domain::{HybridConnError, Result};
use tokio::sync::watch;

/// Exit code reported for an error
pub fn exit_code(err: &HybridConnError) -> i32 {
    if err.is_configuration() {
        2
    } else if err.is_connection() {
        4
    } else {
        5
    }
}

/// Prints and logs a failed step, returning its exit code
pub(crate) fn report_failure(step: &str, err: &HybridConnError) -> i32 {
    tracing::error!(error = %err, "{step} failed");
    println!("❌ {step} failed");
    println!("   Error: {err}");
    exit_code(err)
}

/// Builds the resource with live Resource Manager clients
pub(crate) fn build_resource(
    config: &HybridConnConfig,
    stop: watch::Receiver<bool>,
) -> Result<HybridConnectionResource> {
    let clients = create_clients(&config.azure)?;
    Ok(HybridConnectionResource::from_config(config, clients)
        .with_stop_signal(StopSignal::new(stop)))
}

pub(crate) fn print_state(state: &ResourceState) {
    let attributes = &state.attributes;
    println!("  ID: {}", state.id);
    println!("  App Service: {}", attributes.app_service_name);
    println!("  Resource Group: {}", attributes.resource_group_name);
    println!("  Namespace: {}", attributes.namespace_name);
    println!("  Relay: {}", attributes.relay_name);
    if let Some(hostname) = &attributes.hostname {
        println!("  Hostname: {hostname}");
    }
    if let Some(port) = attributes.port {
        println!("  Port: {port}");
    }
    if let Some(send_key_name) = &attributes.send_key_name {
        println!("  Send Key Name: {send_key_name}");
    }
    println!(
        "  Send Key Value: {}",
        if attributes.send_key_value.is_some() {
            "(recorded)"
        } else {
            "(unknown)"
        }
    );
    println!("  Refreshed At: {}", state.refreshed_at.to_rfc3339());
}

pub(crate) fn print_send_key_warning(send_key: &SendKeyLookup) {
    if let SendKeyLookup::Unavailable { reason } = send_key {
        println!("⚠️  Send key value could not be recovered: {reason}");
    }
}
