//! Hybrid connection binding model
//!
//! [`HybridConnectionBinding`] is the declared configuration of the resource.
//! [`BindingState`] is what a Read observed remotely, including the derived
//! namespace and relay names and, when the credential lookup succeeded, the
//! send key value.

use crate::config::SecretString;
use crate::domain::errors::HybridConnError;
use crate::domain::ids::{HybridConnectionId, RelayId};
use crate::domain::validation;
use crate::domain::Result;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Default DNS suffix of Service Bus namespaces
pub const DEFAULT_SERVICE_BUS_SUFFIX: &str = ".servicebus.windows.net";

/// Declared hybrid connection between an App Service site and a relay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridConnectionBinding {
    /// Name of the App Service site (immutable after creation)
    pub app_service_name: String,

    /// Resource group of the site (immutable after creation)
    pub resource_group_name: String,

    /// Relay hybrid connection reference (immutable after creation)
    pub relay_id: String,

    /// Endpoint hostname reached through the relay
    pub hostname: String,

    /// Endpoint port, 0 to 65535
    ///
    /// Kept as a wide integer so that out-of-range values reach validation.
    pub port: i64,

    /// Service Bus namespace name
    pub service_bus_namespace: String,

    /// Service Bus DNS suffix
    #[serde(default = "default_service_bus_suffix")]
    pub service_bus_suffix: String,

    /// Name of the send key
    pub send_key_name: String,

    /// Value of the send key, never returned by the primary read
    pub send_key_value: SecretString,
}

impl HybridConnectionBinding {
    /// Validates every declared field
    ///
    /// All failures are collected into a single [`HybridConnError::Validation`].
    pub fn validate(&self) -> Result<()> {
        let checks = [
            validation::app_service_name("app_service_name", &self.app_service_name),
            validation::resource_group_name("resource_group_name", &self.resource_group_name),
            RelayId::parse(&self.relay_id)
                .map(|_| ())
                .map_err(|e| format!("\"relay_id\": {e}")),
            validation::no_empty_strings("hostname", &self.hostname),
            validation::port_number_or_zero("port", self.port),
            validation::service_bus_namespace("service_bus_namespace", &self.service_bus_namespace),
            validation::no_empty_strings("service_bus_suffix", &self.service_bus_suffix),
            validation::no_empty_strings("send_key_name", &self.send_key_name),
            validation::no_empty_strings(
                "send_key_value",
                self.send_key_value.expose_secret().as_ref(),
            ),
        ];

        let errors: Vec<String> = checks.into_iter().filter_map(|c| c.err()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(HybridConnError::Validation(errors.join("; ")))
        }
    }

    /// Resolves the relay reference into its namespace and relay name
    ///
    /// # Errors
    ///
    /// Returns [`HybridConnError::InvalidReference`] if `relay_id` does not parse.
    pub fn relay(&self) -> Result<RelayId> {
        RelayId::parse(&self.relay_id).map_err(|reason| HybridConnError::InvalidReference {
            relay_id: self.relay_id.clone(),
            reason,
        })
    }

    /// Port as sent on the wire
    pub fn wire_port(&self) -> Result<i32> {
        i32::try_from(self.port)
            .map_err(|_| HybridConnError::Validation(format!("\"port\" out of range: {}", self.port)))
    }

    /// Builds the identifier this binding will have once created
    pub fn target_id(&self, subscription_id: &str) -> Result<HybridConnectionId> {
        let relay = self.relay()?;
        Ok(HybridConnectionId::new(
            subscription_id,
            &self.resource_group_name,
            &self.app_service_name,
            relay.namespace_name,
            relay.name,
        ))
    }
}

/// Observed state of a hybrid connection after a Read
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BindingState {
    pub app_service_name: String,
    pub resource_group_name: String,

    /// Derived from the identifier
    pub namespace_name: String,

    /// Derived from the identifier
    pub relay_name: String,

    #[serde(default)]
    pub relay_id: Option<String>,

    #[serde(default)]
    pub hostname: Option<String>,

    #[serde(default)]
    pub port: Option<i64>,

    #[serde(default)]
    pub service_bus_namespace: Option<String>,

    #[serde(default)]
    pub service_bus_suffix: Option<String>,

    #[serde(default)]
    pub send_key_name: Option<String>,

    /// Recovered through the Service Bus credential lookup, unset when it failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_key_value: Option<SecretString>,
}

impl BindingState {
    /// Returns the send key value if the credential lookup succeeded
    pub fn send_key_value(&self) -> Option<&str> {
        self.send_key_value
            .as_ref()
            .map(|secret| AsRef::<str>::as_ref(secret.expose_secret()))
    }
}

fn default_service_bus_suffix() -> String {
    DEFAULT_SERVICE_BUS_SUFFIX.to_string()
}
