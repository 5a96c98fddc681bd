//! Configuration schema types
//!
//! This module defines the structure of `hybridconn.toml`.

use crate::config::SecretString;
use crate::domain::HybridConnectionBinding;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main hybridconn configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HybridConnConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Azure Resource Manager connection and credentials
    pub azure: AzureConfig,

    /// Behaviour switches of the lifecycle operations
    #[serde(default)]
    pub features: FeaturesConfig,

    /// Per-operation deadlines
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Persisted state location
    #[serde(default)]
    pub state: StateConfig,

    /// The declared hybrid connection
    pub resource: HybridConnectionBinding,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HybridConnConfig {
    /// Validates the configuration sections
    ///
    /// The declared resource is validated separately by
    /// [`HybridConnectionBinding::validate`] so that its field errors surface
    /// as validation errors rather than configuration errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.azure.validate()?;
        self.timeouts.validate()?;
        self.state.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// How requests to Azure Resource Manager are authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Azure AD client credentials (service principal)
    #[default]
    ClientSecret,
    /// Pre-acquired bearer token
    AccessToken,
}

/// Azure Resource Manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    /// Subscription that owns the App Service site
    pub subscription_id: String,

    /// Authentication type
    #[serde(default)]
    pub auth_type: AuthType,

    /// Azure AD tenant ID
    #[serde(default)]
    pub tenant_id: Option<String>,

    /// Azure AD client ID (from App Registration)
    #[serde(default)]
    pub client_id: Option<String>,

    /// Azure AD client secret
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Bearer token used when `auth_type = "access_token"`
    #[serde(default)]
    pub access_token: Option<SecretString>,

    /// Resource Manager endpoint
    #[serde(default = "default_resource_manager_endpoint")]
    pub resource_manager_endpoint: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,

    /// API version of the Microsoft.Web provider
    #[serde(default = "default_web_api_version")]
    pub web_api_version: String,

    /// API version of the Microsoft.ServiceBus provider
    #[serde(default = "default_service_bus_api_version")]
    pub service_bus_api_version: String,
}

impl AzureConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.subscription_id.trim().is_empty() {
            return Err("azure.subscription_id cannot be empty".to_string());
        }

        if url::Url::parse(&self.resource_manager_endpoint).is_err() {
            return Err(format!(
                "azure.resource_manager_endpoint is not a valid URL: {}",
                self.resource_manager_endpoint
            ));
        }

        if !self.resource_manager_endpoint.starts_with("http://")
            && !self.resource_manager_endpoint.starts_with("https://")
        {
            return Err(
                "azure.resource_manager_endpoint must start with http:// or https://".to_string(),
            );
        }

        if self.request_timeout_seconds == 0 {
            return Err("azure.request_timeout_seconds must be > 0".to_string());
        }

        match self.auth_type {
            AuthType::ClientSecret => {
                if self.tenant_id.as_deref().map_or(true, str::is_empty) {
                    return Err(
                        "azure.tenant_id is required when auth_type is 'client_secret'".to_string()
                    );
                }
                if self.client_id.as_deref().map_or(true, str::is_empty) {
                    return Err(
                        "azure.client_id is required when auth_type is 'client_secret'".to_string()
                    );
                }
                if self
                    .client_secret
                    .as_ref()
                    .map_or(true, |s| s.expose_secret().is_empty())
                {
                    return Err(
                        "azure.client_secret is required when auth_type is 'client_secret'"
                            .to_string(),
                    );
                }
            }
            AuthType::AccessToken => {
                if self
                    .access_token
                    .as_ref()
                    .map_or(true, |s| s.expose_secret().is_empty())
                {
                    return Err(
                        "azure.access_token is required when auth_type is 'access_token'"
                            .to_string(),
                    );
                }
            }
        }

        Ok(())
    }
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            subscription_id: String::new(),
            auth_type: AuthType::default(),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            access_token: None,
            resource_manager_endpoint: default_resource_manager_endpoint(),
            request_timeout_seconds: default_request_timeout_seconds(),
            web_api_version: default_web_api_version(),
            service_bus_api_version: default_service_bus_api_version(),
        }
    }
}

/// Outcome handling of Delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeletePolicy {
    /// A clean not-found response is fatal, any other error is swallowed
    #[default]
    Legacy,
    /// Not-found is success, any other error is fatal
    Idempotent,
}

/// Feature switches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Refuse to create over an existing, unmanaged remote object
    #[serde(default = "default_true")]
    pub import_existing_check: bool,

    /// Delete outcome handling
    #[serde(default)]
    pub delete_policy: DeletePolicy,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            import_existing_check: true,
            delete_policy: DeletePolicy::default(),
        }
    }
}

/// Longest accepted per-operation deadline
pub const MAX_TIMEOUT_SECONDS: u64 = 24 * 60 * 60;

/// Per-operation deadlines in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_create_seconds")]
    pub create_seconds: u64,

    #[serde(default = "default_read_seconds")]
    pub read_seconds: u64,

    #[serde(default = "default_update_seconds")]
    pub update_seconds: u64,

    #[serde(default = "default_delete_seconds")]
    pub delete_seconds: u64,
}

impl TimeoutsConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("create_seconds", self.create_seconds),
            ("read_seconds", self.read_seconds),
            ("update_seconds", self.update_seconds),
            ("delete_seconds", self.delete_seconds),
        ] {
            if value == 0 {
                return Err(format!("timeouts.{name} must be > 0"));
            }
            if value > MAX_TIMEOUT_SECONDS {
                return Err(format!(
                    "timeouts.{name} must be at most {MAX_TIMEOUT_SECONDS} (24 hours), got {value}"
                ));
            }
        }
        Ok(())
    }

    pub fn create(&self) -> Duration {
        Duration::from_secs(self.create_seconds)
    }

    pub fn read(&self) -> Duration {
        Duration::from_secs(self.read_seconds)
    }

    pub fn update(&self) -> Duration {
        Duration::from_secs(self.update_seconds)
    }

    pub fn delete(&self) -> Duration {
        Duration::from_secs(self.delete_seconds)
    }
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            create_seconds: default_create_seconds(),
            read_seconds: default_read_seconds(),
            update_seconds: default_update_seconds(),
            delete_seconds: default_delete_seconds(),
        }
    }
}

/// Persisted state configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Path of the JSON state file
    #[serde(default = "default_state_path")]
    pub path: String,
}

impl StateConfig {
    fn validate(&self) -> Result<(), String> {
        if self.path.trim().is_empty() {
            return Err("state.path cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            path: default_state_path(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log file directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily or hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_resource_manager_endpoint() -> String {
    "https://management.azure.com".to_string()
}

fn default_request_timeout_seconds() -> u64 {
    60
}

fn default_web_api_version() -> String {
    "2018-02-01".to_string()
}

fn default_service_bus_api_version() -> String {
    "2017-04-01".to_string()
}

fn default_create_seconds() -> u64 {
    30 * 60
}

fn default_read_seconds() -> u64 {
    5 * 60
}

fn default_update_seconds() -> u64 {
    30 * 60
}

fn default_delete_seconds() -> u64 {
    30 * 60
}

fn default_state_path() -> String {
    "hybridconn.state.json".to_string()
}

fn default_local_path() -> String {
    "/var/log/hybridconn".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
