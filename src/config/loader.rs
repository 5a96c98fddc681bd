//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AuthType, DeletePolicy, HybridConnConfig};
use crate::config::secret_string;
use crate::domain::errors::HybridConnError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`HybridConnConfig`]
/// 4. Applies environment variable overrides (`HYBRIDCONN_*` prefix)
/// 5. Validates the configuration sections
///
/// The declared `[resource]` is not validated here; lifecycle operations
/// validate it before any remote call.
///
/// # Errors
///
/// Returns [`HybridConnError::Configuration`] if the file cannot be read or
/// parsed, a referenced variable is unset, or a section is invalid.
///
/// # Examples
///
/// ```no_run
/// use hybridconn::config::loader::load_config;
///
/// let config = load_config("hybridconn.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HybridConnConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HybridConnError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HybridConnError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_str(&contents)
}

/// Loads configuration from TOML text
pub fn load_config_str(contents: &str) -> Result<HybridConnConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: HybridConnConfig = toml::from_str(&contents)
        .map_err(|e| HybridConnError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        HybridConnError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| HybridConnError::Configuration(e.to_string()))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HybridConnError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the `HYBRIDCONN_*` prefix
///
/// Variables follow the pattern `HYBRIDCONN_<SECTION>_<KEY>`, for example
/// `HYBRIDCONN_AZURE_SUBSCRIPTION_ID` or `HYBRIDCONN_RESOURCE_SEND_KEY_VALUE`.
fn apply_env_overrides(config: &mut HybridConnConfig) -> Result<()> {
    if let Ok(val) = std::env::var("HYBRIDCONN_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Azure overrides
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_SUBSCRIPTION_ID") {
        config.azure.subscription_id = val;
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_AUTH_TYPE") {
        config.azure.auth_type = match val.as_str() {
            "client_secret" => AuthType::ClientSecret,
            "access_token" => AuthType::AccessToken,
            other => {
                return Err(HybridConnError::Configuration(format!(
                    "Invalid HYBRIDCONN_AZURE_AUTH_TYPE '{other}'. Must be one of: client_secret, access_token"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_TENANT_ID") {
        config.azure.tenant_id = Some(val);
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_CLIENT_ID") {
        config.azure.client_id = Some(val);
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_CLIENT_SECRET") {
        config.azure.client_secret = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_ACCESS_TOKEN") {
        config.azure.access_token = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_AZURE_RESOURCE_MANAGER_ENDPOINT") {
        config.azure.resource_manager_endpoint = val;
    }

    // Feature overrides
    if let Ok(val) = std::env::var("HYBRIDCONN_FEATURES_IMPORT_EXISTING_CHECK") {
        config.features.import_existing_check = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_FEATURES_DELETE_POLICY") {
        config.features.delete_policy = match val.as_str() {
            "legacy" => DeletePolicy::Legacy,
            "idempotent" => DeletePolicy::Idempotent,
            other => {
                return Err(HybridConnError::Configuration(format!(
                    "Invalid HYBRIDCONN_FEATURES_DELETE_POLICY '{other}'. Must be one of: legacy, idempotent"
                )))
            }
        };
    }

    // Timeout overrides
    if let Ok(val) = std::env::var("HYBRIDCONN_TIMEOUTS_CREATE_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.timeouts.create_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_TIMEOUTS_READ_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.timeouts.read_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_TIMEOUTS_UPDATE_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.timeouts.update_seconds = seconds;
        }
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_TIMEOUTS_DELETE_SECONDS") {
        if let Ok(seconds) = val.parse() {
            config.timeouts.delete_seconds = seconds;
        }
    }

    if let Ok(val) = std::env::var("HYBRIDCONN_STATE_PATH") {
        config.state.path = val;
    }

    // Resource overrides
    if let Ok(val) = std::env::var("HYBRIDCONN_RESOURCE_SEND_KEY_VALUE") {
        config.resource.send_key_value = secret_string(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HYBRIDCONN_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("HYBRIDCONN_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}
