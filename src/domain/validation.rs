//! Field validators for the declared hybrid connection
//!
//! Each validator takes the field name and value and returns a message
//! naming the field on failure. They run before any remote call.

use regex::Regex;
use std::sync::OnceLock;

fn app_service_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-zA-Z-]{1,60}$").expect("valid regex"))
}

fn resource_group_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-\w\._\(\)]+$").expect("valid regex"))
}

fn service_bus_namespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z][-a-zA-Z0-9]{0,100}[a-zA-Z0-9]$").expect("valid regex")
    })
}

/// App Service names: alphanumerics and dashes, 1 to 60 characters
pub fn app_service_name(key: &str, value: &str) -> Result<(), String> {
    if !app_service_name_pattern().is_match(value) {
        return Err(format!(
            "{key:?} may only contain alphanumeric characters and dashes and up to 60 characters in length"
        ));
    }
    Ok(())
}

/// Resource group names as accepted by Azure Resource Manager
pub fn resource_group_name(key: &str, value: &str) -> Result<(), String> {
    if value.chars().count() > 90 {
        return Err(format!("{key:?} may not exceed 90 characters in length"));
    }

    if value.ends_with('.') {
        return Err(format!("{key:?} may not end with a period"));
    }

    if !resource_group_name_pattern().is_match(value) {
        return Err(format!(
            "{key:?} may only contain alphanumeric characters, dash, underscores, parentheses and periods"
        ));
    }
    Ok(())
}

/// Service Bus namespace names
pub fn service_bus_namespace(key: &str, value: &str) -> Result<(), String> {
    if !service_bus_namespace_pattern().is_match(value) {
        return Err(format!(
            "{key:?}: The namespace can contain only letters, numbers, and hyphens. \
             The namespace must start with a letter, and it must end with a letter or number."
        ));
    }
    Ok(())
}

/// TCP port, where 0 is allowed
pub fn port_number_or_zero(key: &str, value: i64) -> Result<(), String> {
    if !(0..=65535).contains(&value) {
        return Err(format!(
            "{key:?} must be a valid port number between 0 and 65535, got {value}"
        ));
    }
    Ok(())
}

/// Strings that are neither empty nor only whitespace
pub fn no_empty_strings(key: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{key:?} must not be empty"));
    }
    Ok(())
}
