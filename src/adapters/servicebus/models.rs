//! Service Bus API models

use crate::config::SecretString;
use secrecy::ExposeSecret;
use serde::Deserialize;

/// Keys of a namespace authorization rule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeys {
    #[serde(default)]
    pub primary_connection_string: Option<SecretString>,

    #[serde(default)]
    pub secondary_connection_string: Option<SecretString>,

    #[serde(default)]
    pub primary_key: Option<SecretString>,

    #[serde(default)]
    pub secondary_key: Option<SecretString>,

    #[serde(default)]
    pub key_name: Option<String>,
}

impl AccessKeys {
    /// Primary key, ignoring an empty value
    pub fn primary_key(&self) -> Option<&SecretString> {
        self.primary_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
    }
}
