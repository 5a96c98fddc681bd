//! Persisted resource state
//!
//! The state file holds the durable identifier of the managed hybrid
//! connection together with the attributes observed by the last read. It is
//! replaced atomically: a temporary file in the same directory is written,
//! flushed and renamed over the previous state.

use crate::core::resource::{ResourceData, SendKeyLookup};
use crate::domain::{
    BindingState, HybridConnError, HybridConnectionBinding, HybridConnectionId, Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Current layout version of the state file
pub const STATE_VERSION: u32 = 1;

/// State of the managed hybrid connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceState {
    pub version: u32,

    /// Identifier returned by the create
    pub id: String,

    /// Attributes observed by the last read
    pub attributes: BindingState,

    pub refreshed_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, attributes: BindingState, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            version: STATE_VERSION,
            id: id.into(),
            attributes,
            refreshed_at,
        }
    }

    /// Builds the state of a stored object that could not be read back
    ///
    /// The attributes are the declared ones, so the next apply updates the
    /// object in place instead of creating it again.
    pub fn declared(id: &HybridConnectionId, binding: &HybridConnectionBinding) -> Self {
        let attributes = BindingState {
            app_service_name: id.site_name.clone(),
            resource_group_name: id.resource_group.clone(),
            namespace_name: id.namespace_name.clone(),
            relay_name: id.relay_name.clone(),
            relay_id: Some(binding.relay_id.clone()),
            hostname: Some(binding.hostname.clone()),
            port: Some(binding.port),
            service_bus_namespace: Some(binding.service_bus_namespace.clone()),
            service_bus_suffix: Some(binding.service_bus_suffix.clone()),
            send_key_name: Some(binding.send_key_name.clone()),
            send_key_value: Some(binding.send_key_value.clone()),
        };
        Self::new(id.to_string(), attributes, Utc::now())
    }

    /// Builds the state recorded after a successful read
    ///
    /// When the send key could not be recovered, the value from `previous`
    /// is kept as long as it describes the same object.
    pub fn from_read(data: &ResourceData, previous: Option<&ResourceState>) -> Self {
        let id = data.id.to_string();
        let mut attributes = data.state.clone();

        if let SendKeyLookup::Unavailable { .. } = data.send_key {
            if let Some(previous) = previous.filter(|p| p.id.eq_ignore_ascii_case(&id)) {
                if previous.attributes.send_key_value.is_some() {
                    tracing::debug!(id = %id, "Keeping previously recorded send key value");
                    attributes.send_key_value = previous.attributes.send_key_value.clone();
                }
            }
        }

        Self::new(id, attributes, Utc::now())
    }
}

/// JSON file holding the [`ResourceState`]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the state, `None` if no state has been written
    ///
    /// # Errors
    ///
    /// Returns [`HybridConnError::State`] if the file cannot be read or decoded.
    pub fn load(&self) -> Result<Option<ResourceState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HybridConnError::State(format!(
                    "Failed to read state file {}: {e}",
                    self.path.display()
                )))
            }
        };

        let state: ResourceState = serde_json::from_str(&content).map_err(|e| {
            HybridConnError::State(format!(
                "Failed to parse state file {}: {e}",
                self.path.display()
            ))
        })?;

        if state.version > STATE_VERSION {
            return Err(HybridConnError::State(format!(
                "State file {} has version {}, newer than supported version {STATE_VERSION}",
                self.path.display(),
                state.version
            )));
        }

        Ok(Some(state))
    }

    /// Replaces the persisted state
    pub fn save(&self, state: &ResourceState) -> Result<()> {
        let content = serde_json::to_string_pretty(state)?;
        let tmp_path = self.tmp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        {
            let mut file = fs::File::create(&tmp_path).map_err(|e| {
                HybridConnError::State(format!(
                    "Failed to create state file {}: {e}",
                    tmp_path.display()
                ))
            })?;
            restrict_permissions(&file)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| {
            HybridConnError::State(format!(
                "Failed to replace state file {}: {e}",
                self.path.display()
            ))
        })?;

        tracing::debug!(path = %self.path.display(), id = %state.id, "State saved");
        Ok(())
    }

    /// Removes the persisted state; a missing file is not an error
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "State cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(HybridConnError::State(format!(
                "Failed to remove state file {}: {e}",
                self.path.display()
            ))),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// The state may hold the send key value
#[cfg(unix)]
fn restrict_permissions(file: &fs::File) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_file: &fs::File) -> Result<()> {
    Ok(())
}
