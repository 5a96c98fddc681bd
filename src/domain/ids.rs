//! Azure resource identifiers
//!
//! Identifiers are handled as an explicit parse/format pair. [`ResourceId`]
//! understands the generic `/subscriptions/{id}/resourceGroups/{name}/providers/...`
//! layout; [`HybridConnectionId`] and [`RelayId`] pop the segments they need
//! from it and reject anything left over.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Generic Azure Resource Manager identifier
///
/// # Examples
///
/// ```
/// use hybridconn::domain::ids::ResourceId;
///
/// let id = ResourceId::parse(
///     "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Web/sites/site1",
/// ).unwrap();
/// assert_eq!(id.resource_group, "rg1");
/// assert_eq!(id.provider.as_deref(), Some("Microsoft.Web"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    /// Subscription ID
    pub subscription_id: String,

    /// Resource group name (empty for subscription-level resources)
    pub resource_group: String,

    /// Resource provider namespace, e.g. `Microsoft.Web`
    pub provider: Option<String>,

    /// Remaining key/value segments after the provider, keyed in lowercase
    pub path: BTreeMap<String, String>,
}

impl ResourceId {
    /// Parses an identifier into its key/value segments
    ///
    /// # Errors
    ///
    /// Returns an error if the path has an odd number of segments, contains
    /// an empty key or value, or has no subscription.
    pub fn parse(input: &str) -> Result<Self, String> {
        let trimmed = input.trim_matches('/');
        if trimmed.is_empty() {
            return Err(format!("Cannot parse Azure ID: {input:?} is empty"));
        }

        let components: Vec<&str> = trimmed.split('/').collect();
        if components.len() % 2 != 0 {
            return Err(format!(
                "The number of path segments is not divisible by 2 in {input:?}"
            ));
        }

        let mut segments = BTreeMap::new();
        for pair in components.chunks(2) {
            let (key, value) = (pair[0], pair[1]);
            if key.is_empty() || value.is_empty() {
                return Err(format!(
                    "Key/Value cannot be empty strings. Key: '{key}', Value: '{value}'"
                ));
            }
            segments.insert(key.to_ascii_lowercase(), value.to_string());
        }

        let subscription_id = segments
            .remove("subscriptions")
            .ok_or_else(|| format!("No subscription ID found in: {input:?}"))?;

        let resource_group = segments.remove("resourcegroups").unwrap_or_default();

        let provider = segments.remove("providers");

        Ok(Self {
            subscription_id,
            resource_group,
            provider,
            path: segments,
        })
    }

    /// Removes and returns the value of a path segment, matching the key without regard to case
    pub fn pop_segment(&mut self, key: &str) -> Result<String, String> {
        match self.path.remove(&key.to_ascii_lowercase()) {
            Some(value) => Ok(value),
            None => Err(format!("ID was missing the `{key}` element")),
        }
    }

    /// Ensures every path segment has been consumed
    pub fn validate_no_extra_segments(&self, input: &str) -> Result<(), String> {
        if self.path.is_empty() {
            return Ok(());
        }

        let extra: Vec<&str> = self.path.keys().map(String::as_str).collect();
        Err(format!(
            "ID contained more segments than required: {input:?}, unexpected: {}",
            extra.join(", ")
        ))
    }
}

/// Identifier of an App Service Hybrid Connection
///
/// This is the durable handle persisted after a successful create:
/// `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Web/sites/{site}/hybridConnectionNamespaces/{ns}/relays/{relay}`
///
/// # Examples
///
/// ```
/// use hybridconn::domain::ids::HybridConnectionId;
///
/// let id = HybridConnectionId::new("0000", "rg1", "site1", "ns1", "relay1");
/// let parsed = HybridConnectionId::parse(&id.to_string()).unwrap();
/// assert_eq!(parsed, id);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HybridConnectionId {
    pub subscription_id: String,
    pub resource_group: String,
    pub site_name: String,
    pub namespace_name: String,
    pub relay_name: String,
}

impl HybridConnectionId {
    /// Creates a new identifier from its segments
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        site_name: impl Into<String>,
        namespace_name: impl Into<String>,
        relay_name: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            site_name: site_name.into(),
            namespace_name: namespace_name.into(),
            relay_name: relay_name.into(),
        }
    }

    /// Parses a persisted identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the identifier is not a generic Azure ID, lacks a
    /// resource group, or does not contain exactly the `sites`,
    /// `hybridConnectionNamespaces` and `relays` segments.
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut id = ResourceId::parse(input)?;
        if id.resource_group.is_empty() {
            return Err(format!("ID was missing the `resourceGroups` element: {input:?}"));
        }

        let site_name = id.pop_segment("sites")?;
        let namespace_name = id.pop_segment("hybridConnectionNamespaces")?;
        let relay_name = id.pop_segment("relays")?;
        id.validate_no_extra_segments(input)?;

        Ok(Self {
            subscription_id: id.subscription_id,
            resource_group: id.resource_group,
            site_name,
            namespace_name,
            relay_name,
        })
    }
}

impl fmt::Display for HybridConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Web/sites/{}/hybridConnectionNamespaces/{}/relays/{}",
            self.subscription_id,
            self.resource_group,
            self.site_name,
            self.namespace_name,
            self.relay_name
        )
    }
}

impl FromStr for HybridConnectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Identifier of an Azure Relay hybrid connection (the relay reference)
///
/// Format: `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.Relay/namespaces/{ns}/hybridConnections/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelayId {
    pub subscription_id: String,
    pub resource_group: String,
    pub namespace_name: String,
    pub name: String,
}

impl RelayId {
    /// Parses a relay reference
    ///
    /// # Errors
    ///
    /// Returns an error unless the reference resolves to exactly a namespace
    /// and hybrid connection name.
    pub fn parse(input: &str) -> Result<Self, String> {
        let mut id = ResourceId::parse(input)?;
        if id.resource_group.is_empty() {
            return Err(format!("ID was missing the `resourceGroups` element: {input:?}"));
        }

        let name = id.pop_segment("hybridConnections")?;
        let namespace_name = id.pop_segment("namespaces")?;
        id.validate_no_extra_segments(input)?;

        Ok(Self {
            subscription_id: id.subscription_id,
            resource_group: id.resource_group,
            namespace_name,
            name,
        })
    }
}

impl fmt::Display for RelayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Relay/namespaces/{}/hybridConnections/{}",
            self.subscription_id, self.resource_group, self.namespace_name, self.name
        )
    }
}

impl FromStr for RelayId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
