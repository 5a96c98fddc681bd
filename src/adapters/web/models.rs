//! App Service hybrid connection API models
//!
//! Wire shapes of the `Microsoft.Web` hybrid connection resource. These are
//! kept apart from the domain binding and converted explicitly in both
//! directions.

use crate::config::SecretString;
use crate::domain::{BindingState, HybridConnectionBinding, HybridConnectionId, Result};
use serde::{Deserialize, Serialize};

/// Hybrid connection resource envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridConnection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HybridConnectionProperties>,
}

/// Properties of a hybrid connection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridConnectionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_bus_namespace: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_name: Option<String>,

    /// Resource id of the relay hybrid connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_arm_uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_key_name: Option<String>,

    /// Only ever sent; reads return it empty or not at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_key_value: Option<SecretString>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_bus_suffix: Option<String>,
}

impl HybridConnection {
    /// Builds the upsert payload for a declared binding
    ///
    /// # Errors
    ///
    /// Returns an error if the relay reference does not parse or the port
    /// does not fit the wire type.
    pub fn from_binding(binding: &HybridConnectionBinding) -> Result<Self> {
        let relay = binding.relay()?;
        let port = binding.wire_port()?;

        Ok(Self {
            id: None,
            name: None,
            resource_type: None,
            kind: None,
            properties: Some(HybridConnectionProperties {
                service_bus_namespace: Some(binding.service_bus_namespace.clone()),
                relay_name: Some(relay.name),
                relay_arm_uri: Some(binding.relay_id.clone()),
                hostname: Some(binding.hostname.clone()),
                port: Some(port),
                send_key_name: Some(binding.send_key_name.clone()),
                send_key_value: Some(binding.send_key_value.clone()),
                service_bus_suffix: Some(binding.service_bus_suffix.clone()),
            }),
        })
    }

    /// Observed state of this resource
    ///
    /// Names come from the identifier; every other field comes from the
    /// properties when present. The send key value is never taken from here.
    pub fn to_state(&self, id: &HybridConnectionId) -> BindingState {
        let mut state = BindingState {
            app_service_name: id.site_name.clone(),
            resource_group_name: id.resource_group.clone(),
            namespace_name: id.namespace_name.clone(),
            relay_name: id.relay_name.clone(),
            ..Default::default()
        };

        if let Some(props) = &self.properties {
            state.relay_id = props.relay_arm_uri.clone();
            state.hostname = props.hostname.clone();
            state.port = props.port.map(i64::from);
            state.service_bus_namespace = props.service_bus_namespace.clone();
            state.service_bus_suffix = props.service_bus_suffix.clone();
            state.send_key_name = props.send_key_name.clone();
        }

        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use crate::domain::DEFAULT_SERVICE_BUS_SUFFIX;
    use secrecy::ExposeSecret;

    fn binding() -> HybridConnectionBinding {
        HybridConnectionBinding {
            app_service_name: "site1".to_string(),
            resource_group_name: "rg1".to_string(),
            relay_id: "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Relay/namespaces/ns1/hybridConnections/relay1".to_string(),
            hostname: "h.example.net".to_string(),
            port: 443,
            service_bus_namespace: "ns1".to_string(),
            service_bus_suffix: DEFAULT_SERVICE_BUS_SUFFIX.to_string(),
            send_key_name: "key1".to_string(),
            send_key_value: secret_string("secret".to_string()),
        }
    }

    #[test]
    fn test_payload_is_camel_case() {
        let payload = HybridConnection::from_binding(&binding()).unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        let props = &json["properties"];
        assert_eq!(props["serviceBusNamespace"], "ns1");
        assert_eq!(props["relayName"], "relay1");
        assert_eq!(props["hostname"], "h.example.net");
        assert_eq!(props["port"], 443);
        assert_eq!(props["sendKeyName"], "key1");
        assert_eq!(props["sendKeyValue"], "secret");
        assert_eq!(props["serviceBusSuffix"], DEFAULT_SERVICE_BUS_SUFFIX);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_to_state_takes_names_from_id() {
        let body = r#"{
            "id": "/subscriptions/0000/resourceGroups/rg1/providers/Microsoft.Web/sites/site1/hybridConnectionNamespaces/ns1/relays/relay1",
            "name": "relay1",
            "type": "Microsoft.Web/sites/hybridConnectionNamespaces/relays",
            "properties": {
                "serviceBusNamespace": "ns1",
                "relayName": "relay1",
                "hostname": "h.example.net",
                "port": 8080,
                "sendKeyName": "key1",
                "sendKeyValue": "",
                "serviceBusSuffix": ".servicebus.windows.net"
            }
        }"#;
        let resource: HybridConnection = serde_json::from_str(body).unwrap();
        let id = HybridConnectionId::new("0000", "rg1", "site1", "ns1", "relay1");
        let state = resource.to_state(&id);

        assert_eq!(state.app_service_name, "site1");
        assert_eq!(state.namespace_name, "ns1");
        assert_eq!(state.port, Some(8080));
        assert_eq!(state.send_key_name.as_deref(), Some("key1"));
        assert!(state.send_key_value.is_none());
        assert_eq!(
            resource
                .properties
                .as_ref()
                .and_then(|p| p.send_key_value.as_ref())
                .map(|s| s.expose_secret().is_empty()),
            Some(true)
        );
    }

    #[test]
    fn test_to_state_without_properties() {
        let resource = HybridConnection::default();
        let id = HybridConnectionId::new("0000", "rg1", "site1", "ns1", "relay1");
        let state = resource.to_state(&id);
        assert_eq!(state.relay_name, "relay1");
        assert!(state.hostname.is_none());
    }
}
