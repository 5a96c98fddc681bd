//! In-memory implementations of the remote client traits
//!
//! The fakes behave like the Resource Manager APIs for one subscription:
//! missing objects are `ArmError::NotFound`, upserts return the stored
//! object with its id, and reads never return the send key value.

#![allow(dead_code)]

use async_trait::async_trait;
use hybridconn::adapters::arm::ArmResult;
use hybridconn::adapters::servicebus::{AccessKeys, NamespaceKeysClient};
use hybridconn::adapters::web::{HybridConnection, HybridConnectionsClient};
use hybridconn::adapters::ClientHandles;
use hybridconn::config::{secret_string, FeaturesConfig, TimeoutsConfig};
use hybridconn::core::HybridConnectionResource;
use hybridconn::domain::{
    ArmError, HybridConnectionBinding, HybridConnectionId, DEFAULT_SERVICE_BUS_SUFFIX,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";
pub const RELAY_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Relay/namespaces/ns1/hybridConnections/relay1";
pub const HYBRID_CONNECTION_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Web/sites/site1/hybridConnectionNamespaces/ns1/relays/relay1";
pub const PRIMARY_KEY: &str = "primary-key-for-key1";

type Key = (String, String, String, String);

fn key(resource_group: &str, site: &str, namespace: &str, relay: &str) -> Key {
    (
        resource_group.to_lowercase(),
        site.to_lowercase(),
        namespace.to_lowercase(),
        relay.to_lowercase(),
    )
}

/// Fake `Microsoft.Web` hybrid connection API
#[derive(Default)]
pub struct FakeWeb {
    objects: Mutex<HashMap<Key, HybridConnection>>,
    get_error: Mutex<Option<ArmError>>,
    get_after_put_error: Mutex<Option<ArmError>>,
    put_error: Mutex<Option<ArmError>>,
    delete_error: Mutex<Option<ArmError>>,
    omit_id: Mutex<bool>,
    last_put: Mutex<Option<HybridConnection>>,
    pub gets: AtomicUsize,
    pub puts: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl FakeWeb {
    pub fn fail_gets(&self, err: ArmError) {
        *self.get_error.lock().unwrap() = Some(err);
    }

    /// Fails gets only once an object has been stored
    pub fn fail_gets_after_put(&self, err: ArmError) {
        *self.get_after_put_error.lock().unwrap() = Some(err);
    }

    pub fn clear_failures(&self) {
        *self.get_error.lock().unwrap() = None;
        *self.get_after_put_error.lock().unwrap() = None;
        *self.put_error.lock().unwrap() = None;
        *self.delete_error.lock().unwrap() = None;
    }

    pub fn fail_puts(&self, err: ArmError) {
        *self.put_error.lock().unwrap() = Some(err);
    }

    pub fn fail_deletes(&self, err: ArmError) {
        *self.delete_error.lock().unwrap() = Some(err);
    }

    pub fn omit_id_on_put(&self) {
        *self.omit_id.lock().unwrap() = true;
    }

    /// Places an object that is not recorded in any state
    pub fn insert_unmanaged(&self, resource_group: &str, site: &str, namespace: &str, relay: &str) {
        let id = HybridConnectionId::new(SUBSCRIPTION_ID, resource_group, site, namespace, relay);
        let object = HybridConnection {
            id: Some(id.to_string()),
            name: Some(relay.to_string()),
            ..Default::default()
        };
        self.objects
            .lock()
            .unwrap()
            .insert(key(resource_group, site, namespace, relay), object);
    }

    /// Removes an object behind the back of the lifecycle operations
    pub fn remove_all(&self) {
        self.objects.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn last_put(&self) -> Option<HybridConnection> {
        self.last_put.lock().unwrap().clone()
    }

    pub fn remote_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
            + self.puts.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HybridConnectionsClient for FakeWeb {
    async fn get_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<HybridConnection> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.get_error.lock().unwrap().clone() {
            return Err(err);
        }
        if self.puts.load(Ordering::SeqCst) > 0 {
            if let Some(err) = self.get_after_put_error.lock().unwrap().clone() {
                return Err(err);
            }
        }
        self.objects
            .lock()
            .unwrap()
            .get(&key(resource_group, site_name, namespace_name, relay_name))
            .cloned()
            .ok_or_else(|| ArmError::NotFound("ResourceNotFound".to_string()))
    }

    async fn create_or_update_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
        envelope: &HybridConnection,
    ) -> ArmResult<HybridConnection> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        *self.last_put.lock().unwrap() = Some(envelope.clone());
        if let Some(err) = self.put_error.lock().unwrap().clone() {
            return Err(err);
        }

        let id = HybridConnectionId::new(
            SUBSCRIPTION_ID,
            resource_group,
            site_name,
            namespace_name,
            relay_name,
        );
        let mut stored = envelope.clone();
        stored.id = Some(id.to_string());
        stored.name = Some(relay_name.to_string());
        stored.resource_type =
            Some("Microsoft.Web/sites/hybridConnectionNamespaces/relays".to_string());
        if let Some(props) = stored.properties.as_mut() {
            props.send_key_value = Some(secret_string(String::new()));
        }

        self.objects.lock().unwrap().insert(
            key(resource_group, site_name, namespace_name, relay_name),
            stored.clone(),
        );

        if *self.omit_id.lock().unwrap() {
            stored.id = None;
        }
        Ok(stored)
    }

    async fn delete_hybrid_connection(
        &self,
        resource_group: &str,
        site_name: &str,
        namespace_name: &str,
        relay_name: &str,
    ) -> ArmResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.delete_error.lock().unwrap().clone() {
            return Err(err);
        }
        self.objects
            .lock()
            .unwrap()
            .remove(&key(resource_group, site_name, namespace_name, relay_name))
            .map(|_| ())
            .ok_or_else(|| ArmError::NotFound("ResourceNotFound".to_string()))
    }
}

/// Fake `Microsoft.ServiceBus` authorization rule key API
#[derive(Default)]
pub struct FakeKeys {
    keys: Mutex<HashMap<(String, String), String>>,
    error: Mutex<Option<ArmError>>,
    last_call: Mutex<Option<(String, String, String)>>,
    pub calls: AtomicUsize,
}

impl FakeKeys {
    pub fn with_key(namespace: &str, rule: &str, primary_key: &str) -> Self {
        let keys = Self::default();
        keys.keys
            .lock()
            .unwrap()
            .insert((namespace.to_string(), rule.to_string()), primary_key.to_string());
        keys
    }

    pub fn fail(&self, err: ArmError) {
        *self.error.lock().unwrap() = Some(err);
    }

    pub fn last_call(&self) -> Option<(String, String, String)> {
        self.last_call.lock().unwrap().clone()
    }
}

#[async_trait]
impl NamespaceKeysClient for FakeKeys {
    async fn list_keys(
        &self,
        resource_group: &str,
        namespace_name: &str,
        authorization_rule: &str,
    ) -> ArmResult<AccessKeys> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_call.lock().unwrap() = Some((
            resource_group.to_string(),
            namespace_name.to_string(),
            authorization_rule.to_string(),
        ));
        if let Some(err) = self.error.lock().unwrap().clone() {
            return Err(err);
        }

        let primary = self
            .keys
            .lock()
            .unwrap()
            .get(&(namespace_name.to_string(), authorization_rule.to_string()))
            .cloned()
            .ok_or_else(|| ArmError::NotFound("AuthorizationRule not found".to_string()))?;

        Ok(AccessKeys {
            primary_key: Some(secret_string(primary)),
            secondary_key: Some(secret_string("secondary".to_string())),
            key_name: Some(authorization_rule.to_string()),
            ..Default::default()
        })
    }
}

pub fn binding() -> HybridConnectionBinding {
    HybridConnectionBinding {
        app_service_name: "site1".to_string(),
        resource_group_name: "rg1".to_string(),
        relay_id: RELAY_ID.to_string(),
        hostname: "h.example.net".to_string(),
        port: 443,
        service_bus_namespace: "ns1".to_string(),
        service_bus_suffix: DEFAULT_SERVICE_BUS_SUFFIX.to_string(),
        send_key_name: "key1".to_string(),
        send_key_value: secret_string("secret".to_string()),
    }
}

pub struct Harness {
    pub web: Arc<FakeWeb>,
    pub keys: Arc<FakeKeys>,
    pub resource: HybridConnectionResource,
}

pub fn harness(features: FeaturesConfig) -> Harness {
    harness_with(FakeKeys::with_key("ns1", "key1", PRIMARY_KEY), features)
}

pub fn harness_with(keys: FakeKeys, features: FeaturesConfig) -> Harness {
    let web = Arc::new(FakeWeb::default());
    let keys = Arc::new(keys);
    let clients = ClientHandles {
        hybrid_connections: web.clone(),
        namespace_keys: keys.clone(),
    };
    let resource = HybridConnectionResource::new(
        SUBSCRIPTION_ID,
        clients,
        TimeoutsConfig::default(),
        features,
    );
    Harness {
        web,
        keys,
        resource,
    }
}
