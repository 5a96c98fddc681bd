//! HTTP-level tests of the Resource Manager clients against a mock server
//!
//! These tests verify that:
//! - Requests carry the bearer token, api-version and a client request id
//! - Payloads and responses use the camelCase wire format
//! - Status codes map to the transport error kinds
//! - The lifecycle operations work end to end over HTTP

use hybridconn::adapters::arm::ArmClient;
use hybridconn::adapters::servicebus::{NamespaceKeysClient, ServiceBusNamespacesClient};
use hybridconn::adapters::web::{HybridConnection, HybridConnectionsClient, WebAppsClient};
use hybridconn::adapters::{create_clients, ClientHandles};
use hybridconn::config::{secret_string, AuthType, AzureConfig, FeaturesConfig, TimeoutsConfig};
use hybridconn::core::{HybridConnectionResource, SendKeyLookup};
use hybridconn::domain::{ArmError, HybridConnectionBinding, DEFAULT_SERVICE_BUS_SUFFIX};
use mockito::{Matcher, Server};
use secrecy::ExposeSecret;
use serde_json::json;
use std::sync::Arc;

const SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";
const RELAY_PATH: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Web/sites/site1/hybridConnectionNamespaces/ns1/relays/relay1";
const LIST_KEYS_PATH: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.ServiceBus/namespaces/ns1/AuthorizationRules/key1/listKeys";
const RELAY_ID: &str = "/subscriptions/00000000-0000-0000-0000-000000000000/resourceGroups/rg1/providers/Microsoft.Relay/namespaces/ns1/hybridConnections/relay1";

fn azure_config(server: &Server) -> AzureConfig {
    AzureConfig {
        subscription_id: SUBSCRIPTION_ID.to_string(),
        auth_type: AuthType::AccessToken,
        access_token: Some(secret_string("test-token".to_string())),
        resource_manager_endpoint: server.url(),
        ..Default::default()
    }
}

fn arm(server: &Server) -> Arc<ArmClient> {
    Arc::new(ArmClient::from_config(&azure_config(server)).unwrap())
}

fn web(server: &Server) -> WebAppsClient {
    WebAppsClient::new(arm(server), "2018-02-01")
}

fn web_api_version() -> Matcher {
    Matcher::UrlEncoded("api-version".to_string(), "2018-02-01".to_string())
}

fn service_bus_api_version() -> Matcher {
    Matcher::UrlEncoded("api-version".to_string(), "2017-04-01".to_string())
}

fn stored_body(port: i32) -> String {
    json!({
        "id": RELAY_PATH,
        "name": "relay1",
        "type": "Microsoft.Web/sites/hybridConnectionNamespaces/relays",
        "properties": {
            "serviceBusNamespace": "ns1",
            "relayName": "relay1",
            "relayArmUri": RELAY_ID,
            "hostname": "h.example.net",
            "port": port,
            "sendKeyName": "key1",
            "sendKeyValue": "",
            "serviceBusSuffix": ".servicebus.windows.net"
        }
    })
    .to_string()
}

fn binding() -> HybridConnectionBinding {
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

#[tokio::test]
async fn test_get_sends_auth_and_correlation_headers() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .match_header("authorization", "Bearer test-token")
        .match_header(
            "x-ms-client-request-id",
            Matcher::Regex(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[0-9a-f]{4}-[0-9a-f]{12}$".to_string()),
        )
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(stored_body(443))
        .create_async()
        .await;

    let resource = web(&server)
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(resource.id.as_deref(), Some(RELAY_PATH));
    let props = resource.properties.unwrap();
    assert_eq!(props.port, Some(443));
    assert_eq!(props.relay_arm_uri.as_deref(), Some(RELAY_ID));
}

#[tokio::test]
async fn test_get_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(404)
        .with_body(r#"{"error":{"code":"NotFound","message":"Cannot find HybridConnection."}}"#)
        .create_async()
        .await;

    let err = web(&server)
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(
        err,
        ArmError::NotFound("NotFound: Cannot find HybridConnection.".to_string())
    );
}

#[tokio::test]
async fn test_status_mapping() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;
    let err = web(&server)
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ArmError::ServerError {
            status: 500,
            message: "upstream exploded".to_string()
        }
    );

    let mut server = Server::new_async().await;
    server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(401)
        .with_body(r#"{"error":{"code":"InvalidAuthenticationToken","message":"expired"}}"#)
        .create_async()
        .await;
    let err = web(&server)
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::AuthenticationFailed(ref m) if m.contains("InvalidAuthenticationToken")));
}

#[tokio::test]
async fn test_invalid_json_is_invalid_response() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let err = web(&server)
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_put_sends_camel_case_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", RELAY_PATH)
        .match_query(web_api_version())
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "properties": {
                "serviceBusNamespace": "ns1",
                "relayName": "relay1",
                "relayArmUri": RELAY_ID,
                "hostname": "h.example.net",
                "port": 443,
                "sendKeyName": "key1",
                "sendKeyValue": "secret",
                "serviceBusSuffix": ".servicebus.windows.net"
            }
        })))
        .with_status(200)
        .with_body(stored_body(443))
        .create_async()
        .await;

    let envelope = HybridConnection::from_binding(&binding()).unwrap();
    let stored = web(&server)
        .create_or_update_hybrid_connection("rg1", "site1", "ns1", "relay1", &envelope)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(stored.id.as_deref(), Some(RELAY_PATH));
}

#[tokio::test]
async fn test_delete_status_handling() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(204)
        .create_async()
        .await;
    assert!(web(&server)
        .delete_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .is_ok());

    let mut server = Server::new_async().await;
    server
        .mock("DELETE", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(404)
        .create_async()
        .await;
    assert!(web(&server)
        .delete_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_list_keys() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", LIST_KEYS_PATH)
        .match_query(service_bus_api_version())
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(
            json!({
                "primaryConnectionString": "Endpoint=sb://ns1.servicebus.windows.net/;SharedAccessKeyName=key1;SharedAccessKey=primary",
                "secondaryConnectionString": "Endpoint=sb://ns1.servicebus.windows.net/;SharedAccessKeyName=key1;SharedAccessKey=secondary",
                "primaryKey": "primary",
                "secondaryKey": "secondary",
                "keyName": "key1"
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = ServiceBusNamespacesClient::new(arm(&server), "2017-04-01");
    let keys = client.list_keys("rg1", "ns1", "key1").await.unwrap();

    mock.assert_async().await;
    let primary: &str = keys.primary_key().unwrap().expose_secret().as_ref();
    assert_eq!(primary, "primary");
    assert_eq!(keys.key_name.as_deref(), Some("key1"));
}

#[tokio::test]
async fn test_connection_failure() {
    let config = AzureConfig {
        subscription_id: SUBSCRIPTION_ID.to_string(),
        auth_type: AuthType::AccessToken,
        access_token: Some(secret_string("test-token".to_string())),
        resource_manager_endpoint: "http://127.0.0.1:1".to_string(),
        request_timeout_seconds: 5,
        ..Default::default()
    };
    let client = WebAppsClient::new(Arc::new(ArmClient::from_config(&config).unwrap()), "2018-02-01");

    let err = client
        .get_hybrid_connection("rg1", "site1", "ns1", "relay1")
        .await
        .unwrap_err();
    assert!(matches!(err, ArmError::ConnectionFailed(_)));
}

fn resource(server: &Server) -> HybridConnectionResource {
    let clients: ClientHandles = create_clients(&azure_config(server)).unwrap();
    HybridConnectionResource::new(
        SUBSCRIPTION_ID,
        clients,
        TimeoutsConfig::default(),
        FeaturesConfig::default(),
    )
}

#[tokio::test]
async fn test_update_end_to_end() {
    let mut server = Server::new_async().await;
    let put = server
        .mock("PUT", RELAY_PATH)
        .match_query(web_api_version())
        .match_body(Matcher::PartialJson(json!({"properties": {"port": 8080}})))
        .with_status(200)
        .with_body(stored_body(8080))
        .expect(1)
        .create_async()
        .await;
    let read = server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(200)
        .with_body(stored_body(8080))
        .expect(1)
        .create_async()
        .await;
    let list_keys = server
        .mock("POST", LIST_KEYS_PATH)
        .match_query(service_bus_api_version())
        .with_status(200)
        .with_body(r#"{"primaryKey":"primary-from-listkeys","keyName":"key1"}"#)
        .expect(1)
        .create_async()
        .await;

    let mut declared = binding();
    declared.port = 8080;
    let data = resource(&server)
        .create_or_update(&declared, Some(RELAY_PATH))
        .await
        .unwrap();

    put.assert_async().await;
    read.assert_async().await;
    list_keys.assert_async().await;
    assert_eq!(data.id.to_string(), RELAY_PATH);
    assert_eq!(data.state.port, Some(8080));
    assert_eq!(data.state.send_key_value(), Some("primary-from-listkeys"));
    assert_eq!(data.send_key, SendKeyLookup::Resolved);
}

#[tokio::test]
async fn test_read_end_to_end_with_denied_list_keys() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(200)
        .with_body(stored_body(443))
        .create_async()
        .await;
    server
        .mock("POST", LIST_KEYS_PATH)
        .match_query(service_bus_api_version())
        .with_status(403)
        .with_body(r#"{"error":{"code":"AuthorizationFailed","message":"denied"}}"#)
        .create_async()
        .await;

    let data = resource(&server).read(RELAY_PATH).await.unwrap().unwrap();

    assert_eq!(data.state.hostname.as_deref(), Some("h.example.net"));
    assert!(data.state.send_key_value().is_none());
    assert!(!data.send_key.is_resolved());
}

#[tokio::test]
async fn test_read_end_to_end_absent() {
    let mut server = Server::new_async().await;
    let get = server
        .mock("GET", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(404)
        .create_async()
        .await;
    let list_keys = server
        .mock("POST", LIST_KEYS_PATH)
        .match_query(service_bus_api_version())
        .expect(0)
        .create_async()
        .await;

    assert!(resource(&server).read(RELAY_PATH).await.unwrap().is_none());
    get.assert_async().await;
    list_keys.assert_async().await;
}

#[tokio::test]
async fn test_delete_end_to_end() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", RELAY_PATH)
        .match_query(web_api_version())
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    resource(&server).delete(RELAY_PATH).await.unwrap();
    delete.assert_async().await;
}
