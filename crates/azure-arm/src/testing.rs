//! Mock ARM server for consumers' tests
//!
//! Wraps a [`wiremock::MockServer`] with a client wired to it and helpers
//! for the response shapes the real service produces, including the
//! LRO acceptance-then-status sequence.
//!
//! ```rust,ignore
//! let server = MockArmServer::start().await;
//! server.mock_get(&id.to_string(), cluster_fixture(&id)).await;
//! let client = server.client();
//! ```

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::auth::StaticTokenCredential;
use crate::ArmClient;

/// Subscription ID used by [`MockArmServer::client`].
pub const TEST_SUBSCRIPTION_ID: &str = "00000000-0000-0000-0000-000000000000";

pub struct MockArmServer {
    server: MockServer,
}

impl MockArmServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URI of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// The underlying wiremock server, for matchers this module does not
    /// provide.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// A client pointed at the mock server with a static test token.
    pub fn client(&self) -> ArmClient {
        ArmClient::builder()
            .base_url(self.server.uri())
            .subscription_id(TEST_SUBSCRIPTION_ID)
            .credential(StaticTokenCredential::new("test-token"))
            .build()
            .expect("mock client")
    }

    /// Mount a 200 GET for a resource path.
    pub async fn mock_get(&self, resource_path: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a 404 GET with an ARM `ResourceNotFound` body.
    pub async fn mock_get_not_found(&self, resource_path: &str) {
        Mock::given(method("GET"))
            .and(path(resource_path))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {"code": "ResourceNotFound", "message": "resource does not exist"}
            })))
            .mount(&self.server)
            .await;
    }

    /// Mount an LRO acceptance for a mutating request: the verb answers 202
    /// with an `Azure-AsyncOperation` header pointing at `operation_path`.
    pub async fn mock_lro_accepted(&self, verb: &str, resource_path: &str, operation_path: &str) {
        Mock::given(method(verb))
            .and(path(resource_path))
            .respond_with(
                ResponseTemplate::new(202)
                    .insert_header(
                        "Azure-AsyncOperation",
                        format!("{}{}", self.server.uri(), operation_path).as_str(),
                    )
                    .insert_header("Retry-After", "0"),
            )
            .mount(&self.server)
            .await;
    }

    /// Mount an operation status document that answers `InProgress` for
    /// `in_progress_polls` requests and then the given terminal document.
    pub async fn mock_operation_status(
        &self,
        operation_path: &str,
        in_progress_polls: u64,
        terminal: Value,
    ) {
        if in_progress_polls > 0 {
            Mock::given(method("GET"))
                .and(path(operation_path))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})),
                )
                .up_to_n_times(in_progress_polls)
                .mount(&self.server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path(operation_path))
            .respond_with(ResponseTemplate::new(200).set_body_json(terminal))
            .mount(&self.server)
            .await;
    }

    /// Terminal status document for a successful operation.
    pub fn operation_succeeded() -> Value {
        json!({"status": "Succeeded"})
    }

    /// Terminal status document for a failed operation.
    pub fn operation_failed(code: &str, message: &str) -> Value {
        json!({"status": "Failed", "error": {"code": code, "message": message}})
    }
}

/// Minimal Redis Enterprise cluster body in the wire shape.
pub fn cluster_fixture(id: &str, name: &str, resource_state: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Microsoft.Cache/redisEnterprise",
        "location": "westeurope",
        "sku": {"name": "Enterprise_E10", "capacity": 2},
        "properties": {
            "hostName": format!("{name}.westeurope.redisenterprise.cache.azure.net"),
            "provisioningState": "Succeeded",
            "resourceState": resource_state,
            "redisVersion": "7.2"
        }
    })
}

/// Minimal Redis Enterprise database body in the wire shape.
pub fn database_fixture(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": "Microsoft.Cache/redisEnterprise/databases",
        "properties": {
            "clientProtocol": "Encrypted",
            "port": 10000,
            "clusteringPolicy": "EnterpriseCluster",
            "evictionPolicy": "NoEviction",
            "provisioningState": "Succeeded",
            "resourceState": "Running"
        }
    })
}
