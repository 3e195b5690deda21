//! Workflow tests against a mock ARM server
//!
//! Responses are arranged so no polling sleep is needed: operations report
//! `Succeeded` on the first status request and clusters report `Running` on
//! the first refresh.

use std::time::Duration;

use azure_arm::redis_enterprise::KeyType;
use azure_arm::resource_id::RedisEnterpriseClusterId;
use azure_arm::testing::{cluster_fixture, database_fixture, MockArmServer, TEST_SUBSCRIPTION_ID};
use armctl_core::redis_enterprise::{
    create_cluster_and_wait, delete_cluster_and_wait, read_cluster, read_database,
    regenerate_key_and_wait,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(60);

fn cluster_id() -> RedisEnterpriseClusterId {
    RedisEnterpriseClusterId::new(TEST_SUBSCRIPTION_ID, "rg-1", "cache-1")
}

fn cluster_request() -> azure_arm::redis_enterprise::Cluster {
    serde_json::from_value(json!({
        "location": "westeurope",
        "sku": {"name": "Enterprise_E10", "capacity": 2}
    }))
    .unwrap()
}

#[tokio::test]
async fn create_cluster_polls_operation_then_resource_state() {
    let server = MockArmServer::start().await;
    let id = cluster_id();
    let id_path = id.to_string();

    server
        .mock_lro_accepted("PUT", &id_path, "/operations/create-1")
        .await;
    server
        .mock_operation_status("/operations/create-1", 0, MockArmServer::operation_succeeded())
        .await;
    server
        .mock_get(&id_path, cluster_fixture(&id_path, "cache-1", "Running"))
        .await;

    let cluster = create_cluster_and_wait(&server.client(), &id, &cluster_request(), TIMEOUT, None)
        .await
        .unwrap();

    assert_eq!(cluster.name.as_deref(), Some("cache-1"));
    let properties = cluster.properties.unwrap();
    assert_eq!(
        properties.resource_state.map(String::from).as_deref(),
        Some("Running")
    );
}

#[tokio::test]
async fn create_cluster_failure_names_the_resource() {
    let server = MockArmServer::start().await;
    let id = cluster_id();

    server
        .mock_lro_accepted("PUT", &id.to_string(), "/operations/create-2")
        .await;
    server
        .mock_operation_status(
            "/operations/create-2",
            0,
            MockArmServer::operation_failed("QuotaExceeded", "not enough capacity"),
        )
        .await;

    let err = create_cluster_and_wait(&server.client(), &id, &cluster_request(), TIMEOUT, None)
        .await
        .unwrap_err();

    let rendered = err.to_string();
    assert!(rendered.contains("cache-1"), "missing resource name: {rendered}");
    assert!(rendered.contains("rg-1"), "missing resource group: {rendered}");
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn create_cluster_fails_fast_on_failed_resource_state() {
    let server = MockArmServer::start().await;
    let id = cluster_id();
    let id_path = id.to_string();

    server
        .mock_lro_accepted("PUT", &id_path, "/operations/create-3")
        .await;
    server
        .mock_operation_status("/operations/create-3", 0, MockArmServer::operation_succeeded())
        .await;
    server
        .mock_get(&id_path, cluster_fixture(&id_path, "cache-1", "CreateFailed"))
        .await;

    let err = create_cluster_and_wait(&server.client(), &id, &cluster_request(), TIMEOUT, None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("CreateFailed"));
}

#[tokio::test]
async fn read_cluster_maps_404_to_none() {
    let server = MockArmServer::start().await;
    let id = cluster_id();

    server.mock_get_not_found(&id.to_string()).await;

    let result = read_cluster(&server.client(), &id).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn read_database_returns_parsed_database() {
    let server = MockArmServer::start().await;
    let id = cluster_id().database("default");
    let id_path = id.to_string();

    server
        .mock_get(&id_path, database_fixture(&id_path, "default"))
        .await;

    let database = read_database(&server.client(), &id).await.unwrap().unwrap();
    assert_eq!(database.name.as_deref(), Some("default"));
    assert_eq!(database.properties.port, Some(10000));
}

#[tokio::test]
async fn delete_absent_cluster_is_success() {
    let server = MockArmServer::start().await;
    let id = cluster_id();

    Mock::given(method("DELETE"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "already gone"}
        })))
        .mount(server.inner())
        .await;

    delete_cluster_and_wait(&server.client(), &id, TIMEOUT, None)
        .await
        .expect("deleting an absent cluster should converge");
}

#[tokio::test]
async fn regenerate_key_returns_fresh_keys() {
    let server = MockArmServer::start().await;
    let id = cluster_id().database("default");

    server
        .mock_lro_accepted("POST", &format!("{id}/regenerateKey"), "/operations/regen-1")
        .await;
    server
        .mock_operation_status("/operations/regen-1", 0, MockArmServer::operation_succeeded())
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{id}/listKeys")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "primaryKey": "new-pk", "secondaryKey": "sk"
        })))
        .mount(server.inner())
        .await;

    let keys = regenerate_key_and_wait(&server.client(), &id, KeyType::Primary, TIMEOUT, None)
        .await
        .unwrap();
    assert_eq!(keys.primary_key.as_deref(), Some("new-pk"));
}
