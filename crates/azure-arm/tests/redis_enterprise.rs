//! Handler tests for `Microsoft.Cache/redisEnterprise` against a mock server

use azure_arm::auth::StaticTokenCredential;
use azure_arm::redis_enterprise::{KeyType, RegenerateKeyRequest};
use azure_arm::resource_id::{RedisEnterpriseClusterId, ResourceGroupId};
use azure_arm::{ArmClient, OperationStatus, RedisEnterpriseHandler};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUB: &str = "00000000-0000-0000-0000-000000000000";

fn client_for(server: &MockServer) -> ArmClient {
    ArmClient::builder()
        .base_url(server.uri())
        .subscription_id(SUB)
        .credential(StaticTokenCredential::new("test-token"))
        .build()
        .unwrap()
}

fn cluster_id() -> RedisEnterpriseClusterId {
    RedisEnterpriseClusterId::new(SUB, "rg-1", "cache-1")
}

#[tokio::test]
async fn get_cluster_sends_api_version_and_bearer_token() {
    let server = MockServer::start().await;
    let id = cluster_id();

    Mock::given(method("GET"))
        .and(path(id.to_string()))
        .and(query_param("api-version", "2024-02-01"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": "cache-1",
            "location": "westeurope",
            "sku": {"name": "Enterprise_E10", "capacity": 2},
            "properties": {
                "hostName": "cache-1.westeurope.redisenterprise.cache.azure.net",
                "provisioningState": "Succeeded",
                "resourceState": "Running"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let handler = RedisEnterpriseHandler::new(client_for(&server));
    let cluster = handler.get_cluster(&id).await.unwrap();

    assert_eq!(cluster.name.as_deref(), Some("cache-1"));
    let properties = cluster.properties.unwrap();
    assert_eq!(
        properties.host_name.as_deref(),
        Some("cache-1.westeurope.redisenterprise.cache.azure.net")
    );
}

#[tokio::test]
async fn get_cluster_maps_404_to_not_found() {
    let server = MockServer::start().await;
    let id = cluster_id();

    Mock::given(method("GET"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "cluster does not exist"}
        })))
        .mount(&server)
        .await;

    let handler = RedisEnterpriseHandler::new(client_for(&server));
    let err = handler.get_cluster(&id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn delete_cluster_polls_async_operation_to_success() {
    let server = MockServer::start().await;
    let id = cluster_id();
    let op_path = "/operations/op-1";

    Mock::given(method("DELETE"))
        .and(path(id.to_string()))
        .respond_with(
            ResponseTemplate::new(202)
                .insert_header(
                    "Azure-AsyncOperation",
                    format!("{}{}", server.uri(), op_path).as_str(),
                )
                .insert_header("Retry-After", "7"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(op_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(op_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handler = RedisEnterpriseHandler::new(client.clone());
    let mut operation = handler.delete_cluster(&id).await.unwrap();

    assert_eq!(operation.status(), &OperationStatus::InProgress);
    assert_eq!(operation.retry_after(), Some(std::time::Duration::from_secs(7)));

    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::InProgress);
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::InProgress);
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::Succeeded);
    assert!(operation.is_done());
    // Terminal operations do not hit the wire again.
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::Succeeded);
}

#[tokio::test]
async fn failed_operation_carries_error_detail() {
    let server = MockServer::start().await;
    let id = cluster_id();
    let op_path = "/operations/op-2";

    Mock::given(method("PUT"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Azure-AsyncOperation",
            format!("{}{}", server.uri(), op_path).as_str(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(op_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "Failed",
            "error": {"code": "QuotaExceeded", "message": "not enough capacity"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handler = RedisEnterpriseHandler::new(client.clone());
    let cluster = serde_json::from_value(json!({
        "location": "westeurope",
        "sku": {"name": "Enterprise_E10", "capacity": 2}
    }))
    .unwrap();

    let mut operation = handler.create_cluster(&id, &cluster).await.unwrap();
    let status = operation.poll(&client).await.unwrap();
    assert!(status.is_failure());

    let err = operation.failure();
    assert!(err.to_string().contains("QuotaExceeded"));
    assert!(err.to_string().contains("not enough capacity"));
}

#[tokio::test]
async fn list_clusters_follows_next_link() {
    let server = MockServer::start().await;
    let rg = ResourceGroupId::new(SUB, "rg-1");
    let list_path = format!("{rg}/providers/Microsoft.Cache/redisEnterprise");

    Mock::given(method("GET"))
        .and(path(list_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"name": "c1", "location": "westeurope", "sku": {"name": "Enterprise_E10"}}
            ],
            "nextLink": format!("{}/page-2", server.uri())
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"name": "c2", "location": "westeurope", "sku": {"name": "Enterprise_E20"}}
            ]
        })))
        .mount(&server)
        .await;

    let handler = RedisEnterpriseHandler::new(client_for(&server));
    let clusters = handler.list_clusters(&rg).await.unwrap();

    let names: Vec<_> = clusters.iter().filter_map(|c| c.name.as_deref()).collect();
    assert_eq!(names, vec!["c1", "c2"]);
}

#[tokio::test]
async fn list_keys_posts_to_action_endpoint() {
    let server = MockServer::start().await;
    let id = cluster_id().database("default");

    Mock::given(method("POST"))
        .and(path(format!("{id}/listKeys")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "primaryKey": "pk", "secondaryKey": "sk"
        })))
        .mount(&server)
        .await;

    let handler = RedisEnterpriseHandler::new(client_for(&server));
    let keys = handler.list_keys(&id).await.unwrap();
    assert_eq!(keys.primary_key.as_deref(), Some("pk"));
    assert_eq!(keys.secondary_key.as_deref(), Some("sk"));
}

#[tokio::test]
async fn regenerate_key_sends_key_type() {
    let server = MockServer::start().await;
    let id = cluster_id().database("default");
    let op_path = "/operations/op-3";

    Mock::given(method("POST"))
        .and(path(format!("{id}/regenerateKey")))
        .and(body_json(json!({"keyType": "Secondary"})))
        .respond_with(ResponseTemplate::new(202).insert_header(
            "Azure-AsyncOperation",
            format!("{}{}", server.uri(), op_path).as_str(),
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(op_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handler = RedisEnterpriseHandler::new(client.clone());
    let mut operation = handler
        .regenerate_key(
            &id,
            &RegenerateKeyRequest {
                key_type: KeyType::Secondary,
            },
        )
        .await
        .unwrap();
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::Succeeded);
}
