//! Handler tests for `Microsoft.Solutions` against a mock server

use azure_arm::auth::StaticTokenCredential;
use azure_arm::managed_applications::{
    Application, ApplicationDefinition, ApplicationDefinitionProperties, ApplicationKind,
    ApplicationLockLevel, ApplicationPatch, ApplicationProperties,
};
use azure_arm::resource_id::{ApplicationDefinitionId, ManagedApplicationId};
use azure_arm::{ArmClient, ManagedApplicationsHandler, OperationStatus};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
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

#[tokio::test]
async fn create_definition_puts_camel_case_body() {
    let server = MockServer::start().await;
    let id = ApplicationDefinitionId::new(SUB, "rg-1", "def-1");
    let op_path = "/operations/def-op";

    Mock::given(method("PUT"))
        .and(path(id.to_string()))
        .and(query_param("api-version", "2021-07-01"))
        .and(body_partial_json(json!({
            "location": "westeurope",
            "properties": {
                "lockLevel": "ReadOnly",
                "displayName": "Example definition"
            }
        })))
        .respond_with(ResponseTemplate::new(201).insert_header(
            "Azure-AsyncOperation",
            format!("{}{}", server.uri(), op_path).as_str(),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(op_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handler = ManagedApplicationsHandler::new(client.clone());
    let definition = ApplicationDefinition {
        location: "westeurope".to_string(),
        properties: ApplicationDefinitionProperties {
            lock_level: Some(ApplicationLockLevel::ReadOnly),
            display_name: Some("Example definition".to_string()),
            package_file_uri: Some("https://example.invalid/pkg.zip".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };

    let mut operation = handler
        .create_or_update_definition(&id, &definition)
        .await
        .unwrap();
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::Succeeded);
}

#[tokio::test]
async fn create_application_completes_synchronously_without_headers() {
    let server = MockServer::start().await;
    let id = ManagedApplicationId::new(SUB, "rg-1", "app-1");

    Mock::given(method("PUT"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": "app-1",
            "location": "westeurope",
            "kind": "ServiceCatalog",
            "properties": {"provisioningState": "Succeeded"}
        })))
        .mount(&server)
        .await;

    let handler = ManagedApplicationsHandler::new(client_for(&server));
    let application = Application {
        location: "westeurope".to_string(),
        kind: Some(ApplicationKind::ServiceCatalog),
        properties: ApplicationProperties {
            managed_resource_group_id: Some(format!("/subscriptions/{SUB}/resourceGroups/mrg")),
            application_definition_id: Some(
                ApplicationDefinitionId::new(SUB, "rg-1", "def-1").to_string(),
            ),
            ..Default::default()
        },
        ..Default::default()
    };

    let operation = handler.create_or_update(&id, &application).await.unwrap();
    assert!(operation.is_done());
    assert!(operation.status().is_success());
}

#[tokio::test]
async fn update_tags_is_synchronous_and_returns_application() {
    let server = MockServer::start().await;
    let id = ManagedApplicationId::new(SUB, "rg-1", "app-1");

    Mock::given(method("PATCH"))
        .and(path(id.to_string()))
        .and(body_partial_json(json!({"tags": {"env": "prod"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": "app-1",
            "location": "westeurope",
            "tags": {"env": "prod"},
            "properties": {"provisioningState": "Succeeded"}
        })))
        .mount(&server)
        .await;

    let handler = ManagedApplicationsHandler::new(client_for(&server));
    let patch = ApplicationPatch {
        tags: Some([("env".to_string(), "prod".to_string())].into_iter().collect()),
    };
    let updated = handler.update_tags(&id, &patch).await.unwrap();
    assert_eq!(
        updated.tags.unwrap().get("env").map(String::as_str),
        Some("prod")
    );
}

#[tokio::test]
async fn get_application_exposes_outputs() {
    let server = MockServer::start().await;
    let id = ManagedApplicationId::new(SUB, "rg-1", "app-1");

    Mock::given(method("GET"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": "app-1",
            "location": "westeurope",
            "properties": {
                "provisioningState": "Succeeded",
                "outputs": {"fqdn": {"type": "String", "value": "app.example"}}
            }
        })))
        .mount(&server)
        .await;

    let handler = ManagedApplicationsHandler::new(client_for(&server));
    let application = handler.get(&id).await.unwrap();
    let outputs = application.properties.outputs.unwrap();
    assert_eq!(outputs["fqdn"]["value"], "app.example");
}
