//! Handler tests for `Microsoft.RedHatOpenShift` against a mock server

use azure_arm::auth::StaticTokenCredential;
use azure_arm::resource_id::OpenShiftClusterId;
use azure_arm::{ArmClient, OpenShiftClustersHandler, OperationStatus};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
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

fn cluster_id() -> OpenShiftClusterId {
    OpenShiftClusterId::new(SUB, "rg-1", "aro-1")
}

#[tokio::test]
async fn delete_polls_location_header_until_not_accepted() {
    let server = MockServer::start().await;
    let id = cluster_id();
    let location_path = "/locations/del-1";

    Mock::given(method("DELETE"))
        .and(path(id.to_string()))
        .and(query_param("api-version", "2023-09-04"))
        .respond_with(ResponseTemplate::new(202).insert_header(
            "Location",
            format!("{}{}", server.uri(), location_path).as_str(),
        ))
        .mount(&server)
        .await;

    // Two 202s, then a 204: still running, still running, done.
    Mock::given(method("GET"))
        .and(path(location_path))
        .respond_with(ResponseTemplate::new(202))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(location_path))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let handler = OpenShiftClustersHandler::new(client.clone());
    let mut operation = handler.delete(&id).await.unwrap();

    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::InProgress);
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::InProgress);
    assert_eq!(operation.poll(&client).await.unwrap(), OperationStatus::Succeeded);
}

#[tokio::test]
async fn list_credentials_returns_kubeadmin_login() {
    let server = MockServer::start().await;
    let id = cluster_id();

    Mock::given(method("POST"))
        .and(path(format!("{id}/listCredentials")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "kubeadminUsername": "kubeadmin",
            "kubeadminPassword": "hunter2"
        })))
        .mount(&server)
        .await;

    let handler = OpenShiftClustersHandler::new(client_for(&server));
    let credentials = handler.list_credentials(&id).await.unwrap();
    assert_eq!(credentials.kubeadmin_username.as_deref(), Some("kubeadmin"));
    assert_eq!(credentials.kubeadmin_password.as_deref(), Some("hunter2"));
}

#[tokio::test]
async fn list_admin_credentials_returns_kubeconfig() {
    let server = MockServer::start().await;
    let id = cluster_id();

    Mock::given(method("POST"))
        .and(path(format!("{id}/listAdminCredentials")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"kubeconfig": "YXBpVmVyc2lvbjogdjE="})),
        )
        .mount(&server)
        .await;

    let handler = OpenShiftClustersHandler::new(client_for(&server));
    let kubeconfig = handler.list_admin_credentials(&id).await.unwrap();
    assert_eq!(kubeconfig.kubeconfig.as_deref(), Some("YXBpVmVyc2lvbjogdjE="));
}

#[tokio::test]
async fn get_cluster_parses_profiles() {
    let server = MockServer::start().await;
    let id = cluster_id();

    Mock::given(method("GET"))
        .and(path(id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id.to_string(),
            "name": "aro-1",
            "location": "eastus",
            "properties": {
                "provisioningState": "Succeeded",
                "clusterProfile": {
                    "domain": "example",
                    "version": "4.14.16",
                    "resourceGroupId": format!("/subscriptions/{SUB}/resourceGroups/aro-infra"),
                    "fipsValidatedModules": "Disabled"
                },
                "networkProfile": {"podCidr": "10.128.0.0/14", "serviceCidr": "172.30.0.0/16"},
                "masterProfile": {"vmSize": "Standard_D8s_v3"},
                "workerProfiles": [
                    {"name": "worker", "vmSize": "Standard_D4s_v3", "diskSizeGB": 128, "count": 3}
                ],
                "apiserverProfile": {"visibility": "Public", "url": "https://api.example:6443"}
            }
        })))
        .mount(&server)
        .await;

    let handler = OpenShiftClustersHandler::new(client_for(&server));
    let cluster = handler.get(&id).await.unwrap();

    let profile = cluster.properties.cluster_profile.unwrap();
    assert_eq!(profile.version.as_deref(), Some("4.14.16"));
    // The pull secret is write-only and never echoed back.
    assert!(profile.pull_secret.is_none());

    let workers = cluster.properties.worker_profiles.unwrap();
    assert_eq!(workers[0].disk_size_gb, Some(128));
    assert_eq!(workers[0].count, Some(3));
}
