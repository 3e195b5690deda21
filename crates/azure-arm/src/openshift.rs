//! `Microsoft.RedHatOpenShift/openShiftClusters` - Azure Red Hat OpenShift

use std::collections::BTreeMap;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{ArmError, Result};
use crate::lro::{Operation, ProvisioningState};
use crate::resource_id::{OpenShiftClusterId, ResourceGroupId};
use crate::ArmClient;

/// API version for all `Microsoft.RedHatOpenShift` requests.
pub const API_VERSION: &str = "2023-09-04";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FipsValidatedModules {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionAtHost {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Private,
}

impl FromStr for Visibility {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown visibility {s:?} (expected Public or Private)"
            ))),
        }
    }
}

/// How cluster egress is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundType {
    Loadbalancer,
    UserDefinedRouting,
}

impl FromStr for OutboundType {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "loadbalancer" => Ok(OutboundType::Loadbalancer),
            "userdefinedrouting" => Ok(OutboundType::UserDefinedRouting),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown outbound type {s:?} (expected Loadbalancer or UserDefinedRouting)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProfile {
    /// Red Hat pull secret; write-only, the service never echoes it back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Resource group the cluster's infrastructure lands in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fips_validated_modules: Option<FipsValidatedModules>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Write-only, like the pull secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pod_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_cidr: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbound_type: Option<OutboundType>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_at_host: Option<EncryptionAtHost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_encryption_set_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vm_size: Option<String>,
    #[serde(rename = "diskSizeGB", skip_serializing_if = "Option::is_none")]
    pub disk_size_gb: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_at_host: Option<EncryptionAtHost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_encryption_set_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiServerProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftClusterProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_profile: Option<ClusterProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console_profile: Option<ConsoleProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_principal_profile: Option<ServicePrincipalProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_profile: Option<NetworkProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_profile: Option<MasterProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_profiles: Option<Vec<WorkerProfile>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apiserver_profile: Option<ApiServerProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingress_profiles: Option<Vec<IngressProfile>>,
}

/// An Azure Red Hat OpenShift cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftCluster {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: OpenShiftClusterProperties,
}

/// PATCH body for clusters; only tags are mutable in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenShiftClusterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// `listCredentials` response: the kubeadmin login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftClusterCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeadmin_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeadmin_password: Option<String>,
}

/// `listAdminCredentials` response: a base64-encoded kubeconfig.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenShiftClusterAdminKubeconfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kubeconfig: Option<String>,
}

/// Handler for `Microsoft.RedHatOpenShift` resources.
#[derive(Debug, Clone)]
pub struct OpenShiftClustersHandler {
    client: ArmClient,
}

impl OpenShiftClustersHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    pub async fn create_or_update(
        &self,
        id: &OpenShiftClusterId,
        cluster: &OpenShiftCluster,
    ) -> Result<Operation> {
        let body = serde_json::to_value(cluster)?;
        self.client
            .begin(Method::PUT, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn get(&self, id: &OpenShiftClusterId) -> Result<OpenShiftCluster> {
        self.client.get_json(&id.to_string(), API_VERSION).await
    }

    pub async fn update(
        &self,
        id: &OpenShiftClusterId,
        update: &OpenShiftClusterUpdate,
    ) -> Result<Operation> {
        let body = serde_json::to_value(update)?;
        self.client
            .begin(Method::PATCH, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn delete(&self, id: &OpenShiftClusterId) -> Result<Operation> {
        self.client
            .begin(Method::DELETE, &id.to_string(), API_VERSION, None)
            .await
    }

    pub async fn list(&self, resource_group: &ResourceGroupId) -> Result<Vec<OpenShiftCluster>> {
        let path = format!(
            "{resource_group}/providers/Microsoft.RedHatOpenShift/openShiftClusters"
        );
        self.client.list_paged(&path, API_VERSION).await
    }

    pub async fn list_credentials(
        &self,
        id: &OpenShiftClusterId,
    ) -> Result<OpenShiftClusterCredentials> {
        let path = format!("{id}/listCredentials");
        self.client.post_json(&path, API_VERSION, None).await
    }

    pub async fn list_admin_credentials(
        &self,
        id: &OpenShiftClusterId,
    ) -> Result<OpenShiftClusterAdminKubeconfig> {
        let path = format!("{id}/listAdminCredentials");
        self.client.post_json(&path, API_VERSION, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cluster_serializes_nested_profiles() {
        let cluster = OpenShiftCluster {
            location: "eastus".to_string(),
            properties: OpenShiftClusterProperties {
                cluster_profile: Some(ClusterProfile {
                    domain: Some("example".to_string()),
                    version: Some("4.14.16".to_string()),
                    resource_group_id: Some("/subscriptions/s/resourceGroups/aro-infra".to_string()),
                    fips_validated_modules: Some(FipsValidatedModules::Disabled),
                    pull_secret: Some("{\"auths\":{}}".to_string()),
                }),
                worker_profiles: Some(vec![WorkerProfile {
                    name: Some("worker".to_string()),
                    vm_size: Some("Standard_D4s_v3".to_string()),
                    disk_size_gb: Some(128),
                    count: Some(3),
                    ..Default::default()
                }]),
                apiserver_profile: Some(ApiServerProfile {
                    visibility: Some(Visibility::Public),
                    ..Default::default()
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        let value = serde_json::to_value(&cluster).unwrap();
        assert_eq!(value["properties"]["clusterProfile"]["fipsValidatedModules"], "Disabled");
        assert_eq!(value["properties"]["workerProfiles"][0]["diskSizeGB"], 128);
        assert_eq!(value["properties"]["apiserverProfile"]["visibility"], "Public");
    }

    #[test]
    fn cluster_deserializes_service_reported_fields() {
        let body = json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.RedHatOpenShift/openShiftClusters/aro",
            "name": "aro",
            "location": "eastus",
            "properties": {
                "provisioningState": "Succeeded",
                "consoleProfile": {"url": "https://console.example"},
                "apiserverProfile": {"visibility": "Private", "url": "https://api.example:6443", "ip": "10.0.0.4"},
                "ingressProfiles": [{"name": "default", "visibility": "Private", "ip": "10.0.0.5"}]
            }
        });

        let cluster: OpenShiftCluster = serde_json::from_value(body).unwrap();
        assert_eq!(
            cluster.properties.provisioning_state,
            Some(ProvisioningState::Succeeded)
        );
        let apiserver = cluster.properties.apiserver_profile.unwrap();
        assert_eq!(apiserver.visibility, Some(Visibility::Private));
        assert_eq!(
            cluster.properties.console_profile.unwrap().url.as_deref(),
            Some("https://console.example")
        );
    }

    #[test]
    fn outbound_type_parse() {
        assert_eq!(
            "loadbalancer".parse::<OutboundType>().unwrap(),
            OutboundType::Loadbalancer
        );
        assert!("natgateway".parse::<OutboundType>().is_err());
    }
}
