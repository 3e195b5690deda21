//! `Microsoft.Cache/redisEnterprise` - Redis Enterprise clusters and databases

use std::collections::BTreeMap;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::{ArmError, Result};
use crate::lro::{Operation, ProvisioningState};
use crate::resource_id::{RedisEnterpriseClusterId, RedisEnterpriseDatabaseId, ResourceGroupId};
use crate::ArmClient;

/// API version for all `Microsoft.Cache/redisEnterprise` requests.
pub const API_VERSION: &str = "2024-02-01";

/// Cluster SKU tier and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkuName {
    #[serde(rename = "Enterprise_E5")]
    EnterpriseE5,
    #[serde(rename = "Enterprise_E10")]
    EnterpriseE10,
    #[serde(rename = "Enterprise_E20")]
    EnterpriseE20,
    #[serde(rename = "Enterprise_E50")]
    EnterpriseE50,
    #[serde(rename = "Enterprise_E100")]
    EnterpriseE100,
    #[serde(rename = "EnterpriseFlash_F300")]
    EnterpriseFlashF300,
    #[serde(rename = "EnterpriseFlash_F700")]
    EnterpriseFlashF700,
    #[serde(rename = "EnterpriseFlash_F1500")]
    EnterpriseFlashF1500,
}

impl SkuName {
    fn as_str(&self) -> &'static str {
        match self {
            SkuName::EnterpriseE5 => "Enterprise_E5",
            SkuName::EnterpriseE10 => "Enterprise_E10",
            SkuName::EnterpriseE20 => "Enterprise_E20",
            SkuName::EnterpriseE50 => "Enterprise_E50",
            SkuName::EnterpriseE100 => "Enterprise_E100",
            SkuName::EnterpriseFlashF300 => "EnterpriseFlash_F300",
            SkuName::EnterpriseFlashF700 => "EnterpriseFlash_F700",
            SkuName::EnterpriseFlashF1500 => "EnterpriseFlash_F1500",
        }
    }
}

impl FromStr for SkuName {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        [
            SkuName::EnterpriseE5,
            SkuName::EnterpriseE10,
            SkuName::EnterpriseE20,
            SkuName::EnterpriseE50,
            SkuName::EnterpriseE100,
            SkuName::EnterpriseFlashF300,
            SkuName::EnterpriseFlashF700,
            SkuName::EnterpriseFlashF1500,
        ]
        .into_iter()
        .find(|sku| sku.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| ArmError::InvalidConfiguration(format!("unknown sku name {s:?}")))
    }
}

impl std::fmt::Display for SkuName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
    pub name: SkuName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i32>,
}

/// Operational state of a cluster or database, reported independently of
/// the ARM provisioning state. Open-ended like [`ProvisioningState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceState {
    Running,
    Creating,
    CreateFailed,
    Updating,
    UpdateFailed,
    Deleting,
    DeleteFailed,
    Enabling,
    EnableFailed,
    Disabling,
    DisableFailed,
    Disabled,
    Scaling,
    ScalingFailed,
    Other(String),
}

impl From<String> for ResourceState {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "running" => ResourceState::Running,
            "creating" => ResourceState::Creating,
            "createfailed" => ResourceState::CreateFailed,
            "updating" => ResourceState::Updating,
            "updatefailed" => ResourceState::UpdateFailed,
            "deleting" => ResourceState::Deleting,
            "deletefailed" => ResourceState::DeleteFailed,
            "enabling" => ResourceState::Enabling,
            "enablefailed" => ResourceState::EnableFailed,
            "disabling" => ResourceState::Disabling,
            "disablefailed" => ResourceState::DisableFailed,
            "disabled" => ResourceState::Disabled,
            "scaling" => ResourceState::Scaling,
            "scalingfailed" => ResourceState::ScalingFailed,
            _ => ResourceState::Other(s),
        }
    }
}

impl From<ResourceState> for String {
    fn from(state: ResourceState) -> Self {
        match state {
            ResourceState::Running => "Running".to_string(),
            ResourceState::Creating => "Creating".to_string(),
            ResourceState::CreateFailed => "CreateFailed".to_string(),
            ResourceState::Updating => "Updating".to_string(),
            ResourceState::UpdateFailed => "UpdateFailed".to_string(),
            ResourceState::Deleting => "Deleting".to_string(),
            ResourceState::DeleteFailed => "DeleteFailed".to_string(),
            ResourceState::Enabling => "Enabling".to_string(),
            ResourceState::EnableFailed => "EnableFailed".to_string(),
            ResourceState::Disabling => "Disabling".to_string(),
            ResourceState::DisableFailed => "DisableFailed".to_string(),
            ResourceState::Disabled => "Disabled".to_string(),
            ResourceState::Scaling => "Scaling".to_string(),
            ResourceState::ScalingFailed => "ScalingFailed".to_string(),
            ResourceState::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ResourceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from(self.clone()))
    }
}

impl ResourceState {
    /// A `*Failed` state the resource will not leave on its own.
    pub fn is_failed(&self) -> bool {
        matches!(
            self,
            ResourceState::CreateFailed
                | ResourceState::UpdateFailed
                | ResourceState::DeleteFailed
                | ResourceState::EnableFailed
                | ResourceState::DisableFailed
                | ResourceState::ScalingFailed
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterProperties {
    /// "1.0", "1.1" or "1.2".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_tls_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_state: Option<ResourceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis_version: Option<String>,
}

/// A Redis Enterprise cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    pub sku: Sku,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<ClusterProperties>,
}

/// PATCH body for clusters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<Sku>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// TLS or plaintext client access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientProtocol {
    Encrypted,
    Plaintext,
}

impl FromStr for ClientProtocol {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "encrypted" => Ok(ClientProtocol::Encrypted),
            "plaintext" => Ok(ClientProtocol::Plaintext),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown client protocol {s:?} (expected Encrypted or Plaintext)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusteringPolicy {
    EnterpriseCluster,
    #[serde(rename = "OSSCluster")]
    OssCluster,
}

impl FromStr for ClusteringPolicy {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "enterprisecluster" => Ok(ClusteringPolicy::EnterpriseCluster),
            "osscluster" => Ok(ClusteringPolicy::OssCluster),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown clustering policy {s:?} (expected EnterpriseCluster or OSSCluster)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvictionPolicy {
    AllKeysLFU,
    AllKeysLRU,
    AllKeysRandom,
    VolatileLRU,
    VolatileLFU,
    VolatileTTL,
    VolatileRandom,
    NoEviction,
}

impl FromStr for EvictionPolicy {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "allkeyslfu" => Ok(EvictionPolicy::AllKeysLFU),
            "allkeyslru" => Ok(EvictionPolicy::AllKeysLRU),
            "allkeysrandom" => Ok(EvictionPolicy::AllKeysRandom),
            "volatilelru" => Ok(EvictionPolicy::VolatileLRU),
            "volatilelfu" => Ok(EvictionPolicy::VolatileLFU),
            "volatilettl" => Ok(EvictionPolicy::VolatileTTL),
            "volatilerandom" => Ok(EvictionPolicy::VolatileRandom),
            "noeviction" => Ok(EvictionPolicy::NoEviction),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown eviction policy {s:?}"
            ))),
        }
    }
}

/// AOF persistence flush cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AofFrequency {
    #[serde(rename = "1s")]
    OneSecond,
    #[serde(rename = "always")]
    Always,
}

impl FromStr for AofFrequency {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "1s" => Ok(AofFrequency::OneSecond),
            "always" => Ok(AofFrequency::Always),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown AOF frequency {s:?} (expected 1s or always)"
            ))),
        }
    }
}

/// RDB snapshot cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RdbFrequency {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "12h")]
    TwelveHours,
}

impl FromStr for RdbFrequency {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "1h" => Ok(RdbFrequency::OneHour),
            "6h" => Ok(RdbFrequency::SixHours),
            "12h" => Ok(RdbFrequency::TwelveHours),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown RDB frequency {s:?} (expected 1h, 6h or 12h)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persistence {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aof_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdb_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aof_frequency: Option<AofFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdb_frequency: Option<RdbFrequency>,
}

/// A Redis module enabled on a database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    /// Populated by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_protocol: Option<ClientProtocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clustering_policy: Option<ClusteringPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eviction_policy: Option<EvictionPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persistence: Option<Persistence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<Module>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_state: Option<ResourceState>,
}

/// A database inside a Redis Enterprise cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Database {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub properties: DatabaseProperties,
}

/// PATCH body for databases; same property bag, all fields optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseUpdate {
    pub properties: DatabaseProperties,
}

/// Database access keys returned by `listKeys`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessKeys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<String>,
}

/// Which key `regenerateKey` rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    Primary,
    Secondary,
}

impl FromStr for KeyType {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "primary" => Ok(KeyType::Primary),
            "secondary" => Ok(KeyType::Secondary),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown key type {s:?} (expected Primary or Secondary)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateKeyRequest {
    pub key_type: KeyType,
}

/// Handler for `Microsoft.Cache/redisEnterprise` resources.
#[derive(Debug, Clone)]
pub struct RedisEnterpriseHandler {
    client: ArmClient,
}

impl RedisEnterpriseHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    // Clusters

    pub async fn create_cluster(
        &self,
        id: &RedisEnterpriseClusterId,
        cluster: &Cluster,
    ) -> Result<Operation> {
        let body = serde_json::to_value(cluster)?;
        self.client
            .begin(Method::PUT, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn get_cluster(&self, id: &RedisEnterpriseClusterId) -> Result<Cluster> {
        self.client.get_json(&id.to_string(), API_VERSION).await
    }

    pub async fn update_cluster(
        &self,
        id: &RedisEnterpriseClusterId,
        update: &ClusterUpdate,
    ) -> Result<Operation> {
        let body = serde_json::to_value(update)?;
        self.client
            .begin(Method::PATCH, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn delete_cluster(&self, id: &RedisEnterpriseClusterId) -> Result<Operation> {
        self.client
            .begin(Method::DELETE, &id.to_string(), API_VERSION, None)
            .await
    }

    pub async fn list_clusters(&self, resource_group: &ResourceGroupId) -> Result<Vec<Cluster>> {
        let path = format!("{resource_group}/providers/Microsoft.Cache/redisEnterprise");
        self.client.list_paged(&path, API_VERSION).await
    }

    // Databases

    pub async fn create_database(
        &self,
        id: &RedisEnterpriseDatabaseId,
        database: &Database,
    ) -> Result<Operation> {
        let body = serde_json::to_value(database)?;
        self.client
            .begin(Method::PUT, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn get_database(&self, id: &RedisEnterpriseDatabaseId) -> Result<Database> {
        self.client.get_json(&id.to_string(), API_VERSION).await
    }

    pub async fn update_database(
        &self,
        id: &RedisEnterpriseDatabaseId,
        update: &DatabaseUpdate,
    ) -> Result<Operation> {
        let body = serde_json::to_value(update)?;
        self.client
            .begin(Method::PATCH, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn delete_database(&self, id: &RedisEnterpriseDatabaseId) -> Result<Operation> {
        self.client
            .begin(Method::DELETE, &id.to_string(), API_VERSION, None)
            .await
    }

    pub async fn list_databases(&self, id: &RedisEnterpriseClusterId) -> Result<Vec<Database>> {
        let path = format!("{id}/databases");
        self.client.list_paged(&path, API_VERSION).await
    }

    pub async fn list_keys(&self, id: &RedisEnterpriseDatabaseId) -> Result<AccessKeys> {
        let path = format!("{id}/listKeys");
        self.client.post_json(&path, API_VERSION, None).await
    }

    /// Roll one of the access keys. Runs as an LRO; fetch the new keys with
    /// [`RedisEnterpriseHandler::list_keys`] once it completes.
    pub async fn regenerate_key(
        &self,
        id: &RedisEnterpriseDatabaseId,
        request: &RegenerateKeyRequest,
    ) -> Result<Operation> {
        let path = format!("{id}/regenerateKey");
        let body = serde_json::to_value(request)?;
        self.client
            .begin(Method::POST, &path, API_VERSION, Some(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sku_name_serializes_with_underscore() {
        let sku = Sku {
            name: SkuName::EnterpriseE10,
            capacity: Some(2),
        };
        let value = serde_json::to_value(&sku).unwrap();
        assert_eq!(value, json!({"name": "Enterprise_E10", "capacity": 2}));
    }

    #[test]
    fn sku_name_parse_is_case_insensitive() {
        assert_eq!(
            "enterprise_e100".parse::<SkuName>().unwrap(),
            SkuName::EnterpriseE100
        );
        assert_eq!(
            "EnterpriseFlash_F300".parse::<SkuName>().unwrap(),
            SkuName::EnterpriseFlashF300
        );
        assert!("Enterprise_E1".parse::<SkuName>().is_err());
    }

    #[test]
    fn resource_state_keeps_unknown_values() {
        let state = ResourceState::from("Migrating".to_string());
        assert_eq!(state, ResourceState::Other("Migrating".to_string()));
        assert!(!state.is_failed());
        assert!(ResourceState::CreateFailed.is_failed());
    }

    #[test]
    fn persistence_frequencies_serialize_lowercase() {
        let persistence = Persistence {
            aof_enabled: Some(true),
            aof_frequency: Some(AofFrequency::OneSecond),
            rdb_enabled: Some(true),
            rdb_frequency: Some(RdbFrequency::SixHours),
        };
        let value = serde_json::to_value(&persistence).unwrap();
        assert_eq!(value["aofFrequency"], "1s");
        assert_eq!(value["rdbFrequency"], "6h");
    }

    #[test]
    fn database_round_trips_through_wire_shape() {
        let body = json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Cache/redisEnterprise/c/databases/default",
            "name": "default",
            "type": "Microsoft.Cache/redisEnterprise/databases",
            "properties": {
                "clientProtocol": "Encrypted",
                "port": 10000,
                "clusteringPolicy": "OSSCluster",
                "evictionPolicy": "NoEviction",
                "provisioningState": "Succeeded",
                "resourceState": "Running",
                "modules": [{"name": "RedisJSON", "version": "2.6.8"}]
            }
        });

        let db: Database = serde_json::from_value(body).unwrap();
        assert_eq!(db.properties.clustering_policy, Some(ClusteringPolicy::OssCluster));
        assert_eq!(db.properties.resource_state, Some(ResourceState::Running));

        let back = serde_json::to_value(&db).unwrap();
        assert_eq!(back["properties"]["clusteringPolicy"], "OSSCluster");
        assert_eq!(back["properties"]["modules"][0]["name"], "RedisJSON");
    }

    #[test]
    fn regenerate_request_shape() {
        let request = RegenerateKeyRequest {
            key_type: KeyType::Primary,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"keyType": "Primary"})
        );
    }
}
