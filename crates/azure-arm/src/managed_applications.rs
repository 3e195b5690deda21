//! `Microsoft.Solutions` - managed applications and application definitions

use std::collections::BTreeMap;
use std::str::FromStr;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ArmError, Result};
use crate::lro::{Operation, ProvisioningState};
use crate::resource_id::{ApplicationDefinitionId, ManagedApplicationId, ResourceGroupId};
use crate::ArmClient;

/// API version for all `Microsoft.Solutions` requests.
pub const API_VERSION: &str = "2021-07-01";

/// Lock applied to the managed resource group of deployed applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationLockLevel {
    None,
    ReadOnly,
    CanNotDelete,
}

impl FromStr for ApplicationLockLevel {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(ApplicationLockLevel::None),
            "readonly" => Ok(ApplicationLockLevel::ReadOnly),
            "cannotdelete" => Ok(ApplicationLockLevel::CanNotDelete),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown lock level {s:?} (expected None, ReadOnly or CanNotDelete)"
            ))),
        }
    }
}

impl std::fmt::Display for ApplicationLockLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ApplicationLockLevel::None => "None",
            ApplicationLockLevel::ReadOnly => "ReadOnly",
            ApplicationLockLevel::CanNotDelete => "CanNotDelete",
        };
        write!(f, "{s}")
    }
}

/// Role assignment granted to the publisher on the managed resource group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationAuthorization {
    pub principal_id: String,
    pub role_definition_id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDefinitionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_level: Option<ApplicationLockLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizations: Option<Vec<ApplicationAuthorization>>,
    /// Zip package with mainTemplate.json and createUiDefinition.json.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_file_uri: Option<String>,
    /// Inline alternative to a package file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_template: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_ui_definition: Option<Value>,
}

/// A service catalog application definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDefinition {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: ApplicationDefinitionProperties,
}

/// How the application was published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationKind {
    ServiceCatalog,
    MarketPlace,
}

impl FromStr for ApplicationKind {
    type Err = ArmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "servicecatalog" => Ok(ApplicationKind::ServiceCatalog),
            "marketplace" => Ok(ApplicationKind::MarketPlace),
            _ => Err(ArmError::InvalidConfiguration(format!(
                "unknown application kind {s:?} (expected ServiceCatalog or MarketPlace)"
            ))),
        }
    }
}

/// Marketplace plan reference; required for `MarketPlace` kind applications.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub name: String,
    pub product: String,
    pub publisher: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationProperties {
    /// Resource group the deployed resources land in. Set on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managed_resource_group_id: Option<String>,
    /// Definition the application deploys; required for ServiceCatalog kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_definition_id: Option<String>,
    /// Deployment parameters, passed through to the template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// Template outputs, populated by the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outputs: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A deployed managed application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ApplicationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
    pub properties: ApplicationProperties,
}

/// PATCH body for applications; only tags are mutable in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

/// Handler for `Microsoft.Solutions` resources.
#[derive(Debug, Clone)]
pub struct ManagedApplicationsHandler {
    client: ArmClient,
}

impl ManagedApplicationsHandler {
    pub fn new(client: ArmClient) -> Self {
        Self { client }
    }

    // Application definitions

    pub async fn create_or_update_definition(
        &self,
        id: &ApplicationDefinitionId,
        definition: &ApplicationDefinition,
    ) -> Result<Operation> {
        let body = serde_json::to_value(definition)?;
        self.client
            .begin(Method::PUT, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn get_definition(
        &self,
        id: &ApplicationDefinitionId,
    ) -> Result<ApplicationDefinition> {
        self.client.get_json(&id.to_string(), API_VERSION).await
    }

    pub async fn delete_definition(&self, id: &ApplicationDefinitionId) -> Result<Operation> {
        self.client
            .begin(Method::DELETE, &id.to_string(), API_VERSION, None)
            .await
    }

    pub async fn list_definitions(
        &self,
        resource_group: &ResourceGroupId,
    ) -> Result<Vec<ApplicationDefinition>> {
        let path = format!(
            "{resource_group}/providers/Microsoft.Solutions/applicationDefinitions"
        );
        self.client.list_paged(&path, API_VERSION).await
    }

    // Applications

    pub async fn create_or_update(
        &self,
        id: &ManagedApplicationId,
        application: &Application,
    ) -> Result<Operation> {
        let body = serde_json::to_value(application)?;
        self.client
            .begin(Method::PUT, &id.to_string(), API_VERSION, Some(&body))
            .await
    }

    pub async fn get(&self, id: &ManagedApplicationId) -> Result<Application> {
        self.client.get_json(&id.to_string(), API_VERSION).await
    }

    /// Tag-only update; answers synchronously with the updated application.
    pub async fn update_tags(
        &self,
        id: &ManagedApplicationId,
        patch: &ApplicationPatch,
    ) -> Result<Application> {
        let body = serde_json::to_value(patch)?;
        let response = self
            .client
            .send(Method::PATCH, &id.to_string(), API_VERSION, Some(&body))
            .await?;
        Ok(serde_json::from_value(response.body)?)
    }

    pub async fn delete(&self, id: &ManagedApplicationId) -> Result<Operation> {
        self.client
            .begin(Method::DELETE, &id.to_string(), API_VERSION, None)
            .await
    }

    pub async fn list(&self, resource_group: &ResourceGroupId) -> Result<Vec<Application>> {
        let path = format!("{resource_group}/providers/Microsoft.Solutions/applications");
        self.client.list_paged(&path, API_VERSION).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn lock_level_parse_is_case_insensitive() {
        assert_eq!(
            "readonly".parse::<ApplicationLockLevel>().unwrap(),
            ApplicationLockLevel::ReadOnly
        );
        assert_eq!(
            "CanNotDelete".parse::<ApplicationLockLevel>().unwrap(),
            ApplicationLockLevel::CanNotDelete
        );
        assert!("readwrite".parse::<ApplicationLockLevel>().is_err());
    }

    #[test]
    fn definition_serializes_camel_case() {
        let definition = ApplicationDefinition {
            location: "westeurope".to_string(),
            properties: ApplicationDefinitionProperties {
                lock_level: Some(ApplicationLockLevel::ReadOnly),
                display_name: Some("Example".to_string()),
                package_file_uri: Some("https://example.invalid/pkg.zip".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let value = serde_json::to_value(&definition).unwrap();
        assert_eq!(value["properties"]["lockLevel"], "ReadOnly");
        assert_eq!(value["properties"]["displayName"], "Example");
        assert_eq!(
            value["properties"]["packageFileUri"],
            "https://example.invalid/pkg.zip"
        );
        // Unset optionals must not appear in the request body.
        assert!(value["properties"].get("mainTemplate").is_none());
    }

    #[test]
    fn application_deserializes_outputs_and_state() {
        let body = json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Solutions/applications/app1",
            "name": "app1",
            "type": "Microsoft.Solutions/applications",
            "location": "westeurope",
            "kind": "ServiceCatalog",
            "properties": {
                "managedResourceGroupId": "/subscriptions/s/resourceGroups/mrg",
                "applicationDefinitionId": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.Solutions/applicationDefinitions/def1",
                "outputs": {"endpoint": {"type": "String", "value": "https://x"}},
                "provisioningState": "Succeeded"
            }
        });

        let app: Application = serde_json::from_value(body).unwrap();
        assert_eq!(app.kind, Some(ApplicationKind::ServiceCatalog));
        assert_eq!(
            app.properties.provisioning_state,
            Some(ProvisioningState::Succeeded)
        );
        assert!(app.properties.outputs.is_some());
    }
}
