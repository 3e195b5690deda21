//! # azure-arm
//!
//! Typed client bindings for the Azure Resource Manager REST API, covering
//! the services armctl manages: Managed Applications (`Microsoft.Solutions`),
//! Redis Enterprise (`Microsoft.Cache/redisEnterprise`), and Azure Red Hat
//! OpenShift (`Microsoft.RedHatOpenShift`).
//!
//! The crate provides:
//!
//! - [`ArmClient`] - an authenticated HTTP client that stamps every request
//!   with a bearer token and an `api-version` query parameter
//! - [`resource_id`] - typed hierarchical resource IDs with parse/format
//! - [`lro`] - the long-running-operation protocol (`Azure-AsyncOperation`
//!   and `Location` header polling)
//! - one handler module per service with request/response models
//!
//! # Example
//!
//! ```rust,ignore
//! use azure_arm::{ArmClient, RedisEnterpriseHandler};
//! use azure_arm::auth::ClientSecretCredential;
//! use azure_arm::resource_id::RedisEnterpriseClusterId;
//!
//! let credential = ClientSecretCredential::new(tenant_id, client_id, client_secret);
//! let client = ArmClient::builder()
//!     .subscription_id(subscription_id)
//!     .credential(credential)
//!     .build()?;
//!
//! let handler = RedisEnterpriseHandler::new(client.clone());
//! let id = RedisEnterpriseClusterId::new(client.subscription_id(), "my-rg", "my-cluster");
//! let cluster = handler.get_cluster(&id).await?;
//! ```

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub mod auth;
mod error;
pub mod lro;
pub mod managed_applications;
pub mod openshift;
pub mod redis_enterprise;
pub mod resource_id;

#[cfg(feature = "testing")]
pub mod testing;

pub use error::{ArmError, Result};
pub use lro::{Operation, OperationStatus, ProvisioningState};
pub use managed_applications::ManagedApplicationsHandler;
pub use openshift::OpenShiftClustersHandler;
pub use redis_enterprise::RedisEnterpriseHandler;

use auth::TokenCredential;

/// Default management endpoint for the public cloud.
pub const DEFAULT_BASE_URL: &str = "https://management.azure.com";

/// A successful response from the management API.
///
/// Handlers need the status code and headers as well as the body: LRO
/// acceptance is signalled by `202` plus operation headers.
#[derive(Debug)]
pub(crate) struct ArmResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Value,
}

/// One page of an ARM collection response.
#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    #[serde(rename = "nextLink")]
    next_link: Option<String>,
}

/// Authenticated client for the Azure Resource Manager API.
///
/// Cheap to clone; handlers take a clone and share the underlying
/// connection pool and credential cache.
#[derive(Clone)]
pub struct ArmClient {
    http: reqwest::Client,
    base_url: Url,
    subscription_id: String,
    credential: Arc<dyn TokenCredential>,
}

impl std::fmt::Debug for ArmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmClient")
            .field("base_url", &self.base_url.as_str())
            .field("subscription_id", &self.subscription_id)
            .finish_non_exhaustive()
    }
}

impl ArmClient {
    /// Start building a client.
    pub fn builder() -> ArmClientBuilder {
        ArmClientBuilder::default()
    }

    /// The subscription this client operates in.
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// The management endpoint this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request_url(&self, path: &str, api_version: &str) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        url.query_pairs_mut().append_pair("api-version", api_version);
        Ok(url)
    }

    /// Send a request to an absolute URL. Used for `nextLink` pagination and
    /// LRO status polling, where the service hands back complete URLs.
    pub(crate) async fn send_url(
        &self,
        method: Method,
        url: Url,
        body: Option<&Value>,
    ) -> Result<ArmResponse> {
        let token = self.credential.token().await?;
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token.secret());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let text = response.text().await?;
        tracing::debug!(%method, url = %url, status = %status.as_u16(), "arm request");

        if !status.is_success() {
            return Err(ArmError::from_response(status, &text));
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ArmResponse {
            status,
            headers,
            body,
        })
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> Result<ArmResponse> {
        let url = self.request_url(path, api_version)?;
        self.send_url(method, url, body).await
    }

    /// GET a resource and deserialize the body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<T> {
        let response = self.send(Method::GET, path, api_version, None).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// POST an action endpoint (`listKeys`, `listCredentials`, ...) and
    /// deserialize the body.
    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let response = self.send(Method::POST, path, api_version, body).await?;
        Ok(serde_json::from_value(response.body)?)
    }

    /// Issue a mutating request and capture the long-running-operation
    /// handle from the response headers.
    pub(crate) async fn begin(
        &self,
        method: Method,
        path: &str,
        api_version: &str,
        body: Option<&Value>,
    ) -> Result<Operation> {
        let response = self.send(method, path, api_version, body).await?;
        Operation::from_response(&response)
    }

    /// List an ARM collection, following `nextLink` until exhausted.
    pub(crate) async fn list_paged<T: DeserializeOwned>(
        &self,
        path: &str,
        api_version: &str,
    ) -> Result<Vec<T>> {
        let mut url = self.request_url(path, api_version)?;
        let mut items = Vec::new();
        loop {
            let response = self.send_url(Method::GET, url, None).await?;
            let page: Page<T> = serde_json::from_value(response.body)?;
            items.extend(page.value);
            match page.next_link {
                Some(link) => url = Url::parse(&link)?,
                None => break,
            }
        }
        Ok(items)
    }

    // Raw access, used by the CLI's `api` command.

    /// GET an arbitrary ARM path.
    pub async fn get_raw(&self, path: &str, api_version: &str) -> Result<Value> {
        let response = self.send(Method::GET, path, api_version, None).await?;
        Ok(response.body)
    }

    /// PUT an arbitrary ARM path.
    pub async fn put_raw(&self, path: &str, api_version: &str, body: Value) -> Result<Value> {
        let response = self
            .send(Method::PUT, path, api_version, Some(&body))
            .await?;
        Ok(response.body)
    }

    /// PATCH an arbitrary ARM path.
    pub async fn patch_raw(&self, path: &str, api_version: &str, body: Value) -> Result<Value> {
        let response = self
            .send(Method::PATCH, path, api_version, Some(&body))
            .await?;
        Ok(response.body)
    }

    /// POST an arbitrary ARM path.
    pub async fn post_raw(
        &self,
        path: &str,
        api_version: &str,
        body: Option<Value>,
    ) -> Result<Value> {
        let response = self
            .send(Method::POST, path, api_version, body.as_ref())
            .await?;
        Ok(response.body)
    }

    /// DELETE an arbitrary ARM path.
    pub async fn delete_raw(&self, path: &str, api_version: &str) -> Result<Value> {
        let response = self.send(Method::DELETE, path, api_version, None).await?;
        Ok(response.body)
    }
}

/// Builder for [`ArmClient`].
#[derive(Default)]
pub struct ArmClientBuilder {
    base_url: Option<String>,
    subscription_id: Option<String>,
    user_agent: Option<String>,
    credential: Option<Arc<dyn TokenCredential>>,
}

impl ArmClientBuilder {
    /// Management endpoint, defaults to [`DEFAULT_BASE_URL`].
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Subscription the client operates in. Required.
    pub fn subscription_id(mut self, subscription_id: impl Into<String>) -> Self {
        self.subscription_id = Some(subscription_id.into());
        self
    }

    /// User agent header, defaults to `azure-arm/<version>`.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Token credential used to authorize requests. Required.
    pub fn credential(mut self, credential: impl TokenCredential + 'static) -> Self {
        self.credential = Some(Arc::new(credential));
        self
    }

    /// Shared token credential used to authorize requests.
    pub fn credential_arc(mut self, credential: Arc<dyn TokenCredential>) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn build(self) -> Result<ArmClient> {
        let base_url = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        // A trailing slash makes Url::join treat the endpoint as a directory.
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        let subscription_id = self
            .subscription_id
            .ok_or_else(|| ArmError::InvalidConfiguration("subscription_id is required".into()))?;
        let credential = self
            .credential
            .ok_or_else(|| ArmError::InvalidConfiguration("credential is required".into()))?;
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| concat!("azure-arm/", env!("CARGO_PKG_VERSION")).to_string());

        let http = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(ArmClient {
            http,
            base_url,
            subscription_id,
            credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenCredential;

    #[test]
    fn builder_requires_subscription() {
        let err = ArmClient::builder()
            .credential(StaticTokenCredential::new("token"))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("subscription_id"));
    }

    #[test]
    fn builder_requires_credential() {
        let err = ArmClient::builder()
            .subscription_id("sub")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("credential"));
    }

    #[test]
    fn request_url_appends_api_version() {
        let client = ArmClient::builder()
            .subscription_id("sub")
            .credential(StaticTokenCredential::new("token"))
            .build()
            .unwrap();
        let url = client
            .request_url("/subscriptions/sub/resourceGroups/rg", "2024-02-01")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://management.azure.com/subscriptions/sub/resourceGroups/rg?api-version=2024-02-01"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ArmClient::builder()
            .base_url("https://example.invalid///")
            .subscription_id("sub")
            .credential(StaticTokenCredential::new("token"))
            .build()
            .unwrap();
        let url = client.request_url("a/b", "2021-07-01").unwrap();
        assert_eq!(url.as_str(), "https://example.invalid/a/b?api-version=2021-07-01");
    }
}
