//! Token credentials for the management API
//!
//! Every request carries a bearer token. [`ClientSecretCredential`]
//! implements the OAuth2 client-credentials flow against the Entra ID token
//! endpoint and caches the token until close to expiry.
//! [`StaticTokenCredential`] wraps a pre-acquired token (CI pipelines,
//! tests).

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use url::Url;

use crate::error::{ArmError, Result};

/// Default authority host for the public cloud.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Default token scope for the management endpoint.
pub const DEFAULT_SCOPE: &str = "https://management.azure.com/.default";

/// Tokens are refreshed this long before their reported expiry.
const EXPIRY_LEEWAY_SECS: i64 = 120;

/// A bearer token with its expiry time.
#[derive(Debug, Clone)]
pub struct AccessToken {
    secret: String,
    expires_on: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_on: DateTime<Utc>) -> Self {
        Self {
            secret: secret.into(),
            expires_on,
        }
    }

    /// The raw token value.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn expires_on(&self) -> DateTime<Utc> {
        self.expires_on
    }

    /// True once the token is within the refresh leeway of its expiry.
    pub fn is_expired(&self) -> bool {
        Utc::now() + Duration::seconds(EXPIRY_LEEWAY_SECS) >= self.expires_on
    }
}

/// Source of bearer tokens for [`crate::ArmClient`].
#[async_trait]
pub trait TokenCredential: Send + Sync {
    /// Return a token valid for the management scope.
    async fn token(&self) -> Result<AccessToken>;
}

/// A fixed, pre-acquired token.
#[derive(Debug, Clone)]
pub struct StaticTokenCredential {
    secret: String,
}

impl StaticTokenCredential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl TokenCredential for StaticTokenCredential {
    async fn token(&self) -> Result<AccessToken> {
        // The caller owns the token lifetime; report a generous expiry so
        // is_expired never triggers a refresh we cannot perform.
        Ok(AccessToken::new(
            self.secret.clone(),
            Utc::now() + Duration::hours(1),
        ))
    }
}

/// Wire shape of the token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// OAuth2 client-credentials flow against
/// `{authority}/{tenant}/oauth2/v2.0/token`.
pub struct ClientSecretCredential {
    http: reqwest::Client,
    authority: String,
    scope: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    cache: Mutex<Option<AccessToken>>,
}

impl std::fmt::Debug for ClientSecretCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretCredential")
            .field("authority", &self.authority)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

impl ClientSecretCredential {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            authority: DEFAULT_AUTHORITY.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cache: Mutex::new(None),
        }
    }

    /// Override the authority host (sovereign clouds, test servers).
    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    /// Override the token scope (sovereign cloud management endpoints).
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    fn token_url(&self) -> Result<Url> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority.trim_end_matches('/'),
            self.tenant_id
        );
        Ok(Url::parse(&url)?)
    }

    async fn fetch_token(&self) -> Result<AccessToken> {
        let url = self.token_url()?;
        tracing::debug!(tenant_id = %self.tenant_id, client_id = %self.client_id, "requesting token");

        let response = self
            .http
            .post(url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ArmError::Credential(format!(
                "token request failed with {}: {}",
                status.as_u16(),
                text.trim()
            )));
        }

        let token: TokenResponse = serde_json::from_str(&text)
            .map_err(|e| ArmError::Credential(format!("malformed token response: {e}")))?;
        Ok(AccessToken::new(
            token.access_token,
            Utc::now() + Duration::seconds(token.expires_in),
        ))
    }
}

#[async_trait]
impl TokenCredential for ClientSecretCredential {
    async fn token(&self) -> Result<AccessToken> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref() {
            if !token.is_expired() {
                return Ok(token.clone());
            }
        }
        let token = self.fetch_token().await?;
        *cache = Some(token.clone());
        Ok(token)
    }
}
