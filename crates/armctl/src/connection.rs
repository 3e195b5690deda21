//! Connection management: building authenticated ARM clients from profiles
//! and environment variables

use std::path::PathBuf;

use anyhow::Context;
use armctl_core::{Config, Profile};
use azure_arm::auth::{ClientSecretCredential, StaticTokenCredential};
use azure_arm::ArmClient;
use tracing::{debug, info};

use crate::error::{ArmCtlError, Result as CliResult};

/// User agent string for armctl HTTP requests
const ARMCTL_USER_AGENT: &str = concat!("armctl/", env!("CARGO_PKG_VERSION"));

/// Connection manager for creating authenticated clients
#[derive(Clone)]
pub struct ConnectionManager {
    pub config: Config,
    pub config_path: Option<PathBuf>,
}

impl ConnectionManager {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn with_config_path(config: Config, config_path: Option<PathBuf>) -> Self {
        Self {
            config,
            config_path,
        }
    }

    /// Save the configuration to the appropriate location
    pub fn save_config(&self) -> CliResult<()> {
        if let Some(ref path) = self.config_path {
            self.config
                .save_to_path(path)
                .context("Failed to save configuration")?;
        } else {
            self.config.save().context("Failed to save configuration")?;
        }
        Ok(())
    }

    /// Create an ARM client from profile credentials with environment
    /// variable override support.
    ///
    /// When --config-file is explicitly specified, environment variables are
    /// ignored to provide true configuration isolation ("explicit wins":
    /// CLI args > env vars > defaults).
    pub fn create_client(&self, profile_name: Option<&str>) -> CliResult<ArmClient> {
        debug!("Creating ARM client, profile: {:?}", profile_name);

        let use_env_vars = self.config_path.is_none();
        if !use_env_vars {
            info!("--config-file specified explicitly, ignoring environment variables");
        }
        let env = |name: &str| -> Option<String> {
            if use_env_vars {
                std::env::var(name).ok().filter(|v| !v.is_empty())
            } else {
                None
            }
        };

        // A profile is optional as long as the environment carries enough.
        let resolved = self.config.resolve_profile(profile_name);
        let (profile_label, profile): (String, Profile) = match resolved {
            Ok((name, profile)) => (name.to_string(), profile.clone()),
            Err(e) => {
                // Explicitly named profiles must exist.
                if profile_name.is_some() {
                    return Err(ArmCtlError::from(e));
                }
                debug!("no usable profile ({e}), relying on environment");
                ("<env>".to_string(), Profile::default())
            }
        };

        let subscription_id = env("AZURE_SUBSCRIPTION_ID")
            .or(profile.subscription_id.clone())
            .ok_or_else(|| ArmCtlError::MissingCredentials {
                message: format!(
                    "profile '{profile_label}' has no subscription_id and AZURE_SUBSCRIPTION_ID is unset"
                ),
            })?;

        let mut builder = ArmClient::builder()
            .subscription_id(subscription_id)
            .user_agent(ARMCTL_USER_AGENT);
        if let Some(url) = env("AZURE_MANAGEMENT_URL").or(profile.management_url.clone()) {
            builder = builder.base_url(url);
        }

        // A pre-acquired token short-circuits the client-credentials flow.
        if let Some(token) = env("AZURE_ACCESS_TOKEN") {
            debug!("using pre-acquired token from AZURE_ACCESS_TOKEN");
            return Ok(builder
                .credential(StaticTokenCredential::new(token))
                .build()?);
        }

        let tenant_id = env("AZURE_TENANT_ID").or(profile.tenant_id.clone());
        let client_id = env("AZURE_CLIENT_ID").or(profile.client_id.clone());
        let client_secret = match env("AZURE_CLIENT_SECRET") {
            Some(secret) => Some(secret),
            None => profile
                .resolved_client_secret()
                .map_err(ArmCtlError::from)?,
        };

        let (Some(tenant_id), Some(client_id), Some(client_secret)) =
            (tenant_id, client_id, client_secret)
        else {
            return Err(ArmCtlError::MissingCredentials {
                message: format!(
                    "profile '{profile_label}' needs tenant_id, client_id and client_secret \
                     (or export AZURE_TENANT_ID, AZURE_CLIENT_ID, AZURE_CLIENT_SECRET, \
                     or AZURE_ACCESS_TOKEN)"
                ),
            });
        };

        let mut credential = ClientSecretCredential::new(tenant_id, client_id, client_secret);
        if let Some(authority) = env("AZURE_AUTHORITY_URL").or(profile.authority_url.clone()) {
            credential = credential.with_authority(authority);
        }

        Ok(builder.credential(credential).build()?)
    }
}
