//! Profile storage
//!
//! Configuration lives in TOML with named profiles:
//!
//! ```toml
//! default_profile = "prod"
//!
//! [profiles.prod]
//! subscription_id = "00000000-0000-0000-0000-000000000000"
//! tenant_id = "11111111-1111-1111-1111-111111111111"
//! client_id = "22222222-2222-2222-2222-222222222222"
//! client_secret = "${ARMCTL_PROD_SECRET}"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct Config {
    /// Profile used when none is named on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    /// Map of profile name -> profile configuration
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

/// Individual profile configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Supports `${VAR}` expansion; resolve with [`Profile::resolved_client_secret`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Management endpoint override (sovereign clouds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_url: Option<String>,
    /// Token authority override (sovereign clouds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_url: Option<String>,
}

impl Profile {
    /// Client secret with `${VAR}` references expanded from the environment.
    pub fn resolved_client_secret(&self) -> Result<Option<String>> {
        match &self.client_secret {
            None => Ok(None),
            Some(raw) => {
                let expanded = shellexpand::env(raw)
                    .map_err(|e| ConfigError::EnvExpansionError(e.to_string()))?;
                Ok(Some(expanded.into_owned()))
            }
        }
    }
}

impl Config {
    /// Default config path: `<platform config dir>/armctl/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "armctl", "armctl")
            .ok_or(ConfigError::ConfigDirError)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load from the default path. A missing file yields the default config.
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::default_path()?)
    }

    /// Load from an explicit path. A missing file yields the default config;
    /// unreadable or unparsable files are errors.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadError {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::default_path()?)
    }

    /// Save to an explicit path, creating parent directories. On unix the
    /// file is restricted to the owner since it may hold secrets.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::SaveError {
                path: path.display().to_string(),
                source,
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(|source| ConfigError::SaveError {
            path: path.display().to_string(),
            source,
        })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound {
                name: name.to_string(),
            })
    }

    /// Resolve the profile to use: an explicit name, the configured default,
    /// or - when exactly one profile exists - that one.
    pub fn resolve_profile<'a>(&'a self, name: Option<&'a str>) -> Result<(&'a str, &'a Profile)> {
        if let Some(name) = name {
            return Ok((name, self.profile(name)?));
        }
        if let Some(default) = &self.default_profile {
            return Ok((default.as_str(), self.profile(default)?));
        }
        if self.profiles.len() == 1 {
            if let Some((name, profile)) = self.profiles.iter().next() {
                return Ok((name.as_str(), profile));
            }
        }
        Err(ConfigError::NoProfileConfigured)
    }

    /// Insert or replace a profile.
    pub fn set_profile(&mut self, name: impl Into<String>, profile: Profile) {
        self.profiles.insert(name.into(), profile);
    }

    /// Remove a profile; clears the default if it pointed at it. Returns
    /// whether the profile existed.
    pub fn remove_profile(&mut self, name: &str) -> bool {
        let removed = self.profiles.remove(name).is_some();
        if removed && self.default_profile.as_deref() == Some(name) {
            self.default_profile = None;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(subscription: &str) -> Profile {
        Profile {
            subscription_id: Some(subscription.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn resolve_explicit_name() {
        let mut config = Config::default();
        config.set_profile("prod", profile("sub-prod"));
        config.set_profile("dev", profile("sub-dev"));

        let (name, p) = config.resolve_profile(Some("dev")).unwrap();
        assert_eq!(name, "dev");
        assert_eq!(p.subscription_id.as_deref(), Some("sub-dev"));
    }

    #[test]
    fn resolve_falls_back_to_default_then_single() {
        let mut config = Config::default();
        config.set_profile("prod", profile("sub-prod"));
        config.set_profile("dev", profile("sub-dev"));
        config.default_profile = Some("prod".to_string());
        assert_eq!(config.resolve_profile(None).unwrap().0, "prod");

        let mut single = Config::default();
        single.set_profile("only", profile("sub-only"));
        assert_eq!(single.resolve_profile(None).unwrap().0, "only");
    }

    #[test]
    fn resolve_with_no_candidates_is_an_error() {
        let config = Config::default();
        assert!(matches!(
            config.resolve_profile(None),
            Err(ConfigError::NoProfileConfigured)
        ));

        let mut two = Config::default();
        two.set_profile("a", profile("s"));
        two.set_profile("b", profile("s"));
        assert!(two.resolve_profile(None).is_err());
    }

    #[test]
    fn remove_profile_clears_default() {
        let mut config = Config::default();
        config.set_profile("prod", profile("s"));
        config.default_profile = Some("prod".to_string());

        assert!(config.remove_profile("prod"));
        assert!(config.default_profile.is_none());
        assert!(!config.remove_profile("prod"));
    }

    #[test]
    fn client_secret_env_expansion() {
        std::env::set_var("ARMCTL_TEST_SECRET_VALUE", "s3cr3t");
        let p = Profile {
            client_secret: Some("${ARMCTL_TEST_SECRET_VALUE}".to_string()),
            ..Default::default()
        };
        assert_eq!(p.resolved_client_secret().unwrap().as_deref(), Some("s3cr3t"));

        let p = Profile {
            client_secret: Some("${ARMCTL_TEST_SECRET_UNSET_VALUE}".to_string()),
            ..Default::default()
        };
        assert!(p.resolved_client_secret().is_err());

        let p = Profile {
            client_secret: Some("literal".to_string()),
            ..Default::default()
        };
        assert_eq!(p.resolved_client_secret().unwrap().as_deref(), Some("literal"));
    }
}
