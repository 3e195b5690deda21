//! Profile management commands

use anyhow::Context;
use serde_json::{json, Value};

use armctl_core::Profile;

use crate::cli::ProfileCommands;
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{print_output, OutputFormat};

/// Handle `armctl profile <subcommand>`.
pub fn handle(
    mut conn_mgr: ConnectionManager,
    command: ProfileCommands,
    output_format: OutputFormat,
) -> CliResult<()> {
    match command {
        ProfileCommands::Set {
            name,
            subscription_id,
            tenant_id,
            client_id,
            client_secret,
            prompt_secret,
            management_url,
            authority_url,
            use_as_default,
        } => {
            // Merge into an existing profile so partial updates work.
            let mut profile = conn_mgr
                .config
                .profiles
                .get(&name)
                .cloned()
                .unwrap_or_default();

            if let Some(v) = subscription_id {
                profile.subscription_id = Some(v);
            }
            if let Some(v) = tenant_id {
                profile.tenant_id = Some(v);
            }
            if let Some(v) = client_id {
                profile.client_id = Some(v);
            }
            if prompt_secret {
                let secret =
                    rpassword::prompt_password("Client secret: ").context("Failed to read secret")?;
                profile.client_secret = Some(secret);
            } else if let Some(v) = client_secret {
                profile.client_secret = Some(v);
            }
            if let Some(v) = management_url {
                profile.management_url = Some(v);
            }
            if let Some(v) = authority_url {
                profile.authority_url = Some(v);
            }

            conn_mgr.config.set_profile(name.clone(), profile);
            if use_as_default || conn_mgr.config.profiles.len() == 1 {
                conn_mgr.config.default_profile = Some(name.clone());
            }
            conn_mgr.save_config()?;

            if output_format.is_human() {
                println!("Profile '{name}' saved.");
            }
            Ok(())
        }

        ProfileCommands::Get { name } => {
            let (resolved_name, profile) = conn_mgr.config.resolve_profile(name.as_deref())?;
            let is_default = conn_mgr.config.default_profile.as_deref() == Some(resolved_name);
            print_output(profile_row(resolved_name, profile, is_default), output_format)
        }

        ProfileCommands::List => {
            let mut names: Vec<_> = conn_mgr.config.profiles.keys().cloned().collect();
            names.sort();
            let rows: Vec<Value> = names
                .iter()
                .map(|name| {
                    let profile = &conn_mgr.config.profiles[name];
                    let is_default = conn_mgr.config.default_profile.as_deref() == Some(name);
                    profile_row(name, profile, is_default)
                })
                .collect();
            print_output(rows, output_format)
        }

        ProfileCommands::Remove { name } => {
            if !conn_mgr.config.remove_profile(&name) {
                return Err(ArmCtlError::ProfileNotFound { name });
            }
            conn_mgr.save_config()?;
            if output_format.is_human() {
                println!("Profile '{name}' removed.");
            }
            Ok(())
        }

        ProfileCommands::Default { name } => {
            conn_mgr.config.profile(&name)?;
            conn_mgr.config.default_profile = Some(name.clone());
            conn_mgr.save_config()?;
            if output_format.is_human() {
                println!("Default profile set to '{name}'.");
            }
            Ok(())
        }
    }
}

fn profile_row(name: &str, profile: &Profile, is_default: bool) -> Value {
    json!({
        "name": name,
        "default": is_default,
        "subscription_id": profile.subscription_id,
        "tenant_id": profile.tenant_id,
        "client_id": profile.client_id,
        "client_secret": profile.client_secret.as_ref().map(|_| "***"),
        "management_url": profile.management_url,
        "authority_url": profile.authority_url,
    })
}
