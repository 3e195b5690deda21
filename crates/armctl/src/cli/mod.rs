//! CLI structure and command definitions
//!
//! Defines the command-line interface using clap with a two-layer
//! architecture:
//! 1. Raw API access (`api` command)
//! 2. Typed per-service commands (`managed-app`, `redis-enterprise`,
//!    `openshift`)

use clap::{Args, Parser, Subcommand};

use azure_arm::managed_applications::ApplicationAuthorization;

use crate::commands::async_utils::AsyncOperationArgs;
use crate::output::OutputFormat;

pub mod managed_app;
pub mod openshift;
pub mod redis_enterprise;

/// Azure resource management CLI
#[derive(Parser, Debug)]
#[command(name = "armctl")]
#[command(
    version,
    about = "Manage Azure managed applications, Redis Enterprise, and OpenShift clusters"
)]
#[command(long_about = "
Manage Azure managed applications, Redis Enterprise clusters/databases, and
Red Hat OpenShift clusters through the Azure Resource Manager API.

EXAMPLES:
    # Set up a profile
    armctl profile set prod --subscription-id <SUB> --tenant-id <TENANT> \\
        --client-id <APP> --prompt-secret

    # Create a Redis Enterprise cluster and wait for it to come up
    armctl redis-enterprise cluster create cache-1 -g my-rg -l westeurope \\
        --sku Enterprise_E10 --capacity 2

    # Get JSON output for scripting
    armctl redis-enterprise cluster show cache-1 -g my-rg -o json

    # Direct API access
    armctl api get /subscriptions/<SUB>/resourceGroups/my-rg/providers/Microsoft.Cache/redisEnterprise \\
        --api-version 2024-02-01

For more help on a specific command, run:
    armctl <command> --help
")]
pub struct Cli {
    /// Profile to use for this command
    #[arg(long, short, global = true, env = "ARMCTL_PROFILE")]
    pub profile: Option<String>,

    /// Path to alternate configuration file
    #[arg(long, global = true, env = "ARMCTL_CONFIG_FILE")]
    pub config_file: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration profiles
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Raw ARM API access
    Api {
        #[arg(value_enum)]
        method: HttpMethod,
        /// ARM path, e.g. /subscriptions/.../providers/Microsoft.Cache/redisEnterprise
        path: String,
        /// api-version query parameter for the request
        #[arg(long)]
        api_version: String,
        /// JSON request body, inline or @file
        #[arg(long, short)]
        data: Option<String>,
    },
    /// Managed applications (Microsoft.Solutions)
    #[command(name = "managed-app")]
    ManagedApp {
        #[command(subcommand)]
        command: managed_app::ManagedAppCommands,
    },
    /// Redis Enterprise clusters and databases (Microsoft.Cache)
    #[command(name = "redis-enterprise")]
    RedisEnterprise {
        #[command(subcommand)]
        command: redis_enterprise::RedisEnterpriseCommands,
    },
    /// Azure Red Hat OpenShift clusters (Microsoft.RedHatOpenShift)
    Openshift {
        #[command(subcommand)]
        command: openshift::OpenshiftCommands,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum HttpMethod {
    Get,
    Put,
    Patch,
    Post,
    Delete,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Create or update a profile
    Set {
        name: String,
        #[arg(long)]
        subscription_id: Option<String>,
        #[arg(long)]
        tenant_id: Option<String>,
        #[arg(long)]
        client_id: Option<String>,
        /// Stored verbatim; use ${VAR} to reference an environment variable
        #[arg(long)]
        client_secret: Option<String>,
        /// Prompt for the client secret instead of passing it on the command line
        #[arg(long, conflicts_with = "client_secret")]
        prompt_secret: bool,
        /// Management endpoint override (sovereign clouds)
        #[arg(long)]
        management_url: Option<String>,
        /// Token authority override (sovereign clouds)
        #[arg(long)]
        authority_url: Option<String>,
        /// Also make this the default profile
        #[arg(long)]
        use_as_default: bool,
    },
    /// Show a profile (secret masked)
    Get { name: Option<String> },
    /// List configured profiles
    List,
    /// Remove a profile
    Remove { name: String },
    /// Set the default profile
    Default { name: String },
}

/// Positional name plus the resource group it lives in.
#[derive(Args, Debug)]
pub struct ResourceArgs {
    /// Resource name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
}

/// Listing scope.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
}

/// Delete target plus wait behavior.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

/// Parse `key=value` into a tag pair.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

/// Parse `principalId:roleDefinitionId` into an authorization.
pub fn parse_authorization(s: &str) -> Result<ApplicationAuthorization, String> {
    match s.split_once(':') {
        Some((principal, role)) if !principal.is_empty() && !role.is_empty() => {
            Ok(ApplicationAuthorization {
                principal_id: principal.to_string(),
                role_definition_id: role.to_string(),
            })
        }
        _ => Err(format!(
            "expected principalId:roleDefinitionId, got {s:?}"
        )),
    }
}
