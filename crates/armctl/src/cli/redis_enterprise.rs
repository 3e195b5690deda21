//! Subcommand definitions for `armctl redis-enterprise`

use clap::{Args, Subcommand};

use azure_arm::redis_enterprise::{
    AofFrequency, ClientProtocol, ClusteringPolicy, EvictionPolicy, KeyType, Module, RdbFrequency,
    SkuName,
};

use super::{parse_key_val, DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::AsyncOperationArgs;

#[derive(Subcommand, Debug)]
pub enum RedisEnterpriseCommands {
    /// Cluster operations
    Cluster {
        #[command(subcommand)]
        command: ClusterCommands,
    },
    /// Database operations
    Database {
        #[command(subcommand)]
        command: DatabaseCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Create a cluster and wait for it to reach Running
    Create(CreateClusterArgs),
    /// Show a cluster
    Show(ResourceArgs),
    /// Update a cluster's sku or tags
    Update(UpdateClusterArgs),
    /// Delete a cluster and its databases
    Delete(DeleteArgs),
    /// List clusters in a resource group
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateClusterArgs {
    /// Cluster name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    /// Azure region
    #[arg(long, short = 'l')]
    pub location: String,
    /// Sku, e.g. Enterprise_E10 or EnterpriseFlash_F300
    #[arg(long, default_value = "Enterprise_E10")]
    pub sku: SkuName,
    /// Sku capacity (2, 4, 6, ... for Enterprise; 3, 9 for Flash)
    #[arg(long)]
    pub capacity: Option<i32>,
    /// Availability zone; repeatable
    #[arg(long = "zone")]
    pub zones: Vec<String>,
    /// Minimum TLS version clients may use (1.0, 1.1, 1.2)
    #[arg(long)]
    pub minimum_tls_version: Option<String>,
    /// key=value tag; repeatable
    #[arg(long = "tag", value_parser = parse_key_val)]
    pub tags: Vec<(String, String)>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct UpdateClusterArgs {
    /// Cluster name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    #[arg(long)]
    pub sku: Option<SkuName>,
    #[arg(long)]
    pub capacity: Option<i32>,
    /// key=value tag; repeatable, replaces the existing tag set
    #[arg(long = "tag", value_parser = parse_key_val)]
    pub tags: Vec<(String, String)>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

/// Database coordinates: name, cluster, resource group.
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Database name (the service only allows "default")
    #[arg(default_value = "default")]
    pub name: String,
    /// Cluster the database belongs to
    #[arg(long)]
    pub cluster: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
}

#[derive(Subcommand, Debug)]
pub enum DatabaseCommands {
    /// Create a database in a cluster
    Create(CreateDatabaseArgs),
    /// Show a database
    Show(DatabaseArgs),
    /// Update a database's policies or persistence
    Update(UpdateDatabaseArgs),
    /// Delete a database
    Delete(DeleteDatabaseArgs),
    /// List databases in a cluster
    List {
        /// Cluster name
        #[arg(long)]
        cluster: String,
        /// Resource group name
        #[arg(long, short = 'g')]
        resource_group: String,
    },
    /// Show the database access keys
    ListKeys(DatabaseArgs),
    /// Roll one of the access keys
    RegenerateKey(RegenerateKeyArgs),
}

#[derive(Args, Debug)]
pub struct CreateDatabaseArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
    /// Encrypted (TLS) or Plaintext client access
    #[arg(long, default_value = "Encrypted")]
    pub client_protocol: ClientProtocol,
    /// TCP port the database listens on; service-assigned when omitted
    #[arg(long)]
    pub port: Option<i32>,
    /// EnterpriseCluster or OSSCluster
    #[arg(long, default_value = "EnterpriseCluster")]
    pub clustering_policy: ClusteringPolicy,
    #[arg(long, default_value = "VolatileLRU")]
    pub eviction_policy: EvictionPolicy,
    /// Module to enable, `name` or `name=args`; repeatable
    #[arg(long = "module", value_parser = parse_module)]
    pub modules: Vec<Module>,
    /// Enable AOF persistence at this cadence (1s or always)
    #[arg(long, conflicts_with = "rdb_frequency")]
    pub aof_frequency: Option<AofFrequency>,
    /// Enable RDB persistence at this cadence (1h, 6h or 12h)
    #[arg(long)]
    pub rdb_frequency: Option<RdbFrequency>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct UpdateDatabaseArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
    #[arg(long)]
    pub client_protocol: Option<ClientProtocol>,
    #[arg(long)]
    pub eviction_policy: Option<EvictionPolicy>,
    #[arg(long, conflicts_with = "rdb_frequency")]
    pub aof_frequency: Option<AofFrequency>,
    #[arg(long)]
    pub rdb_frequency: Option<RdbFrequency>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct DeleteDatabaseArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct RegenerateKeyArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
    /// Which key to roll: Primary or Secondary
    #[arg(long)]
    pub key_type: KeyType,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

/// Parse a module spec: `name` or `name=args`.
fn parse_module(s: &str) -> Result<Module, String> {
    let (name, args) = match s.split_once('=') {
        Some((name, args)) => (name.trim(), Some(args.trim().to_string())),
        None => (s.trim(), None),
    };
    if name.is_empty() {
        return Err(format!("expected module name or name=args, got {s:?}"));
    }
    Ok(Module {
        name: name.to_string(),
        args,
        version: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_module_with_and_without_args() {
        let module = parse_module("RedisJSON").unwrap();
        assert_eq!(module.name, "RedisJSON");
        assert!(module.args.is_none());

        let module = parse_module("RediSearch=PARTITIONS AUTO").unwrap();
        assert_eq!(module.name, "RediSearch");
        assert_eq!(module.args.as_deref(), Some("PARTITIONS AUTO"));

        assert!(parse_module("=args").is_err());
    }
}
