//! Subcommand definitions for `armctl openshift`

use clap::{Args, Subcommand};

use azure_arm::openshift::{OutboundType, Visibility};

use super::{parse_key_val, DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::AsyncOperationArgs;

#[derive(Subcommand, Debug)]
pub enum OpenshiftCommands {
    /// Cluster operations
    Cluster {
        #[command(subcommand)]
        command: ClusterCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Create a cluster; installs run for 35-45 minutes
    Create(CreateClusterArgs),
    /// Show a cluster
    Show(ResourceArgs),
    /// Replace the tags on a cluster
    Update(UpdateClusterArgs),
    /// Delete a cluster
    Delete(DeleteArgs),
    /// List clusters in a resource group
    List(ListArgs),
    /// Show the kubeadmin username and password
    ListCredentials(ResourceArgs),
    /// Show the admin kubeconfig (base64-encoded)
    AdminKubeconfig(ResourceArgs),
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
    /// DNS domain prefix for the cluster
    #[arg(long)]
    pub domain: Option<String>,
    /// OpenShift version, e.g. 4.14.16; service default when omitted
    #[arg(long = "cluster-version")]
    pub cluster_version: Option<String>,
    /// Resource ID of the resource group the cluster infrastructure lands in
    #[arg(long)]
    pub cluster_resource_group_id: Option<String>,
    /// Red Hat pull secret JSON, inline or @file
    #[arg(long)]
    pub pull_secret: Option<String>,
    /// Require FIPS-validated crypto modules
    #[arg(long)]
    pub fips: bool,
    /// Service principal the cluster runs as
    #[arg(long)]
    pub sp_client_id: String,
    /// Service principal secret
    #[arg(long, env = "ARMCTL_SP_CLIENT_SECRET")]
    pub sp_client_secret: String,
    #[arg(long, default_value = "10.128.0.0/14")]
    pub pod_cidr: String,
    #[arg(long, default_value = "172.30.0.0/16")]
    pub service_cidr: String,
    /// Loadbalancer or UserDefinedRouting
    #[arg(long, default_value = "Loadbalancer")]
    pub outbound_type: OutboundType,
    #[arg(long, default_value = "Standard_D8s_v3")]
    pub master_vm_size: String,
    /// Subnet resource ID for control plane nodes
    #[arg(long)]
    pub master_subnet_id: String,
    #[arg(long, default_value = "Standard_D4s_v3")]
    pub worker_vm_size: String,
    /// Subnet resource ID for worker nodes
    #[arg(long)]
    pub worker_subnet_id: String,
    #[arg(long, default_value = "3")]
    pub worker_count: i32,
    #[arg(long, default_value = "128")]
    pub worker_disk_size_gb: i32,
    /// Public or Private
    #[arg(long, default_value = "Public")]
    pub apiserver_visibility: Visibility,
    /// Public or Private
    #[arg(long, default_value = "Public")]
    pub ingress_visibility: Visibility,
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
    /// key=value tag; repeatable, replaces the existing tag set
    #[arg(long = "tag", value_parser = parse_key_val, required = true)]
    pub tags: Vec<(String, String)>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}
