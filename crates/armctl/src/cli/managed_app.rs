//! Subcommand definitions for `armctl managed-app`

use clap::{Args, Subcommand};

use azure_arm::managed_applications::{
    ApplicationAuthorization, ApplicationKind, ApplicationLockLevel,
};

use super::{parse_authorization, parse_key_val, DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::AsyncOperationArgs;

#[derive(Subcommand, Debug)]
pub enum ManagedAppCommands {
    /// Application definitions published to the service catalog
    Definition {
        #[command(subcommand)]
        command: DefinitionCommands,
    },
    /// Deploy a managed application
    Create(CreateApplicationArgs),
    /// Show a managed application
    Show(ResourceArgs),
    /// Replace the tags on a managed application
    Update(UpdateApplicationArgs),
    /// Delete a managed application
    Delete(DeleteArgs),
    /// List managed applications in a resource group
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
pub enum DefinitionCommands {
    /// Publish an application definition
    Create(CreateDefinitionArgs),
    /// Show an application definition
    Show(ResourceArgs),
    /// Delete an application definition
    Delete(DeleteArgs),
    /// List application definitions in a resource group
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateDefinitionArgs {
    /// Definition name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    /// Azure region
    #[arg(long, short = 'l')]
    pub location: String,
    /// Lock applied to managed resource groups: None, ReadOnly or CanNotDelete
    #[arg(long, default_value = "ReadOnly")]
    pub lock_level: ApplicationLockLevel,
    #[arg(long)]
    pub display_name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// principalId:roleDefinitionId granted on managed resource groups; repeatable
    #[arg(long = "authorization", value_parser = parse_authorization)]
    pub authorizations: Vec<ApplicationAuthorization>,
    /// URI of the .zip package holding mainTemplate.json and createUiDefinition.json
    #[arg(long)]
    pub package_file_uri: Option<String>,
    /// Inline main template JSON, inline or @file (alternative to --package-file-uri)
    #[arg(long)]
    pub main_template: Option<String>,
    /// Inline create UI definition JSON, inline or @file
    #[arg(long)]
    pub create_ui_definition: Option<String>,
    /// key=value tag; repeatable
    #[arg(long = "tag", value_parser = parse_key_val)]
    pub tags: Vec<(String, String)>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct CreateApplicationArgs {
    /// Application name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    /// Azure region
    #[arg(long, short = 'l')]
    pub location: String,
    /// ServiceCatalog or MarketPlace
    #[arg(long, default_value = "ServiceCatalog")]
    pub kind: ApplicationKind,
    /// Resource ID of the resource group the deployed resources land in
    #[arg(long)]
    pub managed_resource_group_id: String,
    /// Resource ID of the application definition (ServiceCatalog kind)
    #[arg(long)]
    pub definition_id: Option<String>,
    /// Deployment parameters JSON, inline or @file
    #[arg(long)]
    pub parameters: Option<String>,
    /// Marketplace plan name (MarketPlace kind)
    #[arg(long)]
    pub plan_name: Option<String>,
    #[arg(long)]
    pub plan_product: Option<String>,
    #[arg(long)]
    pub plan_publisher: Option<String>,
    #[arg(long)]
    pub plan_version: Option<String>,
    /// key=value tag; repeatable
    #[arg(long = "tag", value_parser = parse_key_val)]
    pub tags: Vec<(String, String)>,
    #[command(flatten)]
    pub async_ops: AsyncOperationArgs,
}

#[derive(Args, Debug)]
pub struct UpdateApplicationArgs {
    /// Application name
    pub name: String,
    /// Resource group name
    #[arg(long, short = 'g')]
    pub resource_group: String,
    /// key=value tag; repeatable, replaces the existing tag set
    #[arg(long = "tag", value_parser = parse_key_val, required = true)]
    pub tags: Vec<(String, String)>,
}
