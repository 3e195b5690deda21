//! OpenShift cluster command implementations

use armctl_core::openshift::{
    admin_kubeconfig, cluster_credentials, create_cluster_and_wait, delete_cluster_and_wait,
    list_clusters, read_cluster, update_cluster_and_wait, DEFAULT_TIMEOUT,
};
use azure_arm::openshift::{
    ApiServerProfile, ClusterProfile, FipsValidatedModules, IngressProfile, MasterProfile,
    NetworkProfile, OpenShiftCluster, OpenShiftClusterProperties, OpenShiftClusterUpdate,
    ServicePrincipalProfile, WorkerProfile,
};
use azure_arm::resource_id::{OpenShiftClusterId, ResourceGroupId};
use azure_arm::{ArmClient, OpenShiftClustersHandler};

use crate::cli::openshift::{
    ClusterCommands, CreateClusterArgs, OpenshiftCommands, UpdateClusterArgs,
};
use crate::cli::{DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::{operation_spinner, print_accepted};
use crate::commands::{read_text_arg, tags_from};
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{print_output, OutputFormat};

/// Handle `armctl openshift <subcommand>`.
pub async fn handle(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: OpenshiftCommands,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;
    let OpenshiftCommands::Cluster { command } = command;

    match command {
        ClusterCommands::Create(args) => create_cluster(&client, args, output_format).await,
        ClusterCommands::Show(args) => show_cluster(&client, args, output_format).await,
        ClusterCommands::Update(args) => update_cluster(&client, args, output_format).await,
        ClusterCommands::Delete(args) => delete_cluster(&client, args, output_format).await,
        ClusterCommands::List(args) => list_cluster_cmd(&client, args, output_format).await,
        ClusterCommands::ListCredentials(args) => {
            show_credentials(&client, args, output_format).await
        }
        ClusterCommands::AdminKubeconfig(args) => {
            show_admin_kubeconfig(&client, args, output_format).await
        }
    }
}

async fn create_cluster(
    client: &ArmClient,
    args: CreateClusterArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);

    // The infrastructure resource group must differ from the cluster's own.
    let cluster_resource_group_id = args.cluster_resource_group_id.unwrap_or_else(|| {
        format!(
            "/subscriptions/{}/resourceGroups/aro-{}",
            client.subscription_id(),
            args.name
        )
    });
    let pull_secret = args
        .pull_secret
        .as_deref()
        .map(read_text_arg)
        .transpose()?;

    let cluster = OpenShiftCluster {
        location: args.location,
        tags: tags_from(&args.tags),
        properties: OpenShiftClusterProperties {
            cluster_profile: Some(ClusterProfile {
                pull_secret,
                domain: args.domain,
                version: args.cluster_version,
                resource_group_id: Some(cluster_resource_group_id),
                fips_validated_modules: Some(if args.fips {
                    FipsValidatedModules::Enabled
                } else {
                    FipsValidatedModules::Disabled
                }),
            }),
            service_principal_profile: Some(ServicePrincipalProfile {
                client_id: Some(args.sp_client_id),
                client_secret: Some(args.sp_client_secret),
            }),
            network_profile: Some(NetworkProfile {
                pod_cidr: Some(args.pod_cidr),
                service_cidr: Some(args.service_cidr),
                outbound_type: Some(args.outbound_type),
            }),
            master_profile: Some(MasterProfile {
                vm_size: Some(args.master_vm_size),
                subnet_id: Some(args.master_subnet_id),
                ..Default::default()
            }),
            worker_profiles: Some(vec![WorkerProfile {
                name: Some("worker".to_string()),
                vm_size: Some(args.worker_vm_size),
                disk_size_gb: Some(args.worker_disk_size_gb),
                subnet_id: Some(args.worker_subnet_id),
                count: Some(args.worker_count),
                ..Default::default()
            }]),
            apiserver_profile: Some(ApiServerProfile {
                visibility: Some(args.apiserver_visibility),
                ..Default::default()
            }),
            ingress_profiles: Some(vec![IngressProfile {
                name: Some("default".to_string()),
                visibility: Some(args.ingress_visibility),
                ip: None,
            }]),
            ..Default::default()
        },
        ..Default::default()
    };

    if args.async_ops.no_wait {
        let handler = OpenShiftClustersHandler::new(client.clone());
        let operation = handler.create_or_update(&id, &cluster).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("OpenShift cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        create_cluster_and_wait(client, &id, &cluster, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(created) => {
            if output_format.is_human() {
                println!("OpenShift cluster '{}' created.", id.name);
                if let Some(url) = created
                    .properties
                    .console_profile
                    .as_ref()
                    .and_then(|p| p.url.as_ref())
                {
                    println!("Console: {url}");
                }
                Ok(())
            } else {
                print_output(created, output_format)
            }
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn show_cluster(
    client: &ArmClient,
    args: ResourceArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    match read_cluster(client, &id).await? {
        Some(cluster) => print_output(cluster, output_format),
        None => Err(ArmCtlError::NotFound {
            what: format!(
                "OpenShift cluster '{}' in resource group '{}'",
                id.name, id.resource_group
            ),
        }),
    }
}

async fn update_cluster(
    client: &ArmClient,
    args: UpdateClusterArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    let update = OpenShiftClusterUpdate {
        tags: tags_from(&args.tags),
    };

    if args.async_ops.no_wait {
        let handler = OpenShiftClustersHandler::new(client.clone());
        let operation = handler.update(&id, &update).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Update of OpenShift cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        update_cluster_and_wait(client, &id, &update, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(updated) => {
            if output_format.is_human() {
                println!("OpenShift cluster '{}' updated.", id.name);
                Ok(())
            } else {
                print_output(updated, output_format)
            }
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn delete_cluster(
    client: &ArmClient,
    args: DeleteArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);

    if args.async_ops.no_wait {
        let handler = OpenShiftClustersHandler::new(client.clone());
        let operation = handler.delete(&id).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Deletion of OpenShift cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result = delete_cluster_and_wait(client, &id, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(()) => {
            if output_format.is_human() {
                println!("OpenShift cluster '{}' deleted.", id.name);
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn list_cluster_cmd(
    client: &ArmClient,
    args: ListArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let resource_group = ResourceGroupId::new(client.subscription_id(), &args.resource_group);
    let clusters = list_clusters(client, &resource_group).await?;
    print_output(clusters, output_format)
}

async fn show_credentials(
    client: &ArmClient,
    args: ResourceArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    let credentials = cluster_credentials(client, &id).await?;
    print_output(credentials, output_format)
}

async fn show_admin_kubeconfig(
    client: &ArmClient,
    args: ResourceArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = OpenShiftClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    let kubeconfig = admin_kubeconfig(client, &id).await?;
    print_output(kubeconfig, output_format)
}
