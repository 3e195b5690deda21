//! Redis Enterprise command implementations

use armctl_core::redis_enterprise::{
    create_cluster_and_wait, create_database_and_wait, delete_cluster_and_wait,
    delete_database_and_wait, list_clusters, list_keys, read_cluster, read_database,
    regenerate_key_and_wait, update_cluster_and_wait, update_database_and_wait, DEFAULT_TIMEOUT,
};
use azure_arm::redis_enterprise::{
    Cluster, ClusterProperties, ClusterUpdate, Database, DatabaseProperties, DatabaseUpdate,
    Persistence, Sku,
};
use azure_arm::resource_id::{
    RedisEnterpriseClusterId, RedisEnterpriseDatabaseId, ResourceGroupId,
};
use azure_arm::{ArmClient, RedisEnterpriseHandler};

use crate::cli::redis_enterprise::{
    ClusterCommands, CreateClusterArgs, CreateDatabaseArgs, DatabaseArgs, DatabaseCommands,
    DeleteDatabaseArgs, RedisEnterpriseCommands, RegenerateKeyArgs, UpdateClusterArgs,
    UpdateDatabaseArgs,
};
use crate::cli::{DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::{operation_spinner, print_accepted};
use crate::commands::tags_from;
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{print_output, OutputFormat};

/// Handle `armctl redis-enterprise <subcommand>`.
pub async fn handle(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: RedisEnterpriseCommands,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        RedisEnterpriseCommands::Cluster { command } => match command {
            ClusterCommands::Create(args) => create_cluster(&client, args, output_format).await,
            ClusterCommands::Show(args) => show_cluster(&client, args, output_format).await,
            ClusterCommands::Update(args) => update_cluster(&client, args, output_format).await,
            ClusterCommands::Delete(args) => delete_cluster(&client, args, output_format).await,
            ClusterCommands::List(args) => list_cluster_cmd(&client, args, output_format).await,
        },
        RedisEnterpriseCommands::Database { command } => match command {
            DatabaseCommands::Create(args) => create_database(&client, args, output_format).await,
            DatabaseCommands::Show(args) => show_database(&client, args, output_format).await,
            DatabaseCommands::Update(args) => update_database(&client, args, output_format).await,
            DatabaseCommands::Delete(args) => delete_database(&client, args, output_format).await,
            DatabaseCommands::List {
                cluster,
                resource_group,
            } => list_databases(&client, &cluster, &resource_group, output_format).await,
            DatabaseCommands::ListKeys(args) => show_keys(&client, args, output_format).await,
            DatabaseCommands::RegenerateKey(args) => {
                regenerate_key(&client, args, output_format).await
            }
        },
    }
}

fn database_id(client: &ArmClient, args: &DatabaseArgs) -> RedisEnterpriseDatabaseId {
    RedisEnterpriseDatabaseId::new(
        client.subscription_id(),
        &args.resource_group,
        &args.cluster,
        &args.name,
    )
}

async fn create_cluster(
    client: &ArmClient,
    args: CreateClusterArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = RedisEnterpriseClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    let cluster = Cluster {
        id: None,
        name: None,
        resource_type: None,
        location: args.location,
        sku: Sku {
            name: args.sku,
            capacity: args.capacity,
        },
        zones: if args.zones.is_empty() {
            None
        } else {
            Some(args.zones)
        },
        tags: tags_from(&args.tags),
        properties: args.minimum_tls_version.map(|version| ClusterProperties {
            minimum_tls_version: Some(version),
            ..Default::default()
        }),
    };

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.create_cluster(&id, &cluster).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        create_cluster_and_wait(client, &id, &cluster, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(created) => {
            if output_format.is_human() {
                println!("Cluster '{}' is running.", id.name);
                if let Some(host) = created.properties.as_ref().and_then(|p| p.host_name.as_ref())
                {
                    println!("Hostname: {host}");
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
    let id = RedisEnterpriseClusterId::new(client.subscription_id(), &args.resource_group, &args.name);
    match read_cluster(client, &id).await? {
        Some(cluster) => print_output(cluster, output_format),
        None => Err(ArmCtlError::NotFound {
            what: format!(
                "Redis Enterprise cluster '{}' in resource group '{}'",
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
    if args.capacity.is_some() && args.sku.is_none() {
        return Err(ArmCtlError::InvalidInput {
            message: "--capacity requires --sku".to_string(),
        });
    }
    let update = ClusterUpdate {
        sku: args.sku.map(|name| Sku {
            name,
            capacity: args.capacity,
        }),
        tags: tags_from(&args.tags),
    };
    if update.sku.is_none() && update.tags.is_none() {
        return Err(ArmCtlError::InvalidInput {
            message: "nothing to update; pass --sku and/or --tag".to_string(),
        });
    }

    let id = RedisEnterpriseClusterId::new(client.subscription_id(), &args.resource_group, &args.name);

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.update_cluster(&id, &update).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Update of cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        update_cluster_and_wait(client, &id, &update, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(updated) => {
            if output_format.is_human() {
                println!("Cluster '{}' updated.", id.name);
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
    let id = RedisEnterpriseClusterId::new(client.subscription_id(), &args.resource_group, &args.name);

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.delete_cluster(&id).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Deletion of cluster '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result = delete_cluster_and_wait(client, &id, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(()) => {
            if output_format.is_human() {
                println!("Cluster '{}' deleted.", id.name);
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

async fn create_database(
    client: &ArmClient,
    args: CreateDatabaseArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = database_id(client, &args.database);
    let persistence = match (args.aof_frequency, args.rdb_frequency) {
        (None, None) => None,
        (aof, rdb) => Some(Persistence {
            aof_enabled: Some(aof.is_some()),
            rdb_enabled: Some(rdb.is_some()),
            aof_frequency: aof,
            rdb_frequency: rdb,
        }),
    };
    let database = Database {
        properties: DatabaseProperties {
            client_protocol: Some(args.client_protocol),
            port: args.port,
            clustering_policy: Some(args.clustering_policy),
            eviction_policy: Some(args.eviction_policy),
            persistence,
            modules: if args.modules.is_empty() {
                None
            } else {
                Some(args.modules)
            },
            ..Default::default()
        },
        ..Default::default()
    };

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.create_database(&id, &database).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Database '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        create_database_and_wait(client, &id, &database, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(created) => {
            if output_format.is_human() {
                println!("Database '{}' created in cluster '{}'.", id.name, id.cluster.name);
                if let Some(port) = created.properties.port {
                    println!("Port: {port}");
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

async fn show_database(
    client: &ArmClient,
    args: DatabaseArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = database_id(client, &args);
    match read_database(client, &id).await? {
        Some(database) => print_output(database, output_format),
        None => Err(ArmCtlError::NotFound {
            what: format!(
                "database '{}' in cluster '{}' (resource group '{}')",
                id.name, id.cluster.name, id.cluster.resource_group
            ),
        }),
    }
}

async fn update_database(
    client: &ArmClient,
    args: UpdateDatabaseArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let persistence = match (args.aof_frequency, args.rdb_frequency) {
        (None, None) => None,
        (aof, rdb) => Some(Persistence {
            aof_enabled: Some(aof.is_some()),
            rdb_enabled: Some(rdb.is_some()),
            aof_frequency: aof,
            rdb_frequency: rdb,
        }),
    };
    let update = DatabaseUpdate {
        properties: DatabaseProperties {
            client_protocol: args.client_protocol,
            eviction_policy: args.eviction_policy,
            persistence,
            ..Default::default()
        },
    };

    let id = database_id(client, &args.database);

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.update_database(&id, &update).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Update of database '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        update_database_and_wait(client, &id, &update, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(updated) => {
            if output_format.is_human() {
                println!("Database '{}' updated.", id.name);
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

async fn delete_database(
    client: &ArmClient,
    args: DeleteDatabaseArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = database_id(client, &args.database);

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler.delete_database(&id).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Deletion of database '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result = delete_database_and_wait(client, &id, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(()) => {
            if output_format.is_human() {
                println!("Database '{}' deleted.", id.name);
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn list_databases(
    client: &ArmClient,
    cluster: &str,
    resource_group: &str,
    output_format: OutputFormat,
) -> CliResult<()> {
    let handler = RedisEnterpriseHandler::new(client.clone());
    let id = RedisEnterpriseClusterId::new(client.subscription_id(), resource_group, cluster);
    let databases = handler.list_databases(&id).await?;
    print_output(databases, output_format)
}

async fn show_keys(
    client: &ArmClient,
    args: DatabaseArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = database_id(client, &args);
    let keys = list_keys(client, &id).await?;
    print_output(keys, output_format)
}

async fn regenerate_key(
    client: &ArmClient,
    args: RegenerateKeyArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = database_id(client, &args.database);

    if args.async_ops.no_wait {
        let handler = RedisEnterpriseHandler::new(client.clone());
        let operation = handler
            .regenerate_key(
                &id,
                &azure_arm::redis_enterprise::RegenerateKeyRequest {
                    key_type: args.key_type,
                },
            )
            .await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Key regeneration for database '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        regenerate_key_and_wait(client, &id, args.key_type, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback)
            .await;
    match result {
        Ok(keys) => {
            if output_format.is_human() {
                println!("Key regenerated for database '{}'.", id.name);
            }
            print_output(keys, output_format)
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}
