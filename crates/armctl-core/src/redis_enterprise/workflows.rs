//! Redis Enterprise workflows - CRUD with completion waiting
//!
//! Cluster creation is two-phase: the ARM operation reaches `Succeeded`
//! while the cluster's own `resourceState` can still be `Creating`, so the
//! create workflow follows the LRO with a [`StateWaiter`] on
//! `resourceState` until the cluster reports `Running`.

use std::time::Duration;

use azure_arm::redis_enterprise::{
    AccessKeys, Cluster, ClusterUpdate, Database, DatabaseUpdate, KeyType, RegenerateKeyRequest,
    ResourceState,
};
use azure_arm::resource_id::{
    RedisEnterpriseClusterId, RedisEnterpriseDatabaseId, ResourceGroupId,
};
use azure_arm::{ArmClient, RedisEnterpriseHandler};

use crate::error::{CoreError, Result};
use crate::progress::{poll_operation, ProgressCallback};
use crate::wait::StateWaiter;

/// Default timeout for Redis Enterprise operations (30 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default polling interval (10 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

fn cluster_context(verb: &str, id: &RedisEnterpriseClusterId) -> String {
    format!(
        "{verb} Redis Enterprise cluster {:?} in resource group {:?}",
        id.name, id.resource_group
    )
}

fn database_context(verb: &str, id: &RedisEnterpriseDatabaseId) -> String {
    format!(
        "{verb} database {:?} in Redis Enterprise cluster {:?} (resource group {:?})",
        id.name, id.cluster.name, id.cluster.resource_group
    )
}

/// Current `resourceState` of a cluster, for the state waiter.
async fn cluster_resource_state(
    handler: &RedisEnterpriseHandler,
    id: &RedisEnterpriseClusterId,
) -> Result<ResourceState> {
    let cluster = handler.get_cluster(id).await.map_err(CoreError::from)?;
    Ok(cluster
        .properties
        .and_then(|p| p.resource_state)
        .unwrap_or(ResourceState::Other("Unknown".to_string())))
}

/// Create a cluster and wait until it is `Running`.
///
/// 1. Submits the PUT (returns an operation)
/// 2. Polls the operation until completion
/// 3. Waits for `resourceState` to reach `Running`
/// 4. Fetches and returns the cluster
pub async fn create_cluster_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseClusterId,
    cluster: &Cluster,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Cluster> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = handler
        .create_cluster(id, cluster)
        .await
        .map_err(|e| CoreError::from(e).with_context(cluster_context("creating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("create cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(cluster_context("creating", id)))?;

    StateWaiter::new(vec![ResourceState::Running])
        .pending(vec![
            ResourceState::Creating,
            ResourceState::Updating,
            ResourceState::Enabling,
            ResourceState::Scaling,
        ])
        .timeout(timeout)
        .interval(DEFAULT_INTERVAL)
        .wait(|| cluster_resource_state(&handler, id))
        .await
        .map_err(|e| e.with_context(cluster_context("creating", id)))?;

    handler
        .get_cluster(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(cluster_context("creating", id)))
}

/// Read a cluster, mapping 404 to `None`.
pub async fn read_cluster(
    client: &ArmClient,
    id: &RedisEnterpriseClusterId,
) -> Result<Option<Cluster>> {
    let handler = RedisEnterpriseHandler::new(client.clone());
    match handler.get_cluster(id).await {
        Ok(cluster) => Ok(Some(cluster)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(CoreError::from(e).with_context(cluster_context("reading", id))),
    }
}

/// Update a cluster (sku, tags) and wait until it settles back to `Running`.
pub async fn update_cluster_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseClusterId,
    update: &ClusterUpdate,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Cluster> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = handler
        .update_cluster(id, update)
        .await
        .map_err(|e| CoreError::from(e).with_context(cluster_context("updating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("update cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(cluster_context("updating", id)))?;

    StateWaiter::new(vec![ResourceState::Running])
        .pending(vec![ResourceState::Updating, ResourceState::Scaling])
        .timeout(timeout)
        .interval(DEFAULT_INTERVAL)
        .wait(|| cluster_resource_state(&handler, id))
        .await
        .map_err(|e| e.with_context(cluster_context("updating", id)))?;

    handler
        .get_cluster(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(cluster_context("updating", id)))
}

/// Delete a cluster and wait for completion. Deleting an absent cluster is
/// success.
pub async fn delete_cluster_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseClusterId,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = match handler.delete_cluster(id).await {
        Ok(operation) => operation,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(CoreError::from(e).with_context(cluster_context("deleting", id))),
    };

    poll_operation(
        client,
        operation,
        &format!("delete cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(cluster_context("deleting", id)))
}

/// List the clusters in a resource group.
pub async fn list_clusters(
    client: &ArmClient,
    resource_group: &ResourceGroupId,
) -> Result<Vec<Cluster>> {
    let handler = RedisEnterpriseHandler::new(client.clone());
    handler.list_clusters(resource_group).await.map_err(|e| {
        CoreError::from(e).with_context(format!(
            "listing Redis Enterprise clusters in resource group {:?}",
            resource_group.resource_group
        ))
    })
}

/// Create a database and wait for completion.
pub async fn create_database_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseDatabaseId,
    database: &Database,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Database> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = handler
        .create_database(id, database)
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("creating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("create database {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(database_context("creating", id)))?;

    handler
        .get_database(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("creating", id)))
}

/// Read a database, mapping 404 to `None`.
pub async fn read_database(
    client: &ArmClient,
    id: &RedisEnterpriseDatabaseId,
) -> Result<Option<Database>> {
    let handler = RedisEnterpriseHandler::new(client.clone());
    match handler.get_database(id).await {
        Ok(database) => Ok(Some(database)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(CoreError::from(e).with_context(database_context("reading", id))),
    }
}

/// Update a database and wait for completion.
pub async fn update_database_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseDatabaseId,
    update: &DatabaseUpdate,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Database> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = handler
        .update_database(id, update)
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("updating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("update database {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(database_context("updating", id)))?;

    handler
        .get_database(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("updating", id)))
}

/// Delete a database and wait for completion. Deleting an absent database
/// is success.
pub async fn delete_database_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseDatabaseId,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = match handler.delete_database(id).await {
        Ok(operation) => operation,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(CoreError::from(e).with_context(database_context("deleting", id))),
    };

    poll_operation(
        client,
        operation,
        &format!("delete database {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(database_context("deleting", id)))
}

/// Fetch a database's access keys.
pub async fn list_keys(client: &ArmClient, id: &RedisEnterpriseDatabaseId) -> Result<AccessKeys> {
    let handler = RedisEnterpriseHandler::new(client.clone());
    handler
        .list_keys(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("listing keys for", id)))
}

/// Regenerate one access key, wait for the operation, and return the fresh
/// key pair.
pub async fn regenerate_key_and_wait(
    client: &ArmClient,
    id: &RedisEnterpriseDatabaseId,
    key_type: KeyType,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<AccessKeys> {
    let handler = RedisEnterpriseHandler::new(client.clone());

    let operation = handler
        .regenerate_key(id, &RegenerateKeyRequest { key_type })
        .await
        .map_err(|e| CoreError::from(e).with_context(database_context("regenerating key for", id)))?;

    poll_operation(
        client,
        operation,
        &format!("regenerate key for database {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(database_context("regenerating key for", id)))?;

    list_keys(client, id).await
}
