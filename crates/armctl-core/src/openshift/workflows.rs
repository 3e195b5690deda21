//! OpenShift cluster workflows - CRUD with completion waiting
//!
//! ARO cluster installs routinely run for 35-45 minutes, so these default
//! to a much longer timeout than the other services.

use std::time::Duration;

use azure_arm::openshift::{
    OpenShiftCluster, OpenShiftClusterAdminKubeconfig, OpenShiftClusterCredentials,
    OpenShiftClusterUpdate,
};
use azure_arm::resource_id::{OpenShiftClusterId, ResourceGroupId};
use azure_arm::{ArmClient, OpenShiftClustersHandler};

use crate::error::{CoreError, Result};
use crate::progress::{poll_operation, ProgressCallback};

/// Default timeout for OpenShift cluster operations (90 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(90 * 60);

/// Default polling interval (30 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

fn context(verb: &str, id: &OpenShiftClusterId) -> String {
    format!(
        "{verb} OpenShift cluster {:?} in resource group {:?}",
        id.name, id.resource_group
    )
}

/// Create or update a cluster and wait for the install to complete.
pub async fn create_cluster_and_wait(
    client: &ArmClient,
    id: &OpenShiftClusterId,
    cluster: &OpenShiftCluster,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<OpenShiftCluster> {
    let handler = OpenShiftClustersHandler::new(client.clone());

    let operation = handler
        .create_or_update(id, cluster)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("creating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("create OpenShift cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context("creating", id)))?;

    handler
        .get(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("creating", id)))
}

/// Read a cluster, mapping 404 to `None`.
pub async fn read_cluster(
    client: &ArmClient,
    id: &OpenShiftClusterId,
) -> Result<Option<OpenShiftCluster>> {
    let handler = OpenShiftClustersHandler::new(client.clone());
    match handler.get(id).await {
        Ok(cluster) => Ok(Some(cluster)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(CoreError::from(e).with_context(context("reading", id))),
    }
}

/// Update a cluster's tags and wait for completion.
pub async fn update_cluster_and_wait(
    client: &ArmClient,
    id: &OpenShiftClusterId,
    update: &OpenShiftClusterUpdate,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<OpenShiftCluster> {
    let handler = OpenShiftClustersHandler::new(client.clone());

    let operation = handler
        .update(id, update)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("updating", id)))?;

    poll_operation(
        client,
        operation,
        &format!("update OpenShift cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context("updating", id)))?;

    handler
        .get(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("updating", id)))
}

/// Delete a cluster and wait for completion. Deleting an absent cluster is
/// success.
pub async fn delete_cluster_and_wait(
    client: &ArmClient,
    id: &OpenShiftClusterId,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let handler = OpenShiftClustersHandler::new(client.clone());

    let operation = match handler.delete(id).await {
        Ok(operation) => operation,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(CoreError::from(e).with_context(context("deleting", id))),
    };

    poll_operation(
        client,
        operation,
        &format!("delete OpenShift cluster {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context("deleting", id)))
}

/// List the clusters in a resource group.
pub async fn list_clusters(
    client: &ArmClient,
    resource_group: &ResourceGroupId,
) -> Result<Vec<OpenShiftCluster>> {
    let handler = OpenShiftClustersHandler::new(client.clone());
    handler.list(resource_group).await.map_err(|e| {
        CoreError::from(e).with_context(format!(
            "listing OpenShift clusters in resource group {:?}",
            resource_group.resource_group
        ))
    })
}

/// Fetch the kubeadmin credentials.
pub async fn cluster_credentials(
    client: &ArmClient,
    id: &OpenShiftClusterId,
) -> Result<OpenShiftClusterCredentials> {
    let handler = OpenShiftClustersHandler::new(client.clone());
    handler
        .list_credentials(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("fetching credentials for", id)))
}

/// Fetch the admin kubeconfig (base64-encoded).
pub async fn admin_kubeconfig(
    client: &ArmClient,
    id: &OpenShiftClusterId,
) -> Result<OpenShiftClusterAdminKubeconfig> {
    let handler = OpenShiftClustersHandler::new(client.clone());
    handler
        .list_admin_credentials(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context("fetching kubeconfig for", id)))
}
