//! Managed application workflows - CRUD with completion waiting
//!
//! These compose the `Microsoft.Solutions` handler operations with the
//! operation polling loop. Errors are annotated with the resource name and
//! resource group they concern.

use std::time::Duration;

use azure_arm::managed_applications::{
    Application, ApplicationDefinition, ApplicationPatch,
};
use azure_arm::resource_id::{ApplicationDefinitionId, ManagedApplicationId};
use azure_arm::{ArmClient, ManagedApplicationsHandler};

use crate::error::{CoreError, Result};
use crate::progress::{poll_operation, ProgressCallback};

/// Default timeout for managed application operations (30 minutes)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Default polling interval (10 seconds)
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Create or update an application definition and wait for completion.
///
/// 1. Submits the PUT (returns an operation)
/// 2. Polls the operation until completion
/// 3. Fetches and returns the definition
pub async fn create_definition_and_wait(
    client: &ArmClient,
    id: &ApplicationDefinitionId,
    definition: &ApplicationDefinition,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<ApplicationDefinition> {
    let context = || {
        format!(
            "creating application definition {:?} in resource group {:?}",
            id.name, id.resource_group
        )
    };
    let handler = ManagedApplicationsHandler::new(client.clone());

    let operation = handler
        .create_or_update_definition(id, definition)
        .await
        .map_err(|e| CoreError::from(e).with_context(context()))?;

    poll_operation(
        client,
        operation,
        &format!("create application definition {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context()))?;

    let definition = handler
        .get_definition(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context()))?;
    Ok(definition)
}

/// Read an application definition, mapping 404 to `None`.
pub async fn read_definition(
    client: &ArmClient,
    id: &ApplicationDefinitionId,
) -> Result<Option<ApplicationDefinition>> {
    let handler = ManagedApplicationsHandler::new(client.clone());
    match handler.get_definition(id).await {
        Ok(definition) => Ok(Some(definition)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(CoreError::from(e).with_context(format!(
            "reading application definition {:?} in resource group {:?}",
            id.name, id.resource_group
        ))),
    }
}

/// Delete an application definition and wait for completion. Deleting an
/// absent definition is success.
pub async fn delete_definition_and_wait(
    client: &ArmClient,
    id: &ApplicationDefinitionId,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let context = || {
        format!(
            "deleting application definition {:?} in resource group {:?}",
            id.name, id.resource_group
        )
    };
    let handler = ManagedApplicationsHandler::new(client.clone());

    let operation = match handler.delete_definition(id).await {
        Ok(operation) => operation,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(CoreError::from(e).with_context(context())),
    };

    poll_operation(
        client,
        operation,
        &format!("delete application definition {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context()))
}

/// Create or update a managed application and wait for completion.
pub async fn create_application_and_wait(
    client: &ArmClient,
    id: &ManagedApplicationId,
    application: &Application,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<Application> {
    let context = || {
        format!(
            "creating managed application {:?} in resource group {:?}",
            id.name, id.resource_group
        )
    };
    let handler = ManagedApplicationsHandler::new(client.clone());

    let operation = handler
        .create_or_update(id, application)
        .await
        .map_err(|e| CoreError::from(e).with_context(context()))?;

    poll_operation(
        client,
        operation,
        &format!("create managed application {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context()))?;

    let application = handler
        .get(id)
        .await
        .map_err(|e| CoreError::from(e).with_context(context()))?;
    Ok(application)
}

/// Read a managed application, mapping 404 to `None`.
pub async fn read_application(
    client: &ArmClient,
    id: &ManagedApplicationId,
) -> Result<Option<Application>> {
    let handler = ManagedApplicationsHandler::new(client.clone());
    match handler.get(id).await {
        Ok(application) => Ok(Some(application)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(CoreError::from(e).with_context(format!(
            "reading managed application {:?} in resource group {:?}",
            id.name, id.resource_group
        ))),
    }
}

/// Update a managed application's tags. The PATCH answers synchronously.
pub async fn update_application_tags(
    client: &ArmClient,
    id: &ManagedApplicationId,
    patch: &ApplicationPatch,
) -> Result<Application> {
    let handler = ManagedApplicationsHandler::new(client.clone());
    handler.update_tags(id, patch).await.map_err(|e| {
        CoreError::from(e).with_context(format!(
            "updating managed application {:?} in resource group {:?}",
            id.name, id.resource_group
        ))
    })
}

/// Delete a managed application and wait for completion. Deleting an absent
/// application is success.
pub async fn delete_application_and_wait(
    client: &ArmClient,
    id: &ManagedApplicationId,
    timeout: Duration,
    on_progress: Option<ProgressCallback>,
) -> Result<()> {
    let context = || {
        format!(
            "deleting managed application {:?} in resource group {:?}",
            id.name, id.resource_group
        )
    };
    let handler = ManagedApplicationsHandler::new(client.clone());

    let operation = match handler.delete(id).await {
        Ok(operation) => operation,
        Err(e) if e.is_not_found() => return Ok(()),
        Err(e) => return Err(CoreError::from(e).with_context(context())),
    };

    poll_operation(
        client,
        operation,
        &format!("delete managed application {:?}", id.name),
        timeout,
        DEFAULT_INTERVAL,
        on_progress,
    )
    .await
    .map_err(|e| e.with_context(context()))
}
