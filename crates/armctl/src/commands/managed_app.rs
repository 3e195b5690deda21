//! Managed application command implementations

use armctl_core::managed_app::{
    create_application_and_wait, create_definition_and_wait, delete_application_and_wait,
    delete_definition_and_wait, read_application, read_definition, update_application_tags,
    DEFAULT_TIMEOUT,
};
use azure_arm::managed_applications::{
    Application, ApplicationDefinition, ApplicationDefinitionProperties, ApplicationKind,
    ApplicationPatch, ApplicationProperties, Plan,
};
use azure_arm::resource_id::{ApplicationDefinitionId, ManagedApplicationId, ResourceGroupId};
use azure_arm::{ArmClient, ManagedApplicationsHandler};

use crate::cli::managed_app::{
    CreateApplicationArgs, CreateDefinitionArgs, DefinitionCommands, ManagedAppCommands,
    UpdateApplicationArgs,
};
use crate::cli::{DeleteArgs, ListArgs, ResourceArgs};
use crate::commands::async_utils::{operation_spinner, print_accepted};
use crate::commands::{read_json_arg, tags_from};
use crate::connection::ConnectionManager;
use crate::error::{ArmCtlError, Result as CliResult};
use crate::output::{print_output, OutputFormat};

/// Handle `armctl managed-app <subcommand>`.
pub async fn handle(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    command: ManagedAppCommands,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    match command {
        ManagedAppCommands::Definition { command } => match command {
            DefinitionCommands::Create(args) => {
                create_definition(&client, args, output_format).await
            }
            DefinitionCommands::Show(args) => show_definition(&client, args, output_format).await,
            DefinitionCommands::Delete(args) => {
                delete_definition(&client, args, output_format).await
            }
            DefinitionCommands::List(args) => list_definitions(&client, args, output_format).await,
        },
        ManagedAppCommands::Create(args) => create_application(&client, args, output_format).await,
        ManagedAppCommands::Show(args) => show_application(&client, args, output_format).await,
        ManagedAppCommands::Update(args) => update_application(&client, args, output_format).await,
        ManagedAppCommands::Delete(args) => delete_application(&client, args, output_format).await,
        ManagedAppCommands::List(args) => list_applications(&client, args, output_format).await,
    }
}

async fn create_definition(
    client: &ArmClient,
    args: CreateDefinitionArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    if args.package_file_uri.is_none() && args.main_template.is_none() {
        return Err(ArmCtlError::InvalidInput {
            message: "either --package-file-uri or --main-template is required".to_string(),
        });
    }
    if args.main_template.is_some() && args.create_ui_definition.is_none() {
        return Err(ArmCtlError::InvalidInput {
            message: "--main-template requires --create-ui-definition".to_string(),
        });
    }

    let id = ApplicationDefinitionId::new(client.subscription_id(), &args.resource_group, &args.name);
    let definition = ApplicationDefinition {
        location: args.location,
        tags: tags_from(&args.tags),
        properties: ApplicationDefinitionProperties {
            lock_level: Some(args.lock_level),
            display_name: args.display_name,
            description: args.description,
            authorizations: if args.authorizations.is_empty() {
                None
            } else {
                Some(args.authorizations)
            },
            package_file_uri: args.package_file_uri,
            main_template: args.main_template.as_deref().map(read_json_arg).transpose()?,
            create_ui_definition: args
                .create_ui_definition
                .as_deref()
                .map(read_json_arg)
                .transpose()?,
        },
        ..Default::default()
    };

    if args.async_ops.no_wait {
        let handler = ManagedApplicationsHandler::new(client.clone());
        let operation = handler.create_or_update_definition(&id, &definition).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Application definition '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        create_definition_and_wait(client, &id, &definition, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback)
            .await;
    match result {
        Ok(created) => {
            if output_format.is_human() {
                println!("Application definition '{}' created.", id.name);
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

async fn show_definition(
    client: &ArmClient,
    args: ResourceArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = ApplicationDefinitionId::new(client.subscription_id(), &args.resource_group, &args.name);
    match read_definition(client, &id).await? {
        Some(definition) => print_output(definition, output_format),
        None => Err(ArmCtlError::NotFound {
            what: format!(
                "application definition '{}' in resource group '{}'",
                id.name, id.resource_group
            ),
        }),
    }
}

async fn delete_definition(
    client: &ArmClient,
    args: DeleteArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = ApplicationDefinitionId::new(client.subscription_id(), &args.resource_group, &args.name);

    if args.async_ops.no_wait {
        let handler = ManagedApplicationsHandler::new(client.clone());
        let operation = handler.delete_definition(&id).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Deletion of application definition '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        delete_definition_and_wait(client, &id, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(()) => {
            if output_format.is_human() {
                println!("Application definition '{}' deleted.", id.name);
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn list_definitions(
    client: &ArmClient,
    args: ListArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let handler = ManagedApplicationsHandler::new(client.clone());
    let resource_group = ResourceGroupId::new(client.subscription_id(), &args.resource_group);
    let definitions = handler.list_definitions(&resource_group).await?;
    print_output(definitions, output_format)
}

async fn create_application(
    client: &ArmClient,
    args: CreateApplicationArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let plan = match (&args.plan_name, &args.plan_product, &args.plan_publisher, &args.plan_version)
    {
        (None, None, None, None) => None,
        (Some(name), Some(product), Some(publisher), Some(version)) => Some(Plan {
            name: name.clone(),
            product: product.clone(),
            publisher: publisher.clone(),
            version: version.clone(),
            promotion_code: None,
        }),
        _ => {
            return Err(ArmCtlError::InvalidInput {
                message: "plan flags must be given together: --plan-name, --plan-product, \
                          --plan-publisher, --plan-version"
                    .to_string(),
            })
        }
    };
    if args.kind == ApplicationKind::ServiceCatalog && args.definition_id.is_none() {
        return Err(ArmCtlError::InvalidInput {
            message: "--definition-id is required for ServiceCatalog applications".to_string(),
        });
    }

    let id = ManagedApplicationId::new(client.subscription_id(), &args.resource_group, &args.name);
    let application = Application {
        location: args.location,
        kind: Some(args.kind),
        plan,
        tags: tags_from(&args.tags),
        properties: ApplicationProperties {
            managed_resource_group_id: Some(args.managed_resource_group_id),
            application_definition_id: args.definition_id,
            parameters: args.parameters.as_deref().map(read_json_arg).transpose()?,
            ..Default::default()
        },
        ..Default::default()
    };

    if args.async_ops.no_wait {
        let handler = ManagedApplicationsHandler::new(client.clone());
        let operation = handler.create_or_update(&id, &application).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Managed application '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        create_application_and_wait(client, &id, &application, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback)
            .await;
    match result {
        Ok(created) => {
            if output_format.is_human() {
                println!("Managed application '{}' created.", id.name);
                if let Some(outputs) = &created.properties.outputs {
                    println!("Outputs: {}", serde_json::to_string_pretty(outputs)?);
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

async fn show_application(
    client: &ArmClient,
    args: ResourceArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = ManagedApplicationId::new(client.subscription_id(), &args.resource_group, &args.name);
    match read_application(client, &id).await? {
        Some(application) => print_output(application, output_format),
        None => Err(ArmCtlError::NotFound {
            what: format!(
                "managed application '{}' in resource group '{}'",
                id.name, id.resource_group
            ),
        }),
    }
}

async fn update_application(
    client: &ArmClient,
    args: UpdateApplicationArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = ManagedApplicationId::new(client.subscription_id(), &args.resource_group, &args.name);
    let patch = ApplicationPatch {
        tags: tags_from(&args.tags),
    };
    let updated = update_application_tags(client, &id, &patch).await?;
    if output_format.is_human() {
        println!("Managed application '{}' updated.", id.name);
        Ok(())
    } else {
        print_output(updated, output_format)
    }
}

async fn delete_application(
    client: &ArmClient,
    args: DeleteArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let id = ManagedApplicationId::new(client.subscription_id(), &args.resource_group, &args.name);

    if args.async_ops.no_wait {
        let handler = ManagedApplicationsHandler::new(client.clone());
        let operation = handler.delete(&id).await?;
        return print_accepted(
            &operation,
            output_format,
            &format!("Deletion of managed application '{}' accepted", id.name),
        );
    }

    let (pb, callback) = operation_spinner(!output_format.is_human());
    let result =
        delete_application_and_wait(client, &id, args.async_ops.timeout_or(DEFAULT_TIMEOUT), callback).await;
    match result {
        Ok(()) => {
            if output_format.is_human() {
                println!("Managed application '{}' deleted.", id.name);
            }
            Ok(())
        }
        Err(e) => {
            pb.finish_and_clear();
            Err(e.into())
        }
    }
}

async fn list_applications(
    client: &ArmClient,
    args: ListArgs,
    output_format: OutputFormat,
) -> CliResult<()> {
    let handler = ManagedApplicationsHandler::new(client.clone());
    let resource_group = ResourceGroupId::new(client.subscription_id(), &args.resource_group);
    let applications = handler.list(&resource_group).await?;
    print_output(applications, output_format)
}
