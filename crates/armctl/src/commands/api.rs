//! Raw API access command for direct ARM endpoint calls

use serde_json::json;

use crate::cli::HttpMethod;
use crate::commands::read_json_arg;
use crate::connection::ConnectionManager;
use crate::error::Result as CliResult;
use crate::output::{print_output, OutputFormat};

/// Handle `armctl api <method> <path> --api-version <v> [--data ...]`.
pub async fn handle(
    conn_mgr: &ConnectionManager,
    profile_name: Option<&str>,
    method: HttpMethod,
    path: String,
    api_version: String,
    data: Option<String>,
    output_format: OutputFormat,
) -> CliResult<()> {
    let client = conn_mgr.create_client(profile_name)?;

    let normalized_path = if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    };

    let body = data.as_deref().map(read_json_arg).transpose()?;

    let result = match method {
        HttpMethod::Get => client.get_raw(&normalized_path, &api_version).await,
        HttpMethod::Put => {
            client
                .put_raw(&normalized_path, &api_version, body.unwrap_or(json!({})))
                .await
        }
        HttpMethod::Patch => {
            client
                .patch_raw(&normalized_path, &api_version, body.unwrap_or(json!({})))
                .await
        }
        HttpMethod::Post => client.post_raw(&normalized_path, &api_version, body).await,
        HttpMethod::Delete => client.delete_raw(&normalized_path, &api_version).await,
    }?;

    print_output(result, output_format)
}
