//! Command implementations

use std::collections::BTreeMap;

use anyhow::Context;
use serde_json::Value;

use crate::error::{ArmCtlError, Result as CliResult};

pub mod api;
pub mod async_utils;
pub mod managed_app;
pub mod openshift;
pub mod profile;
pub mod redis_enterprise;

/// Parse a JSON argument that is either inline or `@file`.
pub(crate) fn read_json_arg(raw: &str) -> CliResult<Value> {
    if let Some(file_path) = raw.strip_prefix('@') {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {file_path}"))?;
        let value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON from file: {file_path}"))?;
        Ok(value)
    } else {
        serde_json::from_str(raw).map_err(|e| ArmCtlError::InvalidInput {
            message: format!("invalid JSON: {e}"),
        })
    }
}

/// Read a text argument that is either inline or `@file`.
pub(crate) fn read_text_arg(raw: &str) -> CliResult<String> {
    if let Some(file_path) = raw.strip_prefix('@') {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {file_path}"))?;
        Ok(content.trim_end().to_string())
    } else {
        Ok(raw.to_string())
    }
}

/// Collect repeated `--tag key=value` pairs into the request shape.
pub(crate) fn tags_from(pairs: &[(String, String)]) -> Option<BTreeMap<String, String>> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.iter().cloned().collect())
    }
}
