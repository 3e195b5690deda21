//! Output formatting: JSON, YAML, and tables over `serde_json::Value`

use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ArmCtlError, Result};

#[derive(Debug, Clone, Copy, clap::ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON for data, plain success lines for mutations
    #[default]
    Auto,
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Whether mutation commands should print human success messages.
    pub fn is_human(&self) -> bool {
        matches!(self, OutputFormat::Auto | OutputFormat::Table)
    }
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Auto | OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Yaml => {
            let rendered = serde_yaml::to_string(&value).map_err(|e| ArmCtlError::OutputError {
                message: e.to_string(),
            })?;
            print!("{rendered}");
        }
        OutputFormat::Table => {
            print_as_table(&value);
        }
    }

    Ok(())
}

fn print_as_table(value: &Value) {
    match value {
        Value::Array(items) if !items.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &items[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);
                for item in items {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_cell(obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["value"]);
                for item in items {
                    table.add_row(vec![format_cell(item)]);
                }
            }

            println!("{table}");
        }
        Value::Array(_) => {
            println!("(empty)");
        }
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["field", "value"]);
            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_cell(val)]);
            }
            println!("{table}");
        }
        other => println!("{}", format_cell(other)),
    }
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        nested => serde_json::to_string(nested).unwrap_or_default(),
    }
}
