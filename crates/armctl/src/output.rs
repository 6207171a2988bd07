//! Rendering of command results as JSON, YAML or tables

use anyhow::Result;
use colored::Colorize;
use comfy_table::Table;
use serde::Serialize;
use serde_json::Value;

use crate::cli;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Table,
}

impl OutputFormat {
    /// Resolve the global `--output` flag, using `auto` as given
    pub fn resolve(requested: cli::OutputFormat, auto: OutputFormat) -> Self {
        match requested {
            cli::OutputFormat::Auto => auto,
            cli::OutputFormat::Json => OutputFormat::Json,
            cli::OutputFormat::Yaml => OutputFormat::Yaml,
            cli::OutputFormat::Table => OutputFormat::Table,
        }
    }
}

pub fn print_output<T: Serialize>(data: T, format: OutputFormat) -> Result<()> {
    let json_value = serde_json::to_value(data)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json_value)?);
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&json_value)?);
        }
        OutputFormat::Table => {
            println!("{}", render_table(&json_value));
        }
    }

    Ok(())
}

fn render_table(value: &Value) -> String {
    match value {
        Value::Array(arr) if !arr.is_empty() => {
            let mut table = Table::new();

            if let Value::Object(first) = &arr[0] {
                let headers: Vec<String> = first.keys().cloned().collect();
                table.set_header(&headers);

                for item in arr {
                    if let Value::Object(obj) = item {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|h| format_cell(h, obj.get(h).unwrap_or(&Value::Null)))
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![format_value(item)]);
                }
            }

            table.to_string()
        }
        Value::Array(_) => "(none)".to_string(),
        Value::Object(obj) => {
            let mut table = Table::new();
            table.set_header(vec!["Key", "Value"]);

            for (key, val) in obj {
                table.add_row(vec![key.clone(), format_cell(key, val)]);
            }

            table.to_string()
        }
        _ => format_value(value),
    }
}

fn format_cell(key: &str, value: &Value) -> String {
    match (key, value) {
        ("status", Value::String(s)) => format_status(s),
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

/// Color an operation status word for terminal display
pub fn format_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "succeeded" | "completed" => format!("\u{2713} {}", status).green().to_string(),
        "failed" | "cancelled" | "canceled" => format!("\u{2717} {}", status).red().to_string(),
        "inprogress" | "running" => format!("\u{21bb} {}", status).yellow().to_string(),
        _ => status.to_string(),
    }
}
