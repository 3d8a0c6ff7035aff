//! Export command.
//!
//! Resolves every secret and prints the values to stdout, for `eval`, for
//! piping into another tool, or for writing a `.env` file.

use crate::cli::source::Context;
use crate::cli::{output, ExportFormat};
use crate::core::bootstrap::Resolved;
use crate::error::Result;

/// Resolve and print in the requested format.
pub fn execute(ctx: &Context, format: ExportFormat) -> Result<()> {
    let (source, resolved) = ctx.resolve()?;
    output::raw(&render(&resolved, format)?)?;
    output::loaded(resolved.len(), &source);
    Ok(())
}

/// Render resolved secrets, preserving request order.
pub fn render(resolved: &Resolved, format: ExportFormat) -> Result<String> {
    let mut out = String::new();
    match format {
        ExportFormat::Env => {
            for (name, value) in resolved.iter() {
                out.push_str(&format!("{}={}\n", name, dotenv_quote(value.expose())));
            }
        }
        ExportFormat::Shell => {
            for (name, value) in resolved.iter() {
                out.push_str(&format!("export {}={}\n", name, shell_quote(value.expose())));
            }
        }
        ExportFormat::Json => {
            // serde_json is built with preserve_order, so keys keep request order.
            let object: serde_json::Map<String, serde_json::Value> = resolved
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        serde_json::Value::String(value.expose().to_string()),
                    )
                })
                .collect();
            out.push_str(&serde_json::to_string_pretty(&object)?);
            out.push('\n');
        }
    }
    Ok(out)
}

fn is_plain(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-.,:/@+=%".contains(c))
}

/// Double-quote for dotenv readers unless the value is plain.
fn dotenv_quote(value: &str) -> String {
    if is_plain(value) {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '$' => quoted.push_str("\\$"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Single-quote for POSIX shells.
fn shell_quote(value: &str) -> String {
    if is_plain(value) {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
