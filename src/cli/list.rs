//! List command.
//!
//! Shows the secret name to environment variable mapping. Never contacts the
//! vault.

use crate::cli::output;
use crate::cli::source::Context;
use crate::error::Result;

/// Print each secret name and the variable it becomes.
pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let names = ctx.secret_names()?;

    if json {
        let secrets: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "secret": name.as_str(),
                    "env": name.env_var().as_str(),
                })
            })
            .collect();

        let result = serde_json::json!({
            "secrets": secrets,
            "count": names.len(),
        });
        output::raw(&format!("{}\n", serde_json::to_string_pretty(&result)?))?;
        return Ok(());
    }

    let width = names.iter().map(|n| n.as_str().len()).max().unwrap_or(0);
    for name in &names {
        output::mapping(name.as_str(), name.env_var().as_str(), width);
    }
    Ok(())
}
