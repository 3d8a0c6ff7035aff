//! Check command.
//!
//! Resolves every secret exactly as a service would at startup, then reports
//! success without printing any value.

use crate::cli::output;
use crate::error::Result;

/// Resolve everything and print one success line.
pub fn execute(ctx: &super::source::Context) -> Result<()> {
    let (source, resolved) = ctx.resolve()?;

    output::loaded(resolved.len(), &source);
    Ok(())
}
