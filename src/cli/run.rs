//! Run command.
//!
//! Resolves every secret, then executes a command with the values injected
//! as environment variables. This process's own environment is left alone.

use std::process::{Command, ExitStatus};
use tracing::debug;

use crate::cli::output;
use crate::cli::source::Context;
use crate::error::{Error, Result};

/// Run a command with secrets injected and exit with its status.
pub fn execute(ctx: &Context, command: &[String]) -> Result<()> {
    let exit_code = run_with_secrets(ctx, command)?;
    std::process::exit(exit_code);
}

fn run_with_secrets(ctx: &Context, command: &[String]) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| Error::Other("no command specified".to_string()))?;

    // Nothing is spawned unless every secret resolved.
    let (source, resolved) = ctx.resolve()?;
    output::loaded(resolved.len(), &source);

    let mut cmd = Command::new(program);
    cmd.args(args);
    resolved.apply_to(&mut cmd);

    debug!(program = %program, vars = resolved.len(), "starting child");
    let status = cmd
        .status()
        .map_err(|e| Error::Other(format!("failed to start {}: {}", program, e)))?;
    Ok(exit_code(status))
}

/// Child exit code, or 128 + signal number when it was killed.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
