//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR and plain pipes):
//! - Green: success
//! - Red: errors
//! - Yellow: warnings
//! - Cyan: hints, variable names
//! - Dimmed: secondary info
//!
//! Status lines go to stderr so that `export` output on stdout stays clean
//! enough to `eval` or redirect.

use console::style;
use std::io::{self, Write};

/// Colors on unless NO_COLOR is set or stderr is not a terminal.
fn colors_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stderr)
}

/// Print a success line.
///
/// Example: `✓ loaded 6 secrets from https://my-vault.vault.azure.net`
pub fn success(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✓").green(), msg);
    } else {
        eprintln!("✓ {}", msg);
    }
}

/// Print the line every resolving command ends with.
pub fn loaded(count: usize, source: &str) {
    success(&format!("loaded {} secrets from {}", count, source));
}

/// Print an error line.
///
/// Example: `✗ secret not found: DATABASE-URL`
pub fn error(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("✗").red(), msg);
    } else {
        eprintln!("✗ {}", msg);
    }
}

/// Print a warning line.
pub fn warn(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("⚠").yellow(), msg);
    } else {
        eprintln!("⚠ {}", msg);
    }
}

/// Print a hint line.
///
/// Example: `→ set AZURE_KEY_VAULT_NAME or pass --vault`
pub fn hint(msg: &str) {
    if colors_enabled() {
        eprintln!("{} {}", style("→").cyan(), style(msg).cyan());
    } else {
        eprintln!("→ {}", msg);
    }
}

/// Print a mapping row: `  DATABASE-URL  →  DATABASE_URL`.
pub fn mapping(from: &str, to: &str, width: usize) {
    let stdout_colors = std::env::var_os("NO_COLOR").is_none() && atty::is(atty::Stream::Stdout);
    if stdout_colors {
        println!(
            "  {:width$}  {}  {}",
            from,
            style("→").dim(),
            style(to).cyan(),
            width = width
        );
    } else {
        println!("  {:width$}  →  {}", from, to, width = width);
    }
}

/// Write machine-readable output to stdout verbatim.
pub fn raw(content: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()
}
