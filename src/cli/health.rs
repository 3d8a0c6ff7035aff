//! Health command.
//!
//! Probes the service health endpoint; suitable as a container
//! `HEALTHCHECK`.

use crate::cli::output;
use crate::cli::source::Context;
use crate::core::health::{self, ServiceContract};
use crate::core::http::HttpSettings;
use crate::core::retry::RetryPolicy;
use crate::error::Result;

/// Probe once and report.
pub fn execute(ctx: &Context, url: Option<&str>, host: &str, port: Option<u16>) -> Result<()> {
    let mut contract = ServiceContract::from(&ctx.config.service);
    if let Some(port) = port {
        contract.port = port;
    }
    let url = match url {
        Some(url) => url.to_string(),
        None => contract.health_url(host),
    };

    let settings = HttpSettings {
        timeout: ctx.config.request_timeout(),
        retry: RetryPolicy::none(),
    };
    let status = health::probe(&url, &settings)?;

    output::success(&format!("{} is healthy (HTTP {})", url, status));
    Ok(())
}
