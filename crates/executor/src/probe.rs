//! Host probes. Every failure collapses to `false`; nothing here returns an error.

use crate::command_executor::{CommandRunner, CommandSpec};
use opendesk_core::Platform;
use std::time::Duration;

/// Upper bound on any single probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Flatpak application id of Firefox.
pub const FIREFOX_FLATPAK_ID: &str = "org.mozilla.firefox";

/// Whether `name` resolves to an executable on the search path.
pub async fn command_exists(runner: &dyn CommandRunner, platform: Platform, name: &str) -> bool {
    let lookup = match platform {
        Platform::Win32 => "where",
        _ => "which",
    };
    let spec = CommandSpec::new(lookup).arg(name);

    match runner.output(&spec, Some(PROBE_TIMEOUT)).await {
        Ok(output) => {
            tracing::debug!("{} {} -> {}", lookup, name, output.success);
            output.success
        }
        Err(e) => {
            tracing::debug!("Probe for {} failed: {}", name, e);
            false
        }
    }
}

/// Whether Firefox is installed as a Flatpak, judged by scanning
/// `flatpak list --app` for its application id.
pub async fn detect_sandboxed_firefox(runner: &dyn CommandRunner) -> bool {
    let spec = CommandSpec::new("flatpak").args(["list", "--app"]);

    match runner.output(&spec, Some(PROBE_TIMEOUT)).await {
        Ok(output) if output.success => output.stdout.contains(FIREFOX_FLATPAK_ID),
        Ok(output) => {
            tracing::debug!("flatpak list exited with {:?}", output.code);
            false
        }
        Err(e) => {
            tracing::debug!("flatpak list failed: {}", e);
            false
        }
    }
}
