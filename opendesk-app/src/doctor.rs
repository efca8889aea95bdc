//! `opendesk doctor`: what the opener would see on this host.

use opendesk_core::{OpenerConfig, Platform};
use opendesk_executor::{command_exists, detect_sandboxed_firefox, CommandRunner};
use std::fmt;

/// Programs the decision tree may look up.
pub const PROBED_COMMANDS: &[&str] = &[
    "xdg-open",
    "nautilus",
    "dolphin",
    "firefox",
    "google-chrome",
    "chromium",
];

#[derive(Debug, Clone)]
pub struct DoctorReport {
    pub platform: Platform,
    pub config: OpenerConfig,
    pub commands: Vec<(&'static str, bool)>,
    pub firefox_flatpak: bool,
}

impl DoctorReport {
    pub async fn collect(
        platform: Platform,
        config: OpenerConfig,
        runner: &dyn CommandRunner,
    ) -> Self {
        let mut commands = Vec::with_capacity(PROBED_COMMANDS.len());
        for name in PROBED_COMMANDS {
            commands.push((*name, command_exists(runner, platform, name).await));
        }
        let firefox_flatpak = detect_sandboxed_firefox(runner).await;

        Self {
            platform,
            config,
            commands,
            firefox_flatpak,
        }
    }
}

fn yes_no(found: bool) -> &'static str {
    if found {
        "found"
    } else {
        "missing"
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "platform:          {}", self.platform)?;
        writeln!(f, "preferred browser: {}", self.config.preferred_browser)?;
        let sandbox = match self.config.sandboxed_firefox {
            Some(value) => value.to_string(),
            None => "auto".to_string(),
        };
        writeln!(f, "firefox flatpak:   {} (detected: {})", sandbox, self.firefox_flatpak)?;
        writeln!(f, "temp copy:         {}", self.config.copy_to_temp_for_sandbox)?;
        writeln!(f)?;
        for (name, found) in &self.commands {
            writeln!(f, "  {:<14} {}", name, yes_no(*found))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendesk_executor::mock::MockRunner;

    #[tokio::test]
    async fn test_report_lists_every_probe() {
        let runner = MockRunner::new()
            .with_installed(["xdg-open", "firefox"])
            .with_flatpak_list("org.mozilla.firefox\tstable\n");

        let report = DoctorReport::collect(Platform::Linux, OpenerConfig::default(), &runner).await;

        assert!(report.firefox_flatpak);
        assert_eq!(report.commands.len(), PROBED_COMMANDS.len());
        assert!(report.commands.contains(&("xdg-open", true)));
        assert!(report.commands.contains(&("nautilus", false)));

        let text = report.to_string();
        assert!(text.contains("platform:          linux"));
        assert!(text.contains("firefox flatpak:   auto (detected: true)"));
        assert!(text.contains("firefox        found"));
        assert!(text.contains("chromium       missing"));
    }
}
