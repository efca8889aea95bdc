//! Opener configuration, read once from the environment at startup.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BROWSER_ENV: &str = "OPENDESK_BROWSER";
pub const FIREFOX_FLATPAK_ENV: &str = "OPENDESK_FIREFOX_FLATPAK";
pub const FLATPAK_TEMP_COPY_ENV: &str = "OPENDESK_FLATPAK_TEMP_COPY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Firefox,
    Chrome,
    Chromium,
    /// Whatever the platform's generic URL opener picks.
    Default,
}

impl Browser {
    /// Parse a browser name, case-insensitively. Unrecognized names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "firefox" => Some(Browser::Firefox),
            "chrome" => Some(Browser::Chrome),
            "chromium" => Some(Browser::Chromium),
            "default" => Some(Browser::Default),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Firefox => "firefox",
            Browser::Chrome => "chrome",
            Browser::Chromium => "chromium",
            Browser::Default => "default",
        }
    }
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenerConfig {
    pub preferred_browser: Browser,
    /// `Some` skips Flatpak detection; `None` auto-detects.
    pub sandboxed_firefox: Option<bool>,
    pub copy_to_temp_for_sandbox: bool,
}

impl Default for OpenerConfig {
    fn default() -> Self {
        Self {
            preferred_browser: Browser::Firefox,
            sandboxed_firefox: None,
            copy_to_temp_for_sandbox: true,
        }
    }
}

impl OpenerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key-value source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let preferred_browser = match lookup(BROWSER_ENV) {
            Some(raw) => Browser::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Unrecognized {}={:?}, using firefox", BROWSER_ENV, raw);
                Browser::Firefox
            }),
            None => Browser::Firefox,
        };

        let sandboxed_firefox = lookup(FIREFOX_FLATPAK_ENV).and_then(|raw| {
            match raw.trim().to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            }
        });

        // Only the literal "false" turns the workaround off.
        let copy_to_temp_for_sandbox = lookup(FLATPAK_TEMP_COPY_ENV).as_deref() != Some("false");

        Self {
            preferred_browser,
            sandboxed_firefox,
            copy_to_temp_for_sandbox,
        }
    }
}
