use serde::{Deserialize, Serialize};
use std::fmt;

/// Host platforms the opener knows how to drive.
///
/// `Unknown` is never folded into one of the others: every place that picks
/// a platform-specific command has to handle it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Darwin,
    Win32,
    Unknown,
}

impl Platform {
    /// Map a platform identifier (`linux`, `darwin`, `win32`) to a platform.
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "linux" => Platform::Linux,
            "darwin" => Platform::Darwin,
            "win32" => Platform::Win32,
            _ => Platform::Unknown,
        }
    }

    /// Platform of the running host.
    pub fn detect() -> Self {
        Self::from_identifier(host_identifier(std::env::consts::OS))
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::Darwin => "darwin",
            Platform::Win32 => "win32",
            Platform::Unknown => "unknown",
        }
    }
}

/// Rust names the hosts `macos` and `windows`; the opener speaks `darwin`
/// and `win32`.
fn host_identifier(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "windows" => "win32",
        other => other,
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_identifiers() {
        assert_eq!(Platform::from_identifier("linux"), Platform::Linux);
        assert_eq!(Platform::from_identifier("darwin"), Platform::Darwin);
        assert_eq!(Platform::from_identifier("win32"), Platform::Win32);
    }

    #[test]
    fn test_anything_else_is_unknown() {
        for id in ["freebsd", "aix", "", "Linux", "macos", "windows"] {
            assert_eq!(Platform::from_identifier(id), Platform::Unknown, "{id}");
        }
    }

    #[test]
    fn test_host_identifier_translation() {
        assert_eq!(host_identifier("macos"), "darwin");
        assert_eq!(host_identifier("windows"), "win32");
        assert_eq!(host_identifier("linux"), "linux");
        assert_eq!(host_identifier("openbsd"), "openbsd");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_detect_on_linux() {
        assert_eq!(Platform::detect(), Platform::Linux);
    }

    #[test]
    fn test_display_round_trip() {
        for p in [Platform::Linux, Platform::Darwin, Platform::Win32] {
            assert_eq!(Platform::from_identifier(&p.to_string()), p);
        }
        assert_eq!(Platform::Unknown.to_string(), "unknown");
    }
}
