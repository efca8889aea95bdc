//! Which command to run for each request, decided from the platform, the
//! configuration and a few host probes. Nothing in here spawns a process
//! except through the [`HostProbe`] it is handed.

use async_trait::async_trait;
use opendesk_core::{Browser, OpenError, OpenResult, OpenerConfig, Platform};
use opendesk_executor::{CommandSpec, FIREFOX_FLATPAK_ID};
use std::path::Path;

/// Chrome's conventional install location on macOS.
pub const MAC_CHROME_BUNDLE: &str = "/Applications/Google Chrome.app";

/// Questions the decision tree asks about the host.
#[async_trait]
pub trait HostProbe: Send + Sync {
    async fn command_exists(&self, name: &str) -> bool;
    async fn sandboxed_firefox(&self) -> bool;
    async fn path_exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    /// Launcher commands that hand off and exit; their exit status is checked.
    Wait,
    /// The application itself; only a failure to start is reported.
    Detach,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub command: CommandSpec,
    pub mode: LaunchMode,
    /// Human name of what gets launched, used in result messages.
    pub label: &'static str,
}

impl LaunchPlan {
    fn new(command: CommandSpec, mode: LaunchMode, label: &'static str) -> Self {
        Self {
            command,
            mode,
            label,
        }
    }
}

pub async fn plan_folder(
    platform: Platform,
    path: &str,
    probe: &dyn HostProbe,
) -> OpenResult<LaunchPlan> {
    match platform {
        Platform::Linux => {
            if probe.command_exists("xdg-open").await {
                return Ok(LaunchPlan::new(
                    CommandSpec::new("xdg-open").arg(path),
                    LaunchMode::Wait,
                    "default file manager",
                ));
            }
            if probe.command_exists("nautilus").await {
                return Ok(LaunchPlan::new(
                    CommandSpec::new("nautilus").arg(path),
                    LaunchMode::Detach,
                    "Nautilus",
                ));
            }
            if probe.command_exists("dolphin").await {
                return Ok(LaunchPlan::new(
                    CommandSpec::new("dolphin").arg(path),
                    LaunchMode::Detach,
                    "Dolphin",
                ));
            }
            Err(OpenError::NoFileManager)
        }
        Platform::Darwin => Ok(LaunchPlan::new(
            CommandSpec::new("open").arg(path),
            LaunchMode::Wait,
            "Finder",
        )),
        // explorer exits 1 even when the window opens, so its status is not checked.
        Platform::Win32 => Ok(LaunchPlan::new(
            CommandSpec::new("explorer").arg(windows_path(path)),
            LaunchMode::Detach,
            "Explorer",
        )),
        Platform::Unknown => Err(OpenError::UnsupportedPlatform(platform)),
    }
}

pub fn plan_file(platform: Platform, path: &str) -> OpenResult<LaunchPlan> {
    let command = match platform {
        Platform::Linux => CommandSpec::new("xdg-open").arg(path),
        Platform::Darwin => CommandSpec::new("open").arg(path),
        Platform::Win32 => windows_start("").arg(escape_for_cmd(&windows_path(path))),
        Platform::Unknown => return Err(OpenError::UnsupportedPlatform(platform)),
    };
    Ok(LaunchPlan::new(command, LaunchMode::Wait, "default application"))
}

/// Browser selected for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserChoice {
    /// Firefox Flatpak; `temp_copy` routes a local file through a temp directory.
    FirefoxFlatpak { temp_copy: bool },
    Firefox,
    GoogleChrome,
    Chromium,
    XdgOpen,
    MacFirefox,
    MacChrome,
    MacOpen,
    WindowsFirefox,
    WindowsChrome,
    WindowsDefault,
}

impl BrowserChoice {
    pub fn uses_temp_copy(&self) -> bool {
        matches!(self, BrowserChoice::FirefoxFlatpak { temp_copy: true })
    }

    pub fn launch_plan(&self, url: &str) -> LaunchPlan {
        match self {
            BrowserChoice::FirefoxFlatpak { .. } => LaunchPlan::new(
                CommandSpec::new("flatpak").args(["run", FIREFOX_FLATPAK_ID, url]),
                LaunchMode::Detach,
                "Firefox (Flatpak)",
            ),
            BrowserChoice::Firefox => LaunchPlan::new(
                CommandSpec::new("firefox").arg(url),
                LaunchMode::Detach,
                "Firefox",
            ),
            BrowserChoice::GoogleChrome => LaunchPlan::new(
                CommandSpec::new("google-chrome").arg(url),
                LaunchMode::Detach,
                "Google Chrome",
            ),
            BrowserChoice::Chromium => LaunchPlan::new(
                CommandSpec::new("chromium").arg(url),
                LaunchMode::Detach,
                "Chromium",
            ),
            BrowserChoice::XdgOpen => LaunchPlan::new(
                CommandSpec::new("xdg-open").arg(url),
                LaunchMode::Wait,
                "default browser",
            ),
            BrowserChoice::MacFirefox => LaunchPlan::new(
                CommandSpec::new("open").args(["-a", "Firefox", url]),
                LaunchMode::Wait,
                "Firefox",
            ),
            BrowserChoice::MacChrome => LaunchPlan::new(
                CommandSpec::new("open").args(["-a", "Google Chrome", url]),
                LaunchMode::Wait,
                "Google Chrome",
            ),
            BrowserChoice::MacOpen => LaunchPlan::new(
                CommandSpec::new("open").arg(url),
                LaunchMode::Wait,
                "default browser",
            ),
            BrowserChoice::WindowsFirefox => LaunchPlan::new(
                windows_start("firefox").arg(escape_for_cmd(url)),
                LaunchMode::Wait,
                "Firefox",
            ),
            BrowserChoice::WindowsChrome => LaunchPlan::new(
                windows_start("chrome").arg(escape_for_cmd(url)),
                LaunchMode::Wait,
                "Google Chrome",
            ),
            BrowserChoice::WindowsDefault => LaunchPlan::new(
                windows_start("").arg(escape_for_cmd(url)),
                LaunchMode::Wait,
                "default browser",
            ),
        }
    }
}

/// Walk the browser decision tree. Probes run lazily, only on the branches
/// that need them; Windows never probes.
pub async fn choose_browser(
    platform: Platform,
    config: &OpenerConfig,
    is_file: bool,
    probe: &dyn HostProbe,
) -> OpenResult<BrowserChoice> {
    if platform == Platform::Linux && config.preferred_browser == Browser::Firefox {
        let sandboxed = match config.sandboxed_firefox {
            Some(sandboxed) => sandboxed,
            None => probe.sandboxed_firefox().await,
        };

        if sandboxed {
            return Ok(BrowserChoice::FirefoxFlatpak {
                temp_copy: is_file && config.copy_to_temp_for_sandbox,
            });
        }
        if probe.command_exists("firefox").await {
            return Ok(BrowserChoice::Firefox);
        }
        return Ok(BrowserChoice::XdgOpen);
    }

    match platform {
        Platform::Linux => match config.preferred_browser {
            Browser::Chrome if probe.command_exists("google-chrome").await => {
                Ok(BrowserChoice::GoogleChrome)
            }
            Browser::Chromium if probe.command_exists("chromium").await => {
                Ok(BrowserChoice::Chromium)
            }
            _ => Ok(BrowserChoice::XdgOpen),
        },
        Platform::Darwin => match config.preferred_browser {
            Browser::Firefox if probe.command_exists("firefox").await => {
                Ok(BrowserChoice::MacFirefox)
            }
            Browser::Chrome if probe.path_exists(Path::new(MAC_CHROME_BUNDLE)).await => {
                Ok(BrowserChoice::MacChrome)
            }
            _ => Ok(BrowserChoice::MacOpen),
        },
        Platform::Win32 => Ok(match config.preferred_browser {
            Browser::Firefox => BrowserChoice::WindowsFirefox,
            Browser::Chrome => BrowserChoice::WindowsChrome,
            _ => BrowserChoice::WindowsDefault,
        }),
        Platform::Unknown => Err(OpenError::UnsupportedPlatform(platform)),
    }
}

/// `cmd /C start <title-or-app>`. An empty first argument is the window title
/// `start` otherwise steals from a quoted target.
fn windows_start(app: &str) -> CommandSpec {
    CommandSpec::new("cmd").args(["/C", "start", app])
}

fn windows_path(path: &str) -> String {
    path.replace('/', "\\")
}

/// Caret-escape the characters cmd would otherwise treat as separators,
/// redirections or variable references. An argument containing a space or
/// tab reaches cmd wrapped in double quotes, where those characters are
/// already literal and a caret would be kept verbatim.
fn escape_for_cmd(arg: &str) -> String {
    if arg.contains([' ', '\t']) {
        return arg.to_string();
    }

    let mut escaped = String::with_capacity(arg.len());
    for c in arg.chars() {
        if matches!(c, '^' | '&' | '|' | '<' | '>' | '%') {
            escaped.push('^');
        }
        escaped.push(c);
    }
    escaped
}
