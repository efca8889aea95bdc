use opendesk_core::{Browser, OpenerConfig, Platform};
use opendesk_executor::mock::{CallKind, MockRunner};
use opendesk_executor::CommandSpec;
use opendesk_opener::Opener;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

#[cfg(unix)]
#[tokio::test]
async fn test_sandboxed_firefox_opens_temp_copy() {
    let source_dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("report.html");
    std::fs::write(&source, "<p>report</p>").unwrap();

    let runner = Arc::new(MockRunner::new());
    let config = OpenerConfig {
        preferred_browser: Browser::Firefox,
        sandboxed_firefox: Some(true),
        copy_to_temp_for_sandbox: true,
    };
    let opener = Opener::new(config, runner.clone())
        .with_platform(Platform::Linux)
        .with_temp_root(temp_root.path())
        .with_cleanup_delay(Duration::from_millis(100));

    let url = Url::from_file_path(&source).unwrap();
    let message = opener.open_browser(url.as_str()).await.unwrap();
    assert!(message.contains("Firefox (Flatpak)"));
    assert!(message.contains("temporary copy"));

    assert!(runner.probes().is_empty());
    let launches = runner.launches();
    assert_eq!(launches.len(), 1);
    assert_eq!(launches[0].kind, CallKind::Spawn);

    let launched = Url::parse(&launches[0].spec.args[2]).unwrap();
    let copy = launched.to_file_path().unwrap();
    assert!(copy.starts_with(temp_root.path()));
    assert_eq!(copy.file_name().unwrap(), "report.html");
    assert_eq!(std::fs::read_to_string(&copy).unwrap(), "<p>report</p>");
    assert_eq!(opener.cleanup().pending(), 1);

    opener.cleanup().drain().await;
    assert!(!copy.exists());
    assert!(!copy.parent().unwrap().exists());
    assert!(source.exists());
}

#[cfg(unix)]
#[tokio::test]
async fn test_temp_copy_disabled_opens_original() {
    let source_dir = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("page.html");
    std::fs::write(&source, "x").unwrap();

    let runner = Arc::new(MockRunner::new());
    let config = OpenerConfig {
        preferred_browser: Browser::Firefox,
        sandboxed_firefox: Some(true),
        copy_to_temp_for_sandbox: false,
    };
    let opener = Opener::new(config, runner.clone()).with_platform(Platform::Linux);

    let url = Url::from_file_path(&source).unwrap();
    opener.open_browser(url.as_str()).await.unwrap();

    assert_eq!(
        runner.launches()[0].spec,
        CommandSpec::new("flatpak").args(["run", "org.mozilla.firefox", url.as_str()])
    );
    assert_eq!(opener.cleanup().pending(), 0);
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_launch_still_cleans_up() {
    let source_dir = tempfile::tempdir().unwrap();
    let temp_root = tempfile::tempdir().unwrap();
    let source = source_dir.path().join("page.html");
    std::fs::write(&source, "x").unwrap();

    let runner = Arc::new(MockRunner::new().with_unspawnable("flatpak"));
    let config = OpenerConfig {
        sandboxed_firefox: Some(true),
        ..OpenerConfig::default()
    };
    let opener = Opener::new(config, runner)
        .with_platform(Platform::Linux)
        .with_temp_root(temp_root.path())
        .with_cleanup_delay(Duration::from_millis(10));

    let url = Url::from_file_path(&source).unwrap();
    assert!(opener.open_browser(url.as_str()).await.is_err());

    opener.cleanup().drain().await;
    let mut entries = std::fs::read_dir(temp_root.path()).unwrap();
    assert!(entries.next().is_none());
}

#[tokio::test]
async fn test_windows_chrome_runs_start_without_probing() {
    let runner = Arc::new(MockRunner::new());
    let config = OpenerConfig {
        preferred_browser: Browser::Chrome,
        ..OpenerConfig::default()
    };
    let opener = Opener::new(config, runner.clone()).with_platform(Platform::Win32);

    let message = opener.open_browser("https://example.com/").await.unwrap();
    assert_eq!(message, "Opened https://example.com/ in Google Chrome");

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].spec,
        CommandSpec::new("cmd").args(["/C", "start", "chrome", "https://example.com/"])
    );
}

#[tokio::test]
async fn test_linux_default_browser_uses_xdg_open() {
    let runner = Arc::new(MockRunner::new());
    let config = OpenerConfig {
        preferred_browser: Browser::Default,
        ..OpenerConfig::default()
    };
    let opener = Opener::new(config, runner.clone()).with_platform(Platform::Linux);

    opener.open_browser("http://localhost:3000/").await.unwrap();

    assert!(runner.probes().is_empty());
    let launch = &runner.launches()[0];
    assert_eq!(launch.kind, CallKind::Launch);
    assert_eq!(launch.spec, CommandSpec::new("xdg-open").arg("http://localhost:3000/"));
}
