use crate::cleanup::{CleanupQueue, CLEANUP_DELAY};
use crate::plan::{self, HostProbe, LaunchMode, LaunchPlan};
use crate::target::BrowserTarget;
use crate::temp_copy::TempCopy;
use async_trait::async_trait;
use opendesk_core::{OpenError, OpenRequest, OpenResult, OpenerConfig, Platform};
use opendesk_executor::{probe, CommandRunner};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Executes open requests. Holds the configuration it was built with; it
/// never reads the environment itself.
pub struct Opener {
    config: OpenerConfig,
    platform: Platform,
    runner: Arc<dyn CommandRunner>,
    cleanup: CleanupQueue,
    cleanup_delay: Duration,
    temp_root: PathBuf,
}

impl Opener {
    pub fn new(config: OpenerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            config,
            platform: Platform::detect(),
            runner,
            cleanup: CleanupQueue::new(),
            cleanup_delay: CLEANUP_DELAY,
            temp_root: std::env::temp_dir(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_cleanup_delay(mut self, delay: Duration) -> Self {
        self.cleanup_delay = delay;
        self
    }

    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = root.into();
        self
    }

    pub fn config(&self) -> &OpenerConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn cleanup(&self) -> &CleanupQueue {
        &self.cleanup
    }

    pub async fn handle(&self, request: &OpenRequest) -> OpenResult<String> {
        debug!("Handling request for {}", request.target());
        match request {
            OpenRequest::OpenFolder { path } => self.open_folder(path).await,
            OpenRequest::OpenFile { path } => self.open_file(path).await,
            OpenRequest::OpenBrowser { url } => self.open_browser(url).await,
        }
    }

    pub async fn open_folder(&self, path: &str) -> OpenResult<String> {
        let absolute = existing_absolute(path).await?;
        let display = absolute.display().to_string();

        let plan = plan::plan_folder(self.platform, &display, self).await?;
        self.launch(&plan).await?;

        Ok(format!("Opened folder in {}: {}", plan.label, display))
    }

    pub async fn open_file(&self, path: &str) -> OpenResult<String> {
        let absolute = existing_absolute(path).await?;
        let display = absolute.display().to_string();

        let plan = plan::plan_file(self.platform, &display)?;
        self.launch(&plan).await?;

        Ok(format!("Opened file with {}: {}", plan.label, display))
    }

    pub async fn open_browser(&self, url: &str) -> OpenResult<String> {
        let target = BrowserTarget::parse(url)?;
        if let Some(local) = target.local_path() {
            if !path_exists(local).await {
                return Err(OpenError::NotFound(local.display().to_string()));
            }
        }

        let choice =
            plan::choose_browser(self.platform, &self.config, target.is_file(), self).await?;

        if choice.uses_temp_copy() {
            return self.open_via_temp_copy(&target, choice).await;
        }

        let plan = choice.launch_plan(target.as_str());
        self.launch(&plan).await?;
        Ok(format!("Opened {} in {}", target.as_str(), plan.label))
    }

    /// Flatpak Firefox cannot read arbitrary host paths, so the file is
    /// copied under the temp root first and removed again after a delay.
    async fn open_via_temp_copy(
        &self,
        target: &BrowserTarget,
        choice: plan::BrowserChoice,
    ) -> OpenResult<String> {
        let source = target
            .local_path()
            .ok_or_else(|| OpenError::InvalidUrl(target.as_str().to_string()))?;

        let copy = TempCopy::create(source, &self.temp_root).await.map_err(|e| {
            OpenError::OpenFailed(format!(
                "could not copy {} to a temporary directory: {}",
                source.display(),
                e
            ))
        })?;
        let rewritten = copy.url(target.url()).map_err(|e| OpenError::OpenFailed(e.to_string()));

        let launched = match rewritten {
            Ok(url) => {
                let plan = choice.launch_plan(url.as_str());
                self.launch(&plan).await.map(|()| plan.label)
            }
            Err(e) => Err(e),
        };

        // Scheduled whether or not the launch worked.
        self.cleanup
            .schedule(copy.directory.clone(), self.cleanup_delay);

        let label = launched?;
        Ok(format!(
            "Opened {} in {} using temporary copy {}",
            target.as_str(),
            label,
            copy.file.display()
        ))
    }

    async fn launch(&self, plan: &LaunchPlan) -> OpenResult<()> {
        info!("Launching {} ({:?})", plan.command, plan.mode);

        let result = match plan.mode {
            LaunchMode::Wait => self.runner.launch(&plan.command).await,
            LaunchMode::Detach => self.runner.spawn(&plan.command).await,
        };

        result.map_err(|e| {
            warn!("Launch of {} failed: {}", plan.command.program, e);
            OpenError::OpenFailed(e.to_string())
        })
    }
}

#[async_trait]
impl HostProbe for Opener {
    async fn command_exists(&self, name: &str) -> bool {
        probe::command_exists(self.runner.as_ref(), self.platform, name).await
    }

    async fn sandboxed_firefox(&self) -> bool {
        probe::detect_sandboxed_firefox(self.runner.as_ref()).await
    }

    async fn path_exists(&self, path: &Path) -> bool {
        path_exists(path).await
    }
}

async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Absolute form of `path`, which must exist. Relative paths resolve against
/// the working directory; symlinks are left alone.
async fn existing_absolute(path: &str) -> OpenResult<PathBuf> {
    let path = Path::new(path);
    if path.as_os_str().is_empty() || !path_exists(path).await {
        return Err(OpenError::NotFound(path.display().to_string()));
    }
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .map_err(|e| OpenError::OpenFailed(format!("cannot resolve {}: {}", path.display(), e)))
}
