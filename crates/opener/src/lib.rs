//! Opener engine: picks the external command for an open request, runs it,
//! and reports the outcome.
//!
//! - [`plan`] holds the decision tree, independent of process spawning
//! - [`engine`] executes plans and owns the Flatpak temp-copy workaround
//! - [`cleanup`] schedules deferred deletion of temp copies

pub mod cleanup;
pub mod engine;
pub mod plan;
pub mod target;
pub mod temp_copy;

pub use cleanup::{CleanupHandle, CleanupQueue, CLEANUP_DELAY};
pub use engine::Opener;
pub use plan::{BrowserChoice, HostProbe, LaunchMode, LaunchPlan};
pub use target::{BrowserTarget, Scheme};
pub use temp_copy::TempCopy;
