pub mod command_executor;
pub mod probe;

#[cfg(any(test, feature = "test-support"))]
pub mod mock;

pub use command_executor::{CommandOutput, CommandRunner, CommandSpec, ExecutorError, SystemRunner};
pub use probe::{command_exists, detect_sandboxed_firefox, FIREFOX_FLATPAK_ID, PROBE_TIMEOUT};
