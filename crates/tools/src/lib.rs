pub mod dispatcher;
pub mod open_tools;
pub mod registry;
pub mod traits;

pub use dispatcher::{ToolDispatcher, DEFAULT_TOOL_TIMEOUT};
pub use open_tools::{open_tools, OpenBrowserTool, OpenFileTool, OpenFolderTool};
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolError, ToolResult};
