//! The three desktop tools. Each one validates its single argument and hands
//! the request to the shared [`Opener`].

use crate::traits::{Tool, ToolError};
use async_trait::async_trait;
use opendesk_core::OpenRequest;
use opendesk_opener::Opener;
use serde_json::{json, Value};
use std::sync::Arc;

fn single_string_schema(key: &str, description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            key: {
                "type": "string",
                "description": description
            }
        },
        "required": [key]
    })
}

pub struct OpenFolderTool {
    opener: Arc<Opener>,
}

impl OpenFolderTool {
    pub fn new(opener: Arc<Opener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl Tool for OpenFolderTool {
    fn name(&self) -> &str {
        "open_folder"
    }

    fn description(&self) -> &str {
        "Open a folder in the system file manager"
    }

    fn schema(&self) -> Value {
        single_string_schema("path", "Path of the folder to open")
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let request = OpenRequest::open_folder(&args)?;
        Ok(self.opener.handle(&request).await?)
    }
}

pub struct OpenFileTool {
    opener: Arc<Opener>,
}

impl OpenFileTool {
    pub fn new(opener: Arc<Opener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl Tool for OpenFileTool {
    fn name(&self) -> &str {
        "open_file"
    }

    fn description(&self) -> &str {
        "Open a file with its default application"
    }

    fn schema(&self) -> Value {
        single_string_schema("path", "Path of the file to open")
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let request = OpenRequest::open_file(&args)?;
        Ok(self.opener.handle(&request).await?)
    }
}

pub struct OpenBrowserTool {
    opener: Arc<Opener>,
}

impl OpenBrowserTool {
    pub fn new(opener: Arc<Opener>) -> Self {
        Self { opener }
    }
}

#[async_trait]
impl Tool for OpenBrowserTool {
    fn name(&self) -> &str {
        "open_browser"
    }

    fn description(&self) -> &str {
        "Open an http, https or file URL in a web browser"
    }

    fn schema(&self) -> Value {
        single_string_schema("url", "URL to open (http, https or file scheme)")
    }

    async fn execute(&self, args: Value) -> Result<String, ToolError> {
        let request = OpenRequest::open_browser(&args)?;
        Ok(self.opener.handle(&request).await?)
    }
}

/// The three open tools, in listing order, sharing one opener.
pub fn open_tools(opener: Arc<Opener>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(OpenFolderTool::new(opener.clone())),
        Arc::new(OpenFileTool::new(opener.clone())),
        Arc::new(OpenBrowserTool::new(opener)),
    ]
}
