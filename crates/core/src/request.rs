use crate::error::{OpenError, OpenResult};
use serde_json::Value;

/// One open action and its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenRequest {
    OpenFolder { path: String },
    OpenFile { path: String },
    OpenBrowser { url: String },
}

impl OpenRequest {
    pub fn open_folder(args: &Value) -> OpenResult<Self> {
        Ok(OpenRequest::OpenFolder {
            path: required_string(args, "path")?,
        })
    }

    pub fn open_file(args: &Value) -> OpenResult<Self> {
        Ok(OpenRequest::OpenFile {
            path: required_string(args, "path")?,
        })
    }

    pub fn open_browser(args: &Value) -> OpenResult<Self> {
        Ok(OpenRequest::OpenBrowser {
            url: required_string(args, "url")?,
        })
    }

    /// Path or URL the request acts on, as the client sent it.
    pub fn target(&self) -> &str {
        match self {
            OpenRequest::OpenFolder { path } | OpenRequest::OpenFile { path } => path,
            OpenRequest::OpenBrowser { url } => url,
        }
    }
}

fn required_string(args: &Value, key: &str) -> OpenResult<String> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OpenError::MissingArgument(key.to_string()))
}
