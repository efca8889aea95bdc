use opendesk_core::{OpenError, OpenResult};
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    File,
}

/// A URL accepted for opening in a browser.
#[derive(Debug, Clone)]
pub struct BrowserTarget {
    url: Url,
    scheme: Scheme,
    local_path: Option<PathBuf>,
}

impl BrowserTarget {
    /// Accepts only `http`, `https` and `file` URLs. Does not touch the disk.
    pub fn parse(raw: &str) -> OpenResult<Self> {
        let url = Url::parse(raw.trim())
            .map_err(|e| OpenError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let scheme = match url.scheme() {
            "http" => Scheme::Http,
            "https" => Scheme::Https,
            "file" => Scheme::File,
            other => {
                return Err(OpenError::InvalidUrl(format!(
                    "{}: unsupported scheme '{}' (expected http, https or file)",
                    raw, other
                )))
            }
        };

        let local_path = match scheme {
            Scheme::File => Some(url.to_file_path().map_err(|_| {
                OpenError::InvalidUrl(format!("{}: not a local file URL", raw))
            })?),
            _ => None,
        };

        Ok(Self {
            url,
            scheme,
            local_path,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn is_file(&self) -> bool {
        self.scheme == Scheme::File
    }

    pub fn local_path(&self) -> Option<&Path> {
        self.local_path.as_deref()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}
