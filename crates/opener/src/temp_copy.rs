use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// A local file copied into its own directory under the temp root, where a
/// Flatpak browser's portal can read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempCopy {
    pub directory: PathBuf,
    pub file: PathBuf,
}

impl TempCopy {
    /// Copy `source` into a fresh `opendesk-<uuid>` directory under
    /// `temp_root`, keeping its file name. The directory is removed again if
    /// the copy fails.
    pub async fn create(source: &Path, temp_root: &Path) -> io::Result<Self> {
        let name = source.file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", source.display()),
            )
        })?;

        let directory = temp_root.join(format!("opendesk-{}", uuid::Uuid::new_v4()));
        tokio::fs::create_dir_all(temp_root).await?;
        tokio::fs::create_dir(&directory).await?;

        let file = directory.join(name);
        if let Err(e) = tokio::fs::copy(source, &file).await {
            let _ = tokio::fs::remove_dir_all(&directory).await;
            return Err(e);
        }

        Ok(Self { directory, file })
    }

    /// `file://` URL of the copy, carrying over the fragment of `original`.
    pub fn url(&self, original: &Url) -> io::Result<Url> {
        let mut url = Url::from_file_path(&self.file).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not an absolute path", self.file.display()),
            )
        })?;
        url.set_fragment(original.fragment());
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_copy_keeps_file_name_and_contents() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("index.html");
        tokio::fs::write(&source, "<h1>hi</h1>").await.unwrap();

        let copy = TempCopy::create(&source, root.path()).await.unwrap();

        assert_eq!(copy.file.file_name().unwrap(), "index.html");
        assert_eq!(copy.file.parent().unwrap(), copy.directory);
        assert!(copy.directory.starts_with(root.path()));
        assert_eq!(tokio::fs::read_to_string(&copy.file).await.unwrap(), "<h1>hi</h1>");
        assert!(source.exists());
    }

    #[tokio::test]
    async fn test_each_copy_gets_its_own_directory() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("a.html");
        tokio::fs::write(&source, "a").await.unwrap();

        let first = TempCopy::create(&source, root.path()).await.unwrap();
        let second = TempCopy::create(&source, root.path()).await.unwrap();
        assert_ne!(first.directory, second.directory);
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_nothing_behind() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("missing.html");

        assert!(TempCopy::create(&missing, root.path()).await.is_err());

        let mut entries = tokio::fs::read_dir(root.path()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_url_points_at_copy() {
        let src_dir = tempfile::tempdir().unwrap();
        let root = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("doc.html");
        tokio::fs::write(&source, "x").await.unwrap();
        let copy = TempCopy::create(&source, root.path()).await.unwrap();

        let original = Url::from_file_path(&source).unwrap().join("#section-2").unwrap();
        let url = copy.url(&original).unwrap();

        assert_eq!(url.to_file_path().unwrap(), copy.file);
        assert_eq!(url.fragment(), Some("section-2"));
    }
}
