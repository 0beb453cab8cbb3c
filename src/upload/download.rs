use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, TempPath};

/// A server response spooled to a private temporary file, offered to the user
/// under `file_name`. Dropping the reference deletes the spooled file, so
/// replacing or clearing it is all the cleanup there is.
#[derive(Debug)]
pub struct DownloadReference {
    file_name: String,
    len: u64,
    path: TempPath,
}

impl DownloadReference {
    pub fn create_in(dir: &Path, bytes: &[u8], file_name: impl Into<String>) -> io::Result<Self> {
        let mut file = Builder::new()
            .prefix("translate-uploader-")
            .suffix(".zip")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        let reference = Self {
            file_name: file_name.into(),
            len: bytes.len() as u64,
            path: file.into_temp_path(),
        };
        tracing::debug!(path = %reference.path().display(), bytes = reference.len, "spooled download");
        Ok(reference)
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    /// Where the bytes are spooled. Only valid while the reference lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_to(&self, dest: &Path) -> io::Result<u64> {
        let copied = fs::copy(&self.path, dest)?;
        tracing::info!(dest = %dest.display(), bytes = copied, "saved download");
        Ok(copied)
    }
}

impl Drop for DownloadReference {
    fn drop(&mut self) {
        tracing::debug!(path = %self.path.display(), "releasing download");
    }
}
