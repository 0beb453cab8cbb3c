use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
enum FileSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>),
}

/// The file the user picked. Its content is only read when it is submitted.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    source: FileSource,
    size: Option<u64>,
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let name = path.file_name()?.to_str()?.to_string();
        let size = fs::metadata(&path).ok().map(|m| m.len());
        Some(Self {
            name,
            source: FileSource::Path(path),
            size,
        })
    }

    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size: Some(bytes.len() as u64),
            source: FileSource::Bytes(bytes),
        }
    }

    /// Native drops carry a path; web drops carry bytes.
    pub fn from_dropped(file: &egui::DroppedFile) -> Option<Self> {
        if let Some(bytes) = &file.bytes {
            let name = if file.name.is_empty() {
                file.path
                    .as_deref()
                    .and_then(Path::file_name)?
                    .to_str()?
                    .to_string()
            } else {
                file.name.clone()
            };
            return Some(Self::from_bytes(name, Arc::clone(bytes)));
        }
        file.path.as_ref().and_then(|path| Self::from_path(path.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path).await,
            FileSource::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}
