pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod upload;
pub mod utils;

pub use app::{Phase, TranslationUploader, Uploader};
pub use config::UploaderConfig;
pub use error::{ConfigError, TransferError, UploadError, ValidationError};
pub use upload::{DownloadReference, FileFilter, ReqwestTransport, SelectedFile, Transport};
