mod download;
mod filter;
mod transport;
mod types;

pub use download::DownloadReference;
pub use filter::FileFilter;
pub use transport::{ReqwestTransport, Transport, FILE_FIELD};
pub use types::SelectedFile;
