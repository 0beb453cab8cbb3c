use crate::error::UploadError;
use crate::upload::DownloadReference;
use std::mem;

/// Where the uploader is in its Idle → Submitting → Success/Failed cycle.
///
/// A download from an earlier success rides along in `previous` so it stays
/// available while a new attempt runs and after that attempt fails.
#[derive(Debug, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting {
        previous: Option<DownloadReference>,
    },
    Success(DownloadReference),
    Failed {
        error: UploadError,
        previous: Option<DownloadReference>,
    },
}

impl Phase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting { .. })
    }

    pub fn download(&self) -> Option<&DownloadReference> {
        match self {
            Phase::Idle => None,
            Phase::Success(download) => Some(download),
            Phase::Submitting { previous } | Phase::Failed { previous, .. } => previous.as_ref(),
        }
    }

    pub fn error(&self) -> Option<&UploadError> {
        match self {
            Phase::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Resets to `Idle` and hands back whatever download was held.
    pub fn take_download(&mut self) -> Option<DownloadReference> {
        match mem::take(self) {
            Phase::Idle => None,
            Phase::Success(download) => Some(download),
            Phase::Submitting { previous } | Phase::Failed { previous, .. } => previous,
        }
    }
}
