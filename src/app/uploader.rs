use super::Phase;
use crate::error::{TransferError, UploadError, ValidationError};
use crate::upload::{DownloadReference, FileFilter, SelectedFile, Transport};
use derivative::Derivative;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

type Outcome = Result<DownloadReference, TransferError>;

/// Holds the one selected file and drives at most one upload at a time.
///
/// Every upload runs on its own thread; its result comes back over a channel
/// created for that upload. Dropping the uploader mid-request abandons the
/// upload: the worker's send fails and the spooled response is deleted with it.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Uploader<T: Transport> {
    #[derivative(Debug = "ignore")]
    transport: Arc<T>,
    filter: FileFilter,
    download_name: String,
    spool_dir: PathBuf,
    selected: Option<SelectedFile>,
    phase: Phase,
    #[derivative(Debug = "ignore")]
    outcome_receiver: Option<Receiver<Outcome>>,
}

impl<T: Transport> Uploader<T> {
    pub fn new(transport: T, filter: FileFilter, download_name: impl Into<String>) -> Self {
        Self {
            transport: Arc::new(transport),
            filter,
            download_name: download_name.into(),
            spool_dir: env::temp_dir(),
            selected: None,
            phase: Phase::Idle,
            outcome_receiver: None,
        }
    }

    /// Directory responses are spooled into. Defaults to the system temp dir.
    pub fn with_spool_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.spool_dir = dir.into();
        self
    }

    pub fn filter(&self) -> &FileFilter {
        &self.filter
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase.is_submitting()
    }

    pub fn can_submit(&self) -> bool {
        self.selected.is_some() && !self.is_submitting()
    }

    pub fn download(&self) -> Option<&DownloadReference> {
        self.phase.download()
    }

    pub fn error_message(&self) -> Option<String> {
        self.phase.error().map(ToString::to_string)
    }

    /// Replaces the selection with `candidate` if its name passes the filter.
    /// Any download, current or stale, is released. Returns whether the
    /// candidate was taken.
    pub fn select_file(&mut self, candidate: SelectedFile) -> bool {
        if self.is_submitting() {
            tracing::debug!(file = candidate.name(), "ignoring selection during upload");
            return false;
        }
        if !self.filter.accepts(candidate.name()) {
            tracing::info!(
                file = candidate.name(),
                accept = %self.filter.describe(),
                "rejected file"
            );
            return false;
        }

        tracing::info!(file = candidate.name(), size = ?candidate.size(), "selected file");
        self.selected = Some(candidate);
        drop(self.phase.take_download());
        true
    }

    pub fn remove_file(&mut self) {
        if let Some(file) = self.selected.take() {
            tracing::info!(file = file.name(), "removed file");
        }
    }

    /// Starts uploading the selected file. The result is applied by a later
    /// [`Uploader::poll`] or [`Uploader::wait_for_result`].
    pub fn submit(&mut self) -> Result<(), ValidationError> {
        if self.is_submitting() {
            tracing::warn!("submit ignored, an upload is already in progress");
            return Err(ValidationError::AlreadySubmitting);
        }

        let Some(file) = self.selected.clone() else {
            tracing::warn!("submit without a selected file");
            let previous = self.phase.take_download();
            self.phase = Phase::Failed {
                error: ValidationError::NoFileSelected.into(),
                previous,
            };
            return Err(ValidationError::NoFileSelected);
        };

        tracing::info!(file = file.name(), "starting upload");
        let previous = self.phase.take_download();
        self.phase = Phase::Submitting { previous };
        self.outcome_receiver = Some(self.spawn_upload(file));
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        if self.phase.error().is_some() {
            self.phase = match self.phase.take_download() {
                Some(download) => Phase::Success(download),
                None => Phase::Idle,
            };
        }
    }

    /// Drops the selection and the download. Refused while an upload is in
    /// flight: the request cannot be cancelled, so the guard stays until it
    /// finishes.
    pub fn reset(&mut self) -> Result<(), ValidationError> {
        if self.is_submitting() {
            tracing::warn!("reset ignored, an upload is already in progress");
            return Err(ValidationError::AlreadySubmitting);
        }
        tracing::info!("clearing selection and download");
        self.outcome_receiver = None;
        self.selected = None;
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Applies a finished upload if one is waiting. Returns whether the state
    /// changed.
    pub fn poll(&mut self) -> bool {
        let Some(receiver) = &self.outcome_receiver else {
            return false;
        };
        match receiver.try_recv() {
            Ok(outcome) => {
                self.finish(outcome);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.finish(Err(worker_vanished()));
                true
            }
        }
    }

    /// Blocking form of [`Uploader::poll`].
    pub fn wait_for_result(&mut self, timeout: Duration) -> bool {
        let Some(receiver) = &self.outcome_receiver else {
            return false;
        };
        match receiver.recv_timeout(timeout) {
            Ok(outcome) => {
                self.finish(outcome);
                true
            }
            Err(RecvTimeoutError::Timeout) => false,
            Err(RecvTimeoutError::Disconnected) => {
                self.finish(Err(worker_vanished()));
                true
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome_receiver = None;
        let previous = self.phase.take_download();
        self.phase = match outcome {
            Ok(download) => {
                tracing::info!(bytes = download.len(), "upload succeeded");
                // The superseded download is released here.
                drop(previous);
                Phase::Success(download)
            }
            Err(err) => {
                tracing::error!(error = %err, "upload failed");
                Phase::Failed {
                    error: UploadError::Transfer(err),
                    previous,
                }
            }
        };
    }

    fn spawn_upload(&self, file: SelectedFile) -> Receiver<Outcome> {
        let (sender, receiver) = mpsc::channel();
        let transport = Arc::clone(&self.transport);
        let download_name = self.download_name.clone();
        let spool_dir = self.spool_dir.clone();

        std::thread::spawn(move || {
            let outcome = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => {
                    rt.block_on(run_upload(transport.as_ref(), &file, &spool_dir, download_name))
                },
                Err(e) => Err(TransferError::Runtime(e)),
            };
            if sender.send(outcome).is_err() {
                tracing::debug!(file = file.name(), "upload result discarded, uploader went away");
            }
        });

        receiver
    }
}

async fn run_upload<T: Transport>(
    transport: &T,
    file: &SelectedFile,
    spool_dir: &Path,
    download_name: String,
) -> Outcome {
    let content = file.read().await.map_err(|source| TransferError::Read {
        name: file.name().to_string(),
        source,
    })?;
    let body = transport.upload(file.name(), content).await?;
    DownloadReference::create_in(spool_dir, &body, download_name).map_err(TransferError::Spool)
}

fn worker_vanished() -> TransferError {
    TransferError::Runtime(std::io::Error::other("upload worker stopped unexpectedly"))
}
