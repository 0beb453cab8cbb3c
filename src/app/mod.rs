mod state;
mod ui;
mod uploader;

use crate::upload::{ReqwestTransport, SelectedFile};
use eframe::{egui, App};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::{Duration, Instant};
pub use state::Phase;
pub use uploader::Uploader;

pub struct TranslationUploader {
    uploader: Uploader<ReqwestTransport>,
    server_label: String,
    error_display: Duration,
    error_shown_at: Option<Instant>,
    saved_to: Option<PathBuf>,
    save_error: Option<String>,
}

impl TranslationUploader {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        uploader: Uploader<ReqwestTransport>,
        server_label: String,
        error_display: Duration,
    ) -> Self {
        tracing::info!(server = %server_label, "initializing translation uploader");
        Self {
            uploader,
            server_label,
            error_display,
            error_shown_at: None,
            saved_to: None,
            save_error: None,
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.uploader.poll() {
            ctx.request_repaint();
        }

        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if !dropped.is_empty() {
            if dropped.len() > 1 {
                tracing::info!(count = dropped.len(), "several files dropped, keeping the first");
            }
            match SelectedFile::from_dropped(&dropped[0]) {
                Some(candidate) => self.offer(candidate),
                None => tracing::warn!(name = %dropped[0].name, "dropped file has no readable source"),
            }
        }

        self.expire_error(ctx);

        if self.uploader.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn offer(&mut self, candidate: SelectedFile) {
        if self.uploader.select_file(candidate) {
            self.saved_to = None;
            self.save_error = None;
        }
    }

    fn pick_file(&mut self) {
        let extensions = self.uploader.filter().dialog_extensions();
        let mut dialog = FileDialog::new();
        if !extensions.is_empty() {
            dialog = dialog.add_filter("CSV", extensions.as_slice());
        }
        if let Some(path) = dialog.pick_file() {
            match SelectedFile::from_path(path.clone()) {
                Some(candidate) => self.offer(candidate),
                None => tracing::warn!(path = %path.display(), "picked path has no usable file name"),
            }
        }
    }

    fn submit(&mut self) {
        if let Err(e) = self.uploader.submit() {
            tracing::debug!(error = %e, "submit rejected");
        }
        self.saved_to = None;
        self.save_error = None;
    }

    fn save_download(&mut self) {
        let Some(download) = self.uploader.download() else {
            return;
        };
        let Some(dest) = FileDialog::new()
            .set_file_name(download.file_name())
            .add_filter("ZIP archive", &["zip"])
            .save_file()
        else {
            return;
        };

        match download.save_to(&dest) {
            Ok(_) => {
                self.saved_to = Some(dest);
                self.save_error = None;
            }
            Err(e) => {
                tracing::error!(dest = %dest.display(), error = %e, "failed to save download");
                self.save_error = Some(format!("Could not save {}: {}", dest.display(), e));
            }
        }
    }

    fn dismiss_error(&mut self) {
        self.uploader.dismiss_error();
        self.error_shown_at = None;
    }

    /// The error toast hides itself after `error_display`.
    fn expire_error(&mut self, ctx: &egui::Context) {
        if self.uploader.error_message().is_none() {
            self.error_shown_at = None;
            return;
        }

        let shown_at = *self.error_shown_at.get_or_insert_with(Instant::now);
        let elapsed = shown_at.elapsed();
        if elapsed >= self.error_display {
            self.dismiss_error();
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(self.error_display - elapsed);
        }
    }

    fn clear_all(&mut self) {
        if let Err(err) = self.uploader.reset() {
            tracing::debug!(%err, "clear ignored");
            return;
        }
        self.error_shown_at = None;
        self.saved_to = None;
        self.save_error = None;
    }
}

impl App for TranslationUploader {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}
