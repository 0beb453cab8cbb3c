use super::TranslationUploader;
use crate::utils::file_size::format_size;
use eframe::egui::{self, Align2, Color32, CursorIcon, RichText, Sense, Stroke};

const ACCENT: Color32 = Color32::from_rgb(33, 150, 243);
const DROP_ZONE_FILL: Color32 = Color32::from_rgb(240, 247, 255);
const DROP_ZONE_HOVER: Color32 = Color32::from_rgb(227, 242, 253);
const SUCCESS: Color32 = Color32::from_rgb(46, 125, 50);
const ERROR_FILL: Color32 = Color32::from_rgb(253, 236, 234);
const ERROR_TEXT: Color32 = Color32::from_rgb(211, 47, 47);

impl TranslationUploader {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                ui.heading(RichText::new("Upload CSV for Translations").strong());
                ui.add_space(5.0);
                ui.label(
                    RichText::new(format!("Server: {}", self.server_label))
                        .color(ui.visuals().text_color().gamma_multiply(0.7)),
                );
            });

            ui.add_space(20.0);
            self.render_drop_zone(ui);

            if self.uploader.selected_file().is_some() {
                ui.add_space(10.0);
                ui.vertical_centered(|ui| {
                    let remove = egui::Button::new(RichText::new("🗑 Remove File").color(ERROR_TEXT))
                        .stroke(Stroke::new(1.0, ERROR_TEXT));
                    if ui.add(remove).clicked() {
                        self.uploader.remove_file();
                    }
                });
            }

            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                if self.uploader.is_submitting() {
                    ui.add(egui::Spinner::new().size(24.0));
                    ui.label("Uploading...");
                } else {
                    let upload = egui::Button::new(
                        RichText::new("Upload & Process").color(Color32::WHITE),
                    )
                    .fill(ACCENT)
                    .min_size(egui::vec2(ui.available_width(), 40.0));
                    if ui.add_enabled(self.uploader.can_submit(), upload).clicked() {
                        self.submit();
                    }
                }
            });

            self.render_download(ui);

            let has_content =
                self.uploader.selected_file().is_some() || self.uploader.download().is_some();
            if has_content && !self.uploader.is_submitting() {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    if ui.small_button("Clear All").clicked() {
                        self.clear_all();
                    }
                });
            }
        });

        self.render_error_toast(ctx);
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let enabled = !self.uploader.is_submitting();
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let fill = if hovering && enabled {
            DROP_ZONE_HOVER
        } else {
            DROP_ZONE_FILL
        };

        let label = match self.uploader.selected_file() {
            Some(file) => match file.size() {
                Some(size) => format!("{} ({})", file.name(), format_size(size)),
                None => file.name().to_string(),
            },
            None => "Drag & Drop CSV here or Click to Upload".to_string(),
        };

        let response = egui::Frame::none()
            .fill(fill)
            .stroke(Stroke::new(2.0, ACCENT))
            .rounding(12.0)
            .inner_margin(32.0)
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("⬆").size(40.0).color(ACCENT));
                    ui.add_space(8.0);
                    ui.label(RichText::new(label).color(Color32::from_gray(60)));
                });
            })
            .response
            .interact(Sense::click());

        if enabled {
            let response = response.on_hover_cursor(CursorIcon::PointingHand);
            if response.clicked() {
                self.pick_file();
            }
        }
    }

    fn render_download(&mut self, ui: &mut egui::Ui) {
        if self.uploader.download().is_none() {
            return;
        }

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            let download = egui::Button::new(
                RichText::new("Download Translations").color(Color32::WHITE),
            )
            .fill(SUCCESS)
            .min_size(egui::vec2(ui.available_width(), 40.0));
            if ui.add(download).clicked() {
                self.save_download();
            }

            if let Some(path) = &self.saved_to {
                ui.add_space(5.0);
                ui.horizontal_wrapped(|ui| {
                    ui.colored_label(SUCCESS, format!("Saved to {}", path.display()));
                    if let Some(folder) = path.parent() {
                        if ui.link("Show in folder").clicked() {
                            if let Err(e) = open::that(folder) {
                                tracing::warn!(folder = %folder.display(), error = %e, "failed to open folder");
                            }
                        }
                    }
                });
            }

            if let Some(error) = &self.save_error {
                ui.add_space(5.0);
                ui.colored_label(ERROR_TEXT, error);
            }
        });
    }

    fn render_error_toast(&mut self, ctx: &egui::Context) {
        let Some(message) = self.uploader.error_message() else {
            return;
        };

        let mut dismissed = false;
        egui::Area::new(egui::Id::new("error_toast"))
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(ERROR_FILL)
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(ERROR_TEXT, format!("⚠ {}", message));
                            if ui.small_button("✖").clicked() {
                                dismissed = true;
                            }
                        });
                    });
            });

        if dismissed {
            self.dismiss_error();
        }
    }
}
