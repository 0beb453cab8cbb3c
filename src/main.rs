use anyhow::Context;
use eframe::CreationContext;
use translate_uploader::{logging, ReqwestTransport, TranslationUploader, Uploader, UploaderConfig};

fn main() -> anyhow::Result<()> {
    logging::init_logging();

    let config = UploaderConfig::load().context("failed to load configuration")?;
    let transport = ReqwestTransport::new(config.endpoint_url()?, config.timeout())
        .context("failed to build the HTTP client")?;
    let server_label = transport
        .endpoint()
        .host_str()
        .unwrap_or(config.endpoint.as_str())
        .to_string();
    let mut uploader =
        Uploader::new(transport, config.file_filter()?, config.download_name.clone());
    if let Some(dir) = &config.spool_dir {
        uploader = uploader.with_spool_dir(dir);
    }
    let error_display = config.error_display();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([520.0, 560.0])
            .with_min_inner_size([400.0, 460.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CSV Translation Uploader",
        options,
        Box::new(move |cc: &CreationContext| {
            Box::new(TranslationUploader::new(cc, uploader, server_label, error_display))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to start the UI: {e}"))
}
