use anyhow::Result;
use archivist_client::{ui::ArchivistApp, ClientConfig};
use eframe::egui;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "archivist=debug,archivist_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Archivist...");

    let config = ClientConfig::load()?;
    tracing::debug!(server_url = %config.server_url, per_page = config.per_page, "Loaded config");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Archivist"),
        ..Default::default()
    };

    eframe::run_native(
        "Archivist",
        options,
        Box::new(move |cc| Ok(Box::new(ArchivistApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run eframe: {}", e))?;

    Ok(())
}
