mod app;

use anyhow::{Context, Result};
use app::UiApp;
use eco_core::EcoConfig;
use eframe::{NativeOptions, egui};
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt::init();
    let config = match load_config() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("{e:#}; falling back to defaults");
            EcoConfig::default()
        }
    };
    tracing::info!("Starting EcoClear with the {:?} backend", config.backend);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1040.0, 760.0])
            .with_min_inner_size([760.0, 560.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "EcoClear",
        options,
        Box::new(move |cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(cc, config)))
        }),
    ) {
        eprintln!("EcoClear stopped with an error: {e}");
    }
}

/// First CLI argument, else `ecoclear.toml` in the platform config dir.
fn config_path() -> PathBuf {
    if let Some(arg) = std::env::args_os().nth(1) {
        return PathBuf::from(arg);
    }
    directories_next::ProjectDirs::from("org", "EcoClear", "EcoClear")
        .map(|dirs| dirs.config_dir().join(EcoConfig::FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(EcoConfig::FILE_NAME))
}

fn load_config() -> Result<EcoConfig> {
    let path = config_path();
    let cfg = EcoConfig::load(&path)
        .with_context(|| format!("configuration {} unusable", path.display()))?;
    Ok(cfg)
}
