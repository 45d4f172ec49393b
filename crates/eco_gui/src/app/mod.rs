//! eframe application: owns the classification session and draws it.

mod intake;
mod report;
mod textures;

use eco_core::{
    EcoConfig, ImageFile, Orchestrator, Rgb, Session, Waker, build_classifier, is_supported_image,
};
use eframe::{App, Frame, egui};
use rfd::FileDialog;
use std::path::Path;
use std::sync::Arc;
use textures::PreviewTextures;

const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "bmp", "gif"];

pub(crate) struct UiApp {
    config: EcoConfig,
    orchestrator: Orchestrator,
    textures: PreviewTextures,
    status: String,
    app_version: &'static str,
}

impl UiApp {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, config: EcoConfig) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        let orchestrator = start_session(&cc.egui_ctx, &config);
        Self {
            config,
            orchestrator,
            textures: PreviewTextures::default(),
            status: String::new(),
            app_version: env!("ECOCLEAR_VERSION"),
        }
    }

    /// Throws the whole session away and loads the model again.
    fn restart_session(&mut self, ctx: &egui::Context) {
        tracing::info!("Restarting session");
        self.textures.clear();
        self.status.clear();
        self.orchestrator = start_session(ctx, &self.config);
    }

    fn pick_file(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.offer_path(&path);
        }
    }

    fn offer_path(&mut self, path: &Path) {
        if !is_supported_image(path) {
            self.status = format!("Not a supported image: {}", path.display());
            return;
        }
        match ImageFile::from_path(path) {
            Ok(file) => self.offer_file(file),
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}", path.display());
                self.status = format!("Could not read {}: {e}", path.display());
            }
        }
    }

    fn offer_file(&mut self, file: ImageFile) {
        let name = file.name.clone();
        if self.orchestrator.select_file(file) {
            self.status.clear();
        } else {
            self.status = format!("Ignored {name}: the classifier is busy or offline");
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        // one image per analysis; extra files in the same drop are ignored
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(path) = file.path {
            self.offer_path(&path);
        } else if let Some(bytes) = file.bytes {
            if is_supported_image(Path::new(&file.name)) {
                self.offer_file(ImageFile::from_bytes(file.name, bytes));
            } else {
                self.status = format!("Not a supported image: {}", file.name);
            }
        }
    }

    fn render_header(&self, ui: &mut egui::Ui) {
        ui.add_space(10.0);
        ui.horizontal(|ui| {
            ui.label(
                egui::RichText::new("Eco")
                    .size(30.0)
                    .strong()
                    .color(egui::Color32::from_rgb(0x0f, 0x17, 0x2a)),
            );
            ui.label(
                egui::RichText::new("Clear")
                    .size(30.0)
                    .strong()
                    .italics()
                    .color(EMERALD),
            );
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new("Waste classification that runs entirely on this device.")
                    .color(egui::Color32::GRAY),
            );
        });
        ui.add_space(6.0);
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("●").color(EMERALD));
            ui.label(format!("EcoClear v{}", self.app_version));
            ui.separator();
            ui.label(
                egui::RichText::new("Your images never leave this computer.")
                    .small()
                    .color(egui::Color32::GRAY),
            );
            if !self.status.is_empty() {
                ui.separator();
                ui.label(&self.status);
            }
        });
    }
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.orchestrator.pump();
        self.textures.sync(
            ctx,
            self.orchestrator.previews(),
            self.orchestrator.session().preview(),
        );
        self.handle_dropped_files(ctx);
        if ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::O))
            && self.orchestrator.session().accepts_input()
        {
            self.pick_file();
        }

        egui::TopBottomPanel::top("header").show(ctx, |ui| self.render_header(ui));
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| self.render_footer(ui));
        egui::SidePanel::left("intake")
            .resizable(false)
            .exact_width(380.0)
            .show(ctx, |ui| self.render_intake_panel(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.render_report_panel(ui));

        if matches!(self.orchestrator.session(), Session::LoadingModel)
            || self.orchestrator.session().is_processing()
        {
            // keep spinners moving; results arrive through the waker
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}

const EMERALD: egui::Color32 = egui::Color32::from_rgb(0x10, 0xb9, 0x81);

fn color(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

fn start_session(ctx: &egui::Context, config: &EcoConfig) -> Orchestrator {
    let ctx = ctx.clone();
    let waker: Waker = Arc::new(move || ctx.request_repaint());
    Orchestrator::start_with_waker(build_classifier(config), config.preview_size, Some(waker))
}
