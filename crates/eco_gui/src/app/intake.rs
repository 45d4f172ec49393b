//! Left panel: model status, drop zone and usage hints.

use super::{EMERALD, UiApp, color};
use eco_core::{Backend, IntakeView, Rgb, category_style, intake_view};
use eframe::egui;

const ROSE: Rgb = Rgb(0xe1, 0x1d, 0x48);
const ROSE_LIGHT: Rgb = Rgb(0xff, 0xf1, 0xf2);

impl UiApp {
    pub(super) fn render_intake_panel(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        match intake_view(self.orchestrator.session()) {
            IntakeView::DeployingModel => self.render_deploying(ui),
            IntakeView::Offline { message } => {
                egui::Frame::new()
                    .fill(color(ROSE_LIGHT))
                    .corner_radius(12.0)
                    .inner_margin(egui::Margin::same(16))
                    .show(ui, |ui| {
                        ui.vertical_centered(|ui| {
                            ui.label(egui::RichText::new("System error").strong().color(color(ROSE)));
                            ui.add_space(4.0);
                            ui.label(message);
                            ui.add_space(8.0);
                            if ui.button("Retry load").clicked() {
                                let ctx = ui.ctx().clone();
                                self.restart_session(&ctx);
                            }
                        });
                    });
            }
            IntakeView::Dropzone { enabled, notice } => {
                self.render_dropzone(ui, enabled);
                if let Some(notice) = notice {
                    ui.add_space(8.0);
                    ui.colored_label(color(ROSE), notice);
                }
                ui.add_space(12.0);
                self.render_info_cards(ui);
            }
        }

        ui.add_space(20.0);
        ui.label(egui::RichText::new("HOW TO USE").small().strong());
        ui.add_space(4.0);
        for (i, step) in [
            "Take a clear photo of your item",
            "The model identifies the material",
            "Follow the disposal guide",
        ]
        .iter()
        .enumerate()
        {
            ui.label(format!("{}.  {step}", i + 1));
        }
    }

    fn render_deploying(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(30.0);
            ui.add(egui::Spinner::new().size(48.0).color(EMERALD));
            ui.add_space(12.0);
            ui.heading("Deploying neural network");
            let what = match self.config.backend {
                Backend::Onnx => format!("Loading {}", self.config.model.model_path.display()),
                Backend::Demo => "Preparing the demo classifier".to_string(),
            };
            ui.label(egui::RichText::new(what).color(egui::Color32::GRAY));
        });
    }

    fn render_dropzone(&mut self, ui: &mut egui::Ui, enabled: bool) {
        let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
        let accent = category_style(&eco_core::WasteCategory::Glass);
        let (fill, stroke) = if hovering && enabled {
            (color(accent.light), color(accent.accent))
        } else {
            (egui::Color32::from_gray(248), egui::Color32::from_gray(210))
        };
        egui::Frame::new()
            .fill(fill)
            .stroke(egui::Stroke::new(2.0, stroke))
            .corner_radius(16.0)
            .inner_margin(egui::Margin::same(24))
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(egui::RichText::new("📷").size(36.0));
                    ui.add_space(6.0);
                    let prompt = if enabled {
                        "Drop a photo here"
                    } else {
                        "Analyzing, please wait…"
                    };
                    ui.label(egui::RichText::new(prompt).strong());
                    ui.add_space(8.0);
                    if ui
                        .add_enabled(enabled, egui::Button::new("Choose photo…"))
                        .on_hover_text("Ctrl+O")
                        .clicked()
                    {
                        self.pick_file();
                    }
                });
            });
    }

    fn render_info_cards(&self, ui: &mut egui::Ui) {
        let model = match self.config.backend {
            Backend::Onnx => self
                .config
                .model
                .model_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "ONNX model".to_string()),
            Backend::Demo => "Demo (file names)".to_string(),
        };
        ui.columns(2, |cols| {
            info_card(&mut cols[0], "PRIVACY", "100% on-device");
            info_card(&mut cols[1], "MODEL", &model);
        });
    }
}

fn info_card(ui: &mut egui::Ui, title: &str, value: &str) {
    egui::Frame::new()
        .fill(egui::Color32::from_gray(246))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(10))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(
                egui::RichText::new(title)
                    .small()
                    .strong()
                    .color(egui::Color32::GRAY),
            );
            ui.label(egui::RichText::new(value).strong());
        });
}
