//! Right panel: preview, progress and the classification report.

use super::{EMERALD, UiApp, color};
use eco_core::{CategoryStyle, ClassificationResult, PreviewId, ReportView, report_view};
use eframe::egui;

const PREVIEW_MAX: f32 = 440.0;

impl UiApp {
    pub(super) fn render_report_panel(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| match report_view(self.orchestrator.session()) {
                ReportView::AwaitingInput => render_placeholder(ui),
                ReportView::Analyzing { preview } => {
                    self.render_preview(ui, preview, true);
                    ui.add_space(8.0);
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().color(EMERALD));
                        ui.label(egui::RichText::new("ANALYZING…").strong());
                    });
                }
                ReportView::Report {
                    preview,
                    result,
                    style,
                } => {
                    self.render_preview(ui, preview, false);
                    ui.add_space(12.0);
                    render_report(ui, result, &style);
                }
                ReportView::PreviewOnly { preview } => self.render_preview(ui, preview, false),
            });
    }

    fn render_preview(&self, ui: &mut egui::Ui, id: PreviewId, dimmed: bool) {
        let side = ui.available_width().min(PREVIEW_MAX);
        let tint = if dimmed {
            egui::Color32::from_white_alpha(110)
        } else {
            egui::Color32::WHITE
        };
        match self.textures.get(id) {
            Some(tex) => {
                let size = tex.size_vec2();
                let scale = side / size.x.max(size.y).max(1.0);
                ui.add(
                    egui::Image::from_texture(egui::load::SizedTexture::from_handle(tex))
                        .fit_to_exact_size(size * scale)
                        .tint(tint),
                );
            }
            None => {
                // thumbnail pending or undecodable: keep the slot so the layout does not jump
                let name = self
                    .orchestrator
                    .previews()
                    .get(id)
                    .map(|p| p.name.as_str())
                    .unwrap_or("preview");
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(side, side * 0.75), egui::Sense::hover());
                ui.painter().rect_filled(rect, 16.0, egui::Color32::from_gray(235));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    name,
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );
            }
        }
    }
}

fn render_placeholder(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(egui::RichText::new("🖼").size(48.0).color(egui::Color32::from_gray(200)));
        ui.add_space(8.0);
        ui.heading(egui::RichText::new("Awaiting an image").color(egui::Color32::GRAY));
        ui.label(
            egui::RichText::new("The analysis report appears here once a photo is chosen.")
                .color(egui::Color32::from_gray(170)),
        );
    });
}

fn render_report(ui: &mut egui::Ui, result: &ClassificationResult, style: &CategoryStyle) {
    egui::Frame::new()
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(230)))
        .corner_radius(20.0)
        .inner_margin(egui::Margin::same(20))
        .show(ui, |ui| {
            ui.set_max_width(PREVIEW_MAX);
            ui.horizontal(|ui| {
                ui.vertical(|ui| {
                    ui.label(
                        egui::RichText::new(result.category.name())
                            .size(30.0)
                            .strong(),
                    );
                    ui.horizontal(|ui| {
                        ui.label(egui::RichText::new("●").color(color(style.accent)));
                        ui.label(
                            egui::RichText::new(format!(
                                "CONFIDENCE {}%",
                                result.confidence_percent()
                            ))
                            .small()
                            .strong()
                            .color(egui::Color32::GRAY),
                        );
                    });
                });
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::Frame::new()
                        .fill(color(style.light))
                        .corner_radius(12.0)
                        .inner_margin(egui::Margin::same(10))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(style.icon)
                                    .size(28.0)
                                    .color(color(style.text)),
                            );
                        });
                });
            });
            ui.add(
                egui::ProgressBar::new(result.confidence.clamp(0.0, 1.0))
                    .fill(color(style.accent))
                    .desired_height(6.0),
            );

            ui.add_space(12.0);
            egui::Frame::new()
                .fill(color(style.light))
                .stroke(egui::Stroke::new(1.0, color(style.border)))
                .corner_radius(14.0)
                .inner_margin(egui::Margin::same(14))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(
                        egui::RichText::new("PROPER DISPOSAL")
                            .small()
                            .strong()
                            .color(color(style.text)),
                    );
                    ui.add_space(4.0);
                    ui.label(&result.disposal_instructions);
                });

            ui.add_space(10.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("MODEL LABEL").small().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new(&result.label).monospace());
                });
            });
            ui.label(
                egui::RichText::new(format!("Reasoning: {}", result.reasoning))
                    .small()
                    .italics()
                    .color(egui::Color32::GRAY),
            );
        });
}
