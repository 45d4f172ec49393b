//! Core of EcoClear: waste classification session logic, independent of any
//! UI toolkit.

pub mod category;
pub mod classification;
pub mod classifier;
pub mod config;
pub mod intake;
pub mod orchestrator;
pub mod presenter;
pub mod rules;
pub mod session;
pub mod style;

use std::sync::Arc;

pub use category::WasteCategory;
pub use classification::ClassificationResult;
pub use classifier::{ClassifierError, DemoClassifier, UnavailableClassifier, WasteClassifier};
pub use config::{Backend, ConfigError, EcoConfig, ModelConfig};
pub use intake::{
    ImageFile, Preview, PreviewId, PreviewStore, decode_thumbnail, is_supported_image,
};
pub use orchestrator::{Orchestrator, Waker};
pub use presenter::{IntakeView, ReportView, intake_view, report_view};
pub use session::{ANALYSIS_FAILED_MESSAGE, OFFLINE_MESSAGE, Session};
pub use style::{CategoryStyle, Rgb, category_style};

/// Builds the classifier selected by `cfg.backend`.
pub fn build_classifier(cfg: &EcoConfig) -> Arc<dyn WasteClassifier> {
    match cfg.backend {
        Backend::Demo => Arc::new(DemoClassifier::new(cfg.demo_latency(), cfg.min_confidence)),
        #[cfg(feature = "ort")]
        Backend::Onnx => Arc::new(classifier::OnnxClassifier::new(
            cfg.model.clone(),
            cfg.min_confidence,
        )),
        #[cfg(not(feature = "ort"))]
        Backend::Onnx => {
            tracing::warn!("Built without the `ort` feature; the ONNX backend is unavailable");
            Arc::new(UnavailableClassifier::new("onnx"))
        }
    }
}
