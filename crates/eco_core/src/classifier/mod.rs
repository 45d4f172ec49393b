//! The classification collaborator and its backends.

use crate::classification::ClassificationResult;
use crate::intake::ImageFile;
use std::path::PathBuf;
use thiserror::Error;

mod demo;
#[cfg(feature = "ort")]
mod onnx;

pub use demo::DemoClassifier;
#[cfg(feature = "ort")]
pub use onnx::OnnxClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("model file missing: {}", .0.display())]
    ModelMissing(PathBuf),
    #[error("labels file invalid: {0}")]
    Labels(String),
    #[error("backend `{0}` is not available in this build")]
    BackendUnavailable(String),
    #[error("model is not loaded")]
    NotLoaded,
    #[error("cannot decode image {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("classifier panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Loads a model once and classifies images with it.
///
/// Both calls block; callers run them off the UI thread.
pub trait WasteClassifier: Send + Sync {
    fn load_model(&self) -> Result<(), ClassifierError>;
    fn classify(&self, image: &ImageFile) -> Result<ClassificationResult, ClassifierError>;
}

/// Stand-in for a backend that was not compiled in. Loading always fails.
#[derive(Debug, Clone)]
pub struct UnavailableClassifier {
    backend: String,
}

impl UnavailableClassifier {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }
}

impl WasteClassifier for UnavailableClassifier {
    fn load_model(&self) -> Result<(), ClassifierError> {
        Err(ClassifierError::BackendUnavailable(self.backend.clone()))
    }

    fn classify(&self, _image: &ImageFile) -> Result<ClassificationResult, ClassifierError> {
        Err(ClassifierError::BackendUnavailable(self.backend.clone()))
    }
}
