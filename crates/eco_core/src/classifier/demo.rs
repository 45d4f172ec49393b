use super::{ClassifierError, WasteClassifier};
use crate::classification::ClassificationResult;
use crate::intake::ImageFile;
use crate::rules;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Model-free backend for demos and UI work.
///
/// The image must decode, but the label is taken from the file name
/// (`banana_peel.jpg` is labeled "banana peel"). Confidence is derived from
/// the image bytes so the same file always gets the same result.
#[derive(Debug)]
pub struct DemoClassifier {
    latency: Duration,
    min_confidence: f32,
    loaded: AtomicBool,
}

impl DemoClassifier {
    pub fn new(latency: Duration, min_confidence: f32) -> Self {
        Self {
            latency,
            min_confidence,
            loaded: AtomicBool::new(false),
        }
    }
}

impl WasteClassifier for DemoClassifier {
    fn load_model(&self) -> Result<(), ClassifierError> {
        std::thread::sleep(self.latency);
        self.loaded.store(true, Ordering::Release);
        tracing::info!("Demo classifier ready");
        Ok(())
    }

    fn classify(&self, image: &ImageFile) -> Result<ClassificationResult, ClassifierError> {
        if !self.loaded.load(Ordering::Acquire) {
            return Err(ClassifierError::NotLoaded);
        }
        image::load_from_memory(&image.bytes).map_err(|source| ClassifierError::Decode {
            name: image.name.clone(),
            source,
        })?;
        std::thread::sleep(self.latency);

        let label = image
            .stem()
            .split(|c: char| c == '_' || c == '-' || c.is_whitespace())
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let confidence = 0.6 + (fnv1a(&image.bytes) % 40) as f32 / 100.0;
        Ok(rules::interpret(&label, confidence, self.min_confidence))
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0xcbf29ce484222325, |hash, &b| {
        (hash ^ b as u64).wrapping_mul(0x100000001b3)
    })
}
