use super::{ClassifierError, WasteClassifier};
use crate::classification::ClassificationResult;
use crate::config::ModelConfig;
use crate::intake::ImageFile;
use crate::rules;
use image::{DynamicImage, RgbaImage, imageops::FilterType};
use ndarray::{Array4, CowArray};
use once_cell::sync::OnceCell;
use ort::{
    GraphOptimizationLevel, SessionBuilder, environment::Environment, session::Session,
    tensor::OrtOwnedTensor, value::Value,
};
use std::fs;
use std::sync::{Arc, Mutex};

static ORT_ENV: OnceCell<Arc<Environment>> = OnceCell::new();

/// Shared runtime environment, created on first use. A failed start is
/// reported to the caller and retried on the next load.
fn ort_env() -> Result<Arc<Environment>, ClassifierError> {
    ORT_ENV
        .get_or_try_init(|| {
            Environment::builder()
                .with_name("ecoclear")
                .build()
                .map(Environment::into_arc)
        })
        .cloned()
        .map_err(|e| {
            ClassifierError::Inference(format!("ONNX Runtime environment unavailable: {e}"))
        })
}

struct Loaded {
    session: Session,
    labels: Vec<String>,
}

/// ImageNet classifier backed by ONNX Runtime.
pub struct OnnxClassifier {
    cfg: ModelConfig,
    min_confidence: f32,
    loaded: Mutex<Option<Loaded>>,
}

impl OnnxClassifier {
    pub fn new(cfg: ModelConfig, min_confidence: f32) -> Self {
        Self {
            cfg,
            min_confidence,
            loaded: Mutex::new(None),
        }
    }

    fn inference_err(e: impl std::fmt::Display) -> ClassifierError {
        ClassifierError::Inference(e.to_string())
    }

    fn prepare_input(&self, image: &ImageFile) -> Result<Array4<f32>, ClassifierError> {
        let img = image::load_from_memory(&image.bytes).map_err(|source| {
            ClassifierError::Decode {
                name: image.name.clone(),
                source,
            }
        })?;
        let size = self.cfg.input_size;
        let resized = resize_to_square(img, size);
        let (mean, std) = (self.cfg.mean, self.cfg.std);
        let mut array = Array4::<f32>::zeros((1, 3, size as usize, size as usize));
        for (x, y, pixel) in resized.enumerate_pixels() {
            let [r, g, b, _] = pixel.0;
            let (y, x) = (y as usize, x as usize);
            array[[0, 0, y, x]] = normalize_channel(r, mean[0], std[0]);
            array[[0, 1, y, x]] = normalize_channel(g, mean[1], std[1]);
            array[[0, 2, y, x]] = normalize_channel(b, mean[2], std[2]);
        }
        Ok(array)
    }
}

impl WasteClassifier for OnnxClassifier {
    fn load_model(&self) -> Result<(), ClassifierError> {
        if !self.cfg.model_path.exists() {
            return Err(ClassifierError::ModelMissing(self.cfg.model_path.clone()));
        }
        if !self.cfg.labels_path.exists() {
            return Err(ClassifierError::Labels(format!(
                "missing: {}",
                self.cfg.labels_path.display()
            )));
        }
        let env = ort_env()?;
        let session = SessionBuilder::new(&env)
            .and_then(|b| b.with_optimization_level(GraphOptimizationLevel::Level1))
            .and_then(|b| b.with_model_from_file(&self.cfg.model_path))
            .map_err(Self::inference_err)?;

        let labels = parse_labels(&fs::read_to_string(&self.cfg.labels_path)?)?;
        tracing::info!(
            "Loaded {} with {} labels",
            self.cfg.model_path.display(),
            labels.len()
        );
        let mut slot = self
            .loaded
            .lock()
            .map_err(|_| ClassifierError::Inference("model lock poisoned".into()))?;
        *slot = Some(Loaded { session, labels });
        Ok(())
    }

    fn classify(&self, image: &ImageFile) -> Result<ClassificationResult, ClassifierError> {
        let tensor = self.prepare_input(image)?;
        let slot = self
            .loaded
            .lock()
            .map_err(|_| ClassifierError::Inference("model lock poisoned".into()))?;
        let loaded = slot.as_ref().ok_or(ClassifierError::NotLoaded)?;

        let input_array = tensor.into_dyn();
        let cow = CowArray::from(input_array.view());
        let input =
            Value::from_array(loaded.session.allocator(), &cow).map_err(Self::inference_err)?;
        let outputs: Vec<Value> = loaded
            .session
            .run(vec![input])
            .map_err(Self::inference_err)?;
        let first = outputs
            .first()
            .ok_or_else(|| ClassifierError::Inference("model produced no output".into()))?;
        let logits: OrtOwnedTensor<f32, _> = first.try_extract().map_err(Self::inference_err)?;
        let scores: Vec<f32> = logits.view().iter().cloned().collect();

        let (best_idx, best_prob) = top1(&softmax(&scores))
            .ok_or_else(|| ClassifierError::Inference("empty logits".into()))?;
        let label = loaded
            .labels
            .get(best_idx)
            .cloned()
            .unwrap_or_else(|| format!("class_{best_idx}"));
        tracing::debug!("{}: top label {label} ({best_prob:.3})", image.name);
        Ok(rules::interpret(&label, best_prob, self.min_confidence))
    }
}

fn parse_labels(raw: &str) -> Result<Vec<String>, ClassifierError> {
    let labels: Vec<String> = raw
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect();
    if labels.is_empty() {
        return Err(ClassifierError::Labels("no labels".into()));
    }
    Ok(labels)
}

fn resize_to_square(img: DynamicImage, size: u32) -> RgbaImage {
    img.resize_exact(size, size, FilterType::Triangle)
        .to_rgba8()
}

fn normalize_channel(value: u8, mean: f32, std: f32) -> f32 {
    let v = value as f32 / 255.0;
    (v - mean) / std
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|x| x / sum).collect()
}

fn top1(probs: &[f32]) -> Option<(usize, f32)> {
    probs
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
}
