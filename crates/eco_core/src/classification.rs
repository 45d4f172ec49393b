use crate::category::WasteCategory;
use serde::{Deserialize, Serialize};

/// Outcome of one classification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: WasteCategory,
    /// Model confidence in [0,1].
    pub confidence: f32,
    /// Raw label reported by the model.
    pub label: String,
    pub disposal_instructions: String,
    pub reasoning: String,
}

impl ClassificationResult {
    /// Confidence as a whole percentage, clamped to 0..=100.
    pub fn confidence_percent(&self) -> u8 {
        (self.confidence.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}
