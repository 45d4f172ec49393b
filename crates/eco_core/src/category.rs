//! Waste categories produced by the classifier.

use serde::{Deserialize, Serialize};
use std::fmt;

const GENERAL_WASTE: &str = "General Waste";

/// Material category of a classified item.
///
/// The named variants form the closed set the presenter has themes for.
/// Anything else, including the general-waste fallback and names a newer
/// classifier might emit, is carried in [`WasteCategory::Other`].
///
/// Serialized as its display name and parsed back with
/// [`WasteCategory::from_name`]. Parsing normalizes: an `Other` holding a
/// known name such as `"plastic"` reads back as the named variant, while any
/// other `Other` name comes back verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WasteCategory {
    Organic,
    Plastic,
    Paper,
    Metal,
    Glass,
    EWaste,
    Other(String),
}

impl WasteCategory {
    /// Parses a category name. Never fails: unknown names become `Other`.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let key: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "organic" => WasteCategory::Organic,
            "plastic" => WasteCategory::Plastic,
            "paper" => WasteCategory::Paper,
            "metal" => WasteCategory::Metal,
            "glass" => WasteCategory::Glass,
            "ewaste" | "electronic" | "electronicwaste" => WasteCategory::EWaste,
            _ => WasteCategory::Other(trimmed.to_string()),
        }
    }

    /// Fallback used when no material rule applies.
    pub fn general() -> Self {
        WasteCategory::Other(GENERAL_WASTE.to_string())
    }

    pub fn name(&self) -> &str {
        match self {
            WasteCategory::Organic => "Organic",
            WasteCategory::Plastic => "Plastic",
            WasteCategory::Paper => "Paper",
            WasteCategory::Metal => "Metal",
            WasteCategory::Glass => "Glass",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Other(name) => name,
        }
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<String> for WasteCategory {
    fn from(name: String) -> Self {
        WasteCategory::from_name(&name)
    }
}

impl From<WasteCategory> for String {
    fn from(category: WasteCategory) -> Self {
        category.name().to_string()
    }
}
