use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::pricing::Pricing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Ga,
    Beta,
    Preview,
    Experimental,
    Deprecated,
}

impl ModelStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ModelStatus::Ga => "GA",
            ModelStatus::Beta => "Beta",
            ModelStatus::Preview => "Preview",
            ModelStatus::Experimental => "Experimental",
            ModelStatus::Deprecated => "Deprecated",
        }
    }
}

impl std::fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelStatus::Ga => write!(f, "ga"),
            ModelStatus::Beta => write!(f, "beta"),
            ModelStatus::Preview => write!(f, "preview"),
            ModelStatus::Experimental => write!(f, "experimental"),
            ModelStatus::Deprecated => write!(f, "deprecated"),
        }
    }
}

impl std::str::FromStr for ModelStatus {
    type Err = SchemaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ga" | "stable" => Ok(ModelStatus::Ga),
            "beta" => Ok(ModelStatus::Beta),
            "preview" => Ok(ModelStatus::Preview),
            "experimental" => Ok(ModelStatus::Experimental),
            "deprecated" => Ok(ModelStatus::Deprecated),
            _ => Err(SchemaError::UnknownStatus(s.to_string())),
        }
    }
}

/// Capability tag attached to a model. Tags outside the known set are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Feature {
    Chat,
    Vision,
    FunctionCalling,
    JsonMode,
    ToolUse,
    Reasoning,
    Coding,
    Multimodal,
    Audio,
    Video,
    ComputerUse,
    Other(String),
}

impl Feature {
    pub fn as_str(&self) -> &str {
        match self {
            Feature::Chat => "chat",
            Feature::Vision => "vision",
            Feature::FunctionCalling => "function-calling",
            Feature::JsonMode => "json-mode",
            Feature::ToolUse => "tool-use",
            Feature::Reasoning => "reasoning",
            Feature::Coding => "coding",
            Feature::Multimodal => "multimodal",
            Feature::Audio => "audio",
            Feature::Video => "video",
            Feature::ComputerUse => "computer-use",
            Feature::Other(tag) => tag,
        }
    }
}

impl From<String> for Feature {
    fn from(tag: String) -> Self {
        match tag.to_lowercase().as_str() {
            "chat" => Feature::Chat,
            "vision" => Feature::Vision,
            "function-calling" | "function_calling" => Feature::FunctionCalling,
            "json-mode" | "json_mode" => Feature::JsonMode,
            "tool-use" | "tool_use" => Feature::ToolUse,
            "reasoning" => Feature::Reasoning,
            "coding" => Feature::Coding,
            "multimodal" => Feature::Multimodal,
            "audio" => Feature::Audio,
            "video" => Feature::Video,
            "computer-use" | "computer_use" => Feature::ComputerUse,
            _ => Feature::Other(tag),
        }
    }
}

impl From<Feature> for String {
    fn from(feature: Feature) -> Self {
        feature.as_str().to_string()
    }
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub description: Option<String>,
    pub pricing: Pricing,
    pub context_window: Option<u64>,
    pub max_output: Option<u64>,
    pub features: Vec<Feature>,
    pub status: Option<ModelStatus>,
    pub release_date: Option<NaiveDate>,
}

impl ModelRecord {
    pub fn is_free(&self) -> bool {
        self.pricing.input_per_mtok == 0.0
    }

    pub fn has_feature(&self, feature: &Feature) -> bool {
        self.features.contains(feature)
    }

    /// Lowercased haystack for free-text search: name, description,
    /// provider id and feature tags.
    pub fn search_text(&self) -> String {
        let mut parts: Vec<&str> = vec![&self.name];
        if let Some(desc) = &self.description {
            parts.push(desc);
        }
        parts.push(&self.provider);
        let mut text = parts.join(" ");
        // tags are matched in both their dashed and underscored spellings
        for f in &self.features {
            text.push(' ');
            text.push_str(f.as_str());
            if f.as_str().contains('-') {
                text.push(' ');
                text.push_str(&f.as_str().replace('-', "_"));
            }
        }
        text.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    pub model_count: usize,
    pub website: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStatistics {
    pub total_models: usize,
    pub providers: usize,
    pub free_models: usize,
    pub paid_models: usize,
    /// Input price spread over paid models; `None` when every model is free.
    pub price_range: Option<PriceRange>,
    pub by_provider: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    pub by_feature: BTreeMap<String, usize>,
    pub context_windows: ContextWindowStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindowStats {
    pub min: Option<u64>,
    pub max: Option<u64>,
    pub over_100k: usize,
    pub over_1m: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("GA".parse::<ModelStatus>().unwrap(), ModelStatus::Ga);
        assert_eq!("Preview".parse::<ModelStatus>().unwrap(), ModelStatus::Preview);
        assert!("retired".parse::<ModelStatus>().is_err());
    }

    #[test]
    fn search_text_carries_both_tag_spellings() {
        let record = ModelRecord {
            id: "m".to_string(),
            name: "M".to_string(),
            provider: "p".to_string(),
            description: None,
            pricing: Pricing::FREE,
            context_window: None,
            max_output: None,
            features: vec![Feature::from("function_calling".to_string())],
            status: None,
            release_date: None,
        };
        let text = record.search_text();
        assert!(text.contains("function_calling"));
        assert!(text.contains("function-calling"));
    }

    #[test]
    fn unknown_feature_tags_survive_serde() {
        let tags: Vec<Feature> =
            serde_json::from_str(r#"["vision", "tool_use", "embeddings"]"#).unwrap();
        assert_eq!(
            tags,
            vec![
                Feature::Vision,
                Feature::ToolUse,
                Feature::Other("embeddings".to_string())
            ]
        );
        let back = serde_json::to_string(&tags).unwrap();
        assert_eq!(back, r#"["vision","tool-use","embeddings"]"#);
    }
}
