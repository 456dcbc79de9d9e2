use modelprice_core::*;

/// Minimal built-in catalog used when no data file can be read.
pub fn sample_catalog() -> CatalogStore {
    let providers = vec![
        ProviderRecord {
            id: "anthropic".to_string(),
            name: "Anthropic".to_string(),
            model_count: 1,
            website: Some("https://www.anthropic.com".to_string()),
            last_updated: None,
        },
        ProviderRecord {
            id: "openai".to_string(),
            name: "OpenAI".to_string(),
            model_count: 1,
            website: Some("https://openai.com".to_string()),
            last_updated: None,
        },
    ];

    let models = vec![
        ModelRecord {
            id: "gpt-4o".to_string(),
            name: "GPT-4o".to_string(),
            provider: "openai".to_string(),
            description: Some("Most capable model with multimodal abilities".to_string()),
            pricing: Pricing::new(2.50, 10.00),
            context_window: Some(128_000),
            max_output: None,
            features: vec![Feature::Chat, Feature::Vision, Feature::FunctionCalling],
            status: Some(ModelStatus::Ga),
            release_date: None,
        },
        ModelRecord {
            id: "claude-3-5-sonnet".to_string(),
            name: "Claude 3.5 Sonnet".to_string(),
            provider: "anthropic".to_string(),
            description: Some("Most intelligent model".to_string()),
            pricing: Pricing::new(3.00, 15.00),
            context_window: Some(200_000),
            max_output: None,
            features: vec![Feature::Chat, Feature::Vision, Feature::ToolUse],
            status: Some(ModelStatus::Ga),
            release_date: None,
        },
    ];

    CatalogStore::new(None, providers, models)
}
