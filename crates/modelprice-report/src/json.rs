use anyhow::Result;
use modelprice_core::*;

use crate::terminal::annual_projection;

pub fn render_projection(projection: &Projection) -> Result<String> {
    let annual: Vec<serde_json::Value> = annual_projection(&projection.results)
        .into_iter()
        .map(|(model, annual)| serde_json::json!({ "model_id": model.id, "annual_cost": annual }))
        .collect();

    let doc = serde_json::json!({
        "scenario": projection.scenario,
        "results": projection.results,
        "savings": projection.savings,
        "annual_projection": annual,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn render_models(models: &[&ModelRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(models)?)
}

pub fn render_providers(catalog: &CatalogStore) -> Result<String> {
    let doc = serde_json::json!({
        "last_updated": catalog.last_updated(),
        "statistics": catalog.statistics(),
        "providers": catalog.providers(),
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn render_changes(changes: &[PriceChange], previous: &CatalogStore, current: &CatalogStore) -> Result<String> {
    let count = |kind: ChangeKind| changes.iter().filter(|c| c.kind == kind).count();
    let doc = serde_json::json!({
        "previous_updated": previous.last_updated(),
        "current_updated": current.last_updated(),
        "summary": {
            "new": count(ChangeKind::New),
            "increase": count(ChangeKind::Increase),
            "decrease": count(ChangeKind::Decrease),
        },
        "changes": changes,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, input: f64) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            provider: "p".to_string(),
            description: None,
            pricing: Pricing::new(input, 0.0),
            context_window: Some(8_000),
            max_output: None,
            features: vec![Feature::Chat],
            status: Some(ModelStatus::Beta),
            release_date: None,
        }
    }

    #[test]
    fn projection_document_shape() {
        let scenario = UsageScenario::new(1_000_000, 0, 4);
        let results = vec![
            CostResult::for_model(&record("a", 1.0), &scenario),
            CostResult::for_model(&record("b", 3.0), &scenario),
        ];
        let projection = Projection {
            scenario,
            savings: analyze_savings(&results),
            results,
        };

        let out = render_projection(&projection).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v["results"].as_array().unwrap().len(), 2);
        assert_eq!(v["results"][0]["model"]["id"], "a");
        assert_eq!(v["results"][0]["cost_per_request"], 0.25);
        assert_eq!(v["savings"]["absolute_savings"], 2.0);
        assert_eq!(v["annual_projection"][1]["annual_cost"], 36.0);
    }

    #[test]
    fn empty_projection_has_null_savings() {
        let projection = Projection {
            scenario: UsageScenario::default(),
            results: vec![],
            savings: None,
        };
        let v: serde_json::Value =
            serde_json::from_str(&render_projection(&projection).unwrap()).unwrap();
        assert!(v["savings"].is_null());
        assert!(v["results"].as_array().unwrap().is_empty());
    }

    #[test]
    fn providers_document_carries_statistics() {
        let catalog = CatalogStore::new(
            None,
            vec![ProviderRecord {
                id: "p".to_string(),
                name: "P".to_string(),
                model_count: 2,
                website: None,
                last_updated: None,
            }],
            vec![record("a", 1.0), record("free", 0.0)],
        );
        let v: serde_json::Value =
            serde_json::from_str(&render_providers(&catalog).unwrap()).unwrap();
        assert_eq!(v["statistics"]["total_models"], 2);
        assert_eq!(v["statistics"]["free_models"], 1);
        assert_eq!(v["statistics"]["price_range"]["min"], 1.0);
        assert_eq!(v["statistics"]["by_status"]["beta"], 2);
        assert_eq!(v["statistics"]["by_feature"]["chat"], 2);
        assert_eq!(v["statistics"]["context_windows"]["over_100k"], 0);
        assert_eq!(v["providers"][0]["id"], "p");
    }

    #[test]
    fn changes_document_lists_deltas() {
        let previous = CatalogStore::new(None, vec![], vec![record("a", 4.0)]);
        let current = CatalogStore::new(None, vec![], vec![record("a", 2.0), record("b", 1.0)]);
        let changes = diff_catalogs(&previous, &current);

        let v: serde_json::Value =
            serde_json::from_str(&render_changes(&changes, &previous, &current).unwrap()).unwrap();
        assert_eq!(v["summary"]["decrease"], 1);
        assert_eq!(v["summary"]["new"], 1);
        assert_eq!(v["changes"][0]["kind"], "decrease");
        assert_eq!(v["changes"][0]["input"]["change_percent"], -50.0);
        assert_eq!(v["changes"][0]["output"]["change_percent"], 0.0);
        assert!(v["changes"][1]["input"]["old"].is_null());
    }
}
