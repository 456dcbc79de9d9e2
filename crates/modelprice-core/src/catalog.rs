use chrono::{DateTime, NaiveDate, Utc};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

use crate::error::SchemaError;
use crate::schema::*;

/// Read-only catalog of models and providers, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    last_updated: Option<DateTime<Utc>>,
    providers: Vec<ProviderRecord>,
    models: Vec<ModelRecord>,
    index: HashMap<String, usize>,
}

impl CatalogStore {
    /// Build the store. Model ids must be unique: a repeated id keeps its
    /// first occurrence.
    pub fn new(
        last_updated: Option<DateTime<Utc>>,
        providers: Vec<ProviderRecord>,
        models: Vec<ModelRecord>,
    ) -> Self {
        let mut index = HashMap::with_capacity(models.len());
        let mut unique = Vec::with_capacity(models.len());
        for model in models {
            if index.contains_key(&model.id) {
                warn!(model_id = %model.id, "duplicate model id in catalog, keeping first");
                continue;
            }
            index.insert(model.id.clone(), unique.len());
            unique.push(model);
        }

        Self {
            last_updated,
            providers,
            models: unique,
            index,
        }
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn models(&self) -> &[ModelRecord] {
        &self.models
    }

    pub fn providers(&self) -> &[ProviderRecord] {
        &self.providers
    }

    pub fn model(&self, id: &str) -> Option<&ModelRecord> {
        self.index.get(id).map(|&i| &self.models[i])
    }

    pub fn contains_model(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderRecord> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Display name for a provider id, falling back to the id itself.
    pub fn provider_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.provider(id).map(|p| p.name.as_str()).unwrap_or(id)
    }

    pub fn models_by_provider(&self, provider: &str) -> Vec<&ModelRecord> {
        self.models.iter().filter(|m| m.provider == provider).collect()
    }

    pub fn statistics(&self) -> CatalogStatistics {
        let free_models = self.models.iter().filter(|m| m.is_free()).count();

        let paid: Vec<f64> = self
            .models
            .iter()
            .map(|m| m.pricing.input_per_mtok)
            .filter(|p| *p > 0.0)
            .collect();
        let price_range = if paid.is_empty() {
            None
        } else {
            Some(PriceRange {
                min: paid.iter().copied().fold(f64::INFINITY, f64::min),
                max: paid.iter().copied().fold(0.0, f64::max),
                average: paid.iter().sum::<f64>() / paid.len() as f64,
            })
        };

        let mut by_provider = BTreeMap::new();
        let mut by_status = BTreeMap::new();
        let mut by_feature = BTreeMap::new();
        for m in &self.models {
            *by_provider.entry(m.provider.clone()).or_insert(0) += 1;
            // unlabelled models count as generally available
            let status = m.status.unwrap_or(ModelStatus::Ga);
            *by_status.entry(status.to_string()).or_insert(0) += 1;
            for f in &m.features {
                *by_feature.entry(f.as_str().to_string()).or_insert(0) += 1;
            }
        }

        let windows: Vec<u64> = self.models.iter().filter_map(|m| m.context_window).collect();
        let context_windows = ContextWindowStats {
            min: windows.iter().copied().min(),
            max: windows.iter().copied().max(),
            over_100k: windows.iter().filter(|w| **w > 100_000).count(),
            over_1m: windows.iter().filter(|w| **w > 1_000_000).count(),
        };

        CatalogStatistics {
            total_models: self.models.len(),
            providers: self.providers.len(),
            free_models,
            paid_models: self.models.len() - free_models,
            price_range,
            by_provider,
            by_status,
            by_feature,
            context_windows,
        }
    }

    pub fn filter(&self, filter: &ModelFilter) -> Vec<&ModelRecord> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        self.models
            .iter()
            .filter(|m| match &filter.provider {
                ProviderFilter::All => true,
                ProviderFilter::Free => m.is_free(),
                ProviderFilter::Provider(id) => m.provider == *id,
            })
            .filter(|m| match &needle {
                Some(n) => m.search_text().contains(n.as_str()),
                None => true,
            })
            .collect()
    }

    /// Models the price calculator offers: those with a non-zero input
    /// price, cheapest input first, grouped by provider in order of first
    /// appearance.
    pub fn calculator_candidates(&self) -> Vec<ProviderGroup<'_>> {
        let mut priced: Vec<&ModelRecord> = self
            .models
            .iter()
            .filter(|m| m.pricing.input_per_mtok > 0.0)
            .collect();
        sort_models(&mut priced, SortKey::PriceAsc);

        let mut groups: Vec<ProviderGroup<'_>> = Vec::new();
        for model in priced {
            match groups.iter_mut().find(|g| g.provider_id == model.provider) {
                Some(group) => group.models.push(model),
                None => groups.push(ProviderGroup {
                    provider_id: &model.provider,
                    provider_name: self.provider_name(&model.provider),
                    models: vec![model],
                }),
            }
        }
        groups
    }

    /// Lowest and highest positive input price offered by a provider.
    pub fn provider_price_range(&self, provider: &str) -> Option<(f64, f64)> {
        self.models
            .iter()
            .filter(|m| m.provider == provider)
            .map(|m| m.pricing.input_per_mtok)
            .filter(|p| *p > 0.0)
            .fold(None, |range, p| match range {
                None => Some((p, p)),
                Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
            })
    }
}

#[derive(Debug, Clone)]
pub struct ProviderGroup<'a> {
    pub provider_id: &'a str,
    pub provider_name: &'a str,
    pub models: Vec<&'a ModelRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProviderFilter {
    #[default]
    All,
    Free,
    Provider(String),
}

/// `all` and `free` are keywords in any case; anything else is a provider
/// id, matched exactly.
impl From<&str> for ProviderFilter {
    fn from(s: &str) -> Self {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "all" | "" => ProviderFilter::All,
            "free" => ProviderFilter::Free,
            _ => ProviderFilter::Provider(s.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModelFilter {
    pub provider: ProviderFilter,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    PriceAsc,
    PriceDesc,
    Context,
    Release,
}

impl std::str::FromStr for SortKey {
    type Err = SchemaError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "price-asc" | "price" => Ok(SortKey::PriceAsc),
            "price-desc" => Ok(SortKey::PriceDesc),
            "context" => Ok(SortKey::Context),
            "release" | "date" => Ok(SortKey::Release),
            _ => Err(SchemaError::UnknownSortKey(s.to_string())),
        }
    }
}

fn release_key(model: &ModelRecord) -> NaiveDate {
    // undated models sort as if released at the start of 2020
    model
        .release_date
        .or_else(|| NaiveDate::from_ymd_opt(2020, 1, 1))
        .unwrap_or(NaiveDate::MIN)
}

/// Stable in-place sort of a model listing.
pub fn sort_models(models: &mut [&ModelRecord], key: SortKey) {
    let by_price = |a: &&ModelRecord, b: &&ModelRecord| {
        a.pricing
            .input_per_mtok
            .partial_cmp(&b.pricing.input_per_mtok)
            .unwrap_or(std::cmp::Ordering::Equal)
    };
    match key {
        SortKey::Name => models.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        }),
        SortKey::PriceAsc => models.sort_by(by_price),
        SortKey::PriceDesc => models.sort_by(|a, b| by_price(b, a)),
        SortKey::Context => models.sort_by(|a, b| {
            b.context_window
                .unwrap_or(0)
                .cmp(&a.context_window.unwrap_or(0))
        }),
        SortKey::Release => models.sort_by(|a, b| release_key(b).cmp(&release_key(a))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::pricing::Pricing;

    pub(crate) fn model(id: &str, provider: &str, input: f64, output: f64) -> ModelRecord {
        ModelRecord {
            id: id.to_string(),
            name: id.to_string(),
            provider: provider.to_string(),
            description: None,
            pricing: Pricing::new(input, output),
            context_window: None,
            max_output: None,
            features: Vec::new(),
            status: None,
            release_date: None,
        }
    }

    fn provider(id: &str, name: &str, model_count: usize) -> ProviderRecord {
        ProviderRecord {
            id: id.to_string(),
            name: name.to_string(),
            model_count,
            website: None,
            last_updated: None,
        }
    }

    pub(crate) fn sample_store() -> CatalogStore {
        let mut gemini = model("gemini-flash", "google", 0.0, 0.0);
        gemini.features = vec![Feature::Multimodal];
        gemini.context_window = Some(1_000_000);
        let mut gpt = model("gpt-4o", "openai", 2.50, 10.00);
        gpt.name = "GPT-4o".to_string();
        gpt.features = vec![Feature::Chat, Feature::Vision];
        gpt.context_window = Some(128_000);
        gpt.release_date = NaiveDate::from_ymd_opt(2024, 5, 13);
        let mut sonnet = model("sonnet", "anthropic", 3.00, 15.00);
        sonnet.description = Some("Most intelligent model".to_string());
        sonnet.context_window = Some(200_000);
        sonnet.release_date = NaiveDate::from_ymd_opt(2024, 6, 20);

        CatalogStore::new(
            None,
            vec![
                provider("anthropic", "Anthropic", 3),
                provider("google", "Google AI", 1),
                provider("openai", "OpenAI", 2),
            ],
            vec![
                gpt,
                model("gpt-4o-mini", "openai", 0.15, 0.60),
                model("haiku", "anthropic", 0.80, 4.00),
                sonnet,
                model("opus", "anthropic", 15.00, 75.00),
                gemini,
            ],
        )
    }

    fn ids(models: &[&ModelRecord]) -> Vec<String> {
        models.iter().map(|m| m.id.clone()).collect()
    }

    #[test]
    fn lookup_by_id_and_provider() {
        let store = sample_store();
        assert_eq!(store.model("opus").map(|m| m.provider.as_str()), Some("anthropic"));
        assert!(store.model("nope").is_none());
        assert_eq!(ids(&store.models_by_provider("anthropic")), vec!["haiku", "sonnet", "opus"]);
        assert_eq!(store.provider_name("openai"), "OpenAI");
        assert_eq!(store.provider_name("mystery"), "mystery");
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let store = CatalogStore::new(
            None,
            Vec::new(),
            vec![model("a", "x", 1.0, 1.0), model("a", "y", 9.0, 9.0)],
        );
        assert_eq!(store.models().len(), 1);
        assert_eq!(store.model("a").map(|m| m.provider.as_str()), Some("x"));
    }

    #[test]
    fn statistics_count_free_models() {
        let stats = sample_store().statistics();
        assert_eq!(stats.total_models, 6);
        assert_eq!(stats.providers, 3);
        assert_eq!(stats.free_models, 1);
        assert_eq!(stats.paid_models, 5);
    }

    #[test]
    fn statistics_breakdowns() {
        let stats = sample_store().statistics();
        let range = stats.price_range.unwrap();
        assert_eq!(range.min, 0.15);
        assert_eq!(range.max, 15.0);
        assert!((range.average - 21.45 / 5.0).abs() < 1e-9);
        assert_eq!(stats.by_provider.get("anthropic"), Some(&3));
        assert_eq!(stats.by_status.get("ga"), Some(&6));
        assert_eq!(stats.by_feature.get("vision"), Some(&1));
        assert_eq!(stats.context_windows.min, Some(128_000));
        assert_eq!(stats.context_windows.max, Some(1_000_000));
        assert_eq!(stats.context_windows.over_100k, 3);
        assert_eq!(stats.context_windows.over_1m, 0);
    }

    #[test]
    fn statistics_of_all_free_catalog_have_no_price_range() {
        let store = CatalogStore::new(None, Vec::new(), vec![model("f", "p", 0.0, 0.0)]);
        let stats = store.statistics();
        assert!(stats.price_range.is_none());
        assert_eq!(stats.context_windows.max, None);
    }

    #[test]
    fn provider_filter_keeps_id_case() {
        let store = CatalogStore::new(
            None,
            Vec::new(),
            vec![model("m", "OpenRouter", 1.0, 1.0), model("n", "openrouter", 1.0, 1.0)],
        );
        let hits = store.filter(&ModelFilter {
            provider: "OpenRouter".into(),
            search: None,
        });
        assert_eq!(ids(&hits), vec!["m"]);
        assert_eq!(ProviderFilter::from(" FREE "), ProviderFilter::Free);
        assert_eq!(ProviderFilter::from("All"), ProviderFilter::All);
    }

    #[test]
    fn filter_by_provider_free_and_search() {
        let store = sample_store();
        let openai = store.filter(&ModelFilter {
            provider: "openai".into(),
            search: None,
        });
        assert_eq!(ids(&openai), vec!["gpt-4o", "gpt-4o-mini"]);

        let free = store.filter(&ModelFilter {
            provider: ProviderFilter::Free,
            search: None,
        });
        assert_eq!(ids(&free), vec!["gemini-flash"]);

        let vision = store.filter(&ModelFilter {
            provider: ProviderFilter::All,
            search: Some("VISION".to_string()),
        });
        assert_eq!(ids(&vision), vec!["gpt-4o"]);

        let intelligent = store.filter(&ModelFilter {
            provider: ProviderFilter::All,
            search: Some("intelligent".to_string()),
        });
        assert_eq!(ids(&intelligent), vec!["sonnet"]);
    }

    #[test]
    fn sort_keys() {
        let store = sample_store();
        let mut all: Vec<&ModelRecord> = store.models().iter().collect();

        sort_models(&mut all, SortKey::PriceDesc);
        assert_eq!(all[0].id, "opus");
        assert_eq!(all[5].id, "gemini-flash");

        sort_models(&mut all, SortKey::Context);
        assert_eq!(all[0].id, "gemini-flash");
        assert_eq!(all[1].id, "sonnet");

        sort_models(&mut all, SortKey::Release);
        assert_eq!(ids(&all[..2]), vec!["sonnet", "gpt-4o"]);

        sort_models(&mut all, SortKey::Name);
        assert_eq!(all[0].id, "gemini-flash");
        assert_eq!(all[1].id, "gpt-4o");

        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn calculator_candidates_grouped_by_cheapest_provider() {
        let store = sample_store();
        let groups = store.calculator_candidates();
        let order: Vec<&str> = groups.iter().map(|g| g.provider_id).collect();
        assert_eq!(order, vec!["openai", "anthropic"]);
        assert_eq!(ids(&groups[0].models), vec!["gpt-4o-mini", "gpt-4o"]);
        assert_eq!(ids(&groups[1].models), vec!["haiku", "sonnet", "opus"]);
        assert_eq!(groups[1].provider_name, "Anthropic");
    }

    #[test]
    fn provider_price_range_ignores_free_models() {
        let store = sample_store();
        assert_eq!(store.provider_price_range("anthropic"), Some((0.80, 15.00)));
        assert_eq!(store.provider_price_range("google"), None);
    }
}
