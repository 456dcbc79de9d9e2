/// Reader for the consolidated catalog payload (`data/consolidated.json`).
///
/// Layout:
///   { last_updated, providers: { <id>: {name, model_count, website, last_updated} },
///     models: [ {id, name, provider, pricing: {input, output} | input_price/output_price, ...} ],
///     statistics: {...} }
///
/// Scraped data is loose: numbers sometimes arrive as strings, timestamps
/// come with or without a UTC offset, and the two pricing shapes coexist.
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use modelprice_core::*;

#[derive(Debug, Deserialize)]
struct RawCatalog {
    last_updated: Option<String>,
    #[serde(default)]
    providers: BTreeMap<String, RawProvider>,
    #[serde(default)]
    models: Vec<RawModel>,
    // daily history snapshots carry a flat price list instead of `models`
    timestamp: Option<String>,
    #[serde(default)]
    price_snapshot: Vec<RawModel>,
}

#[derive(Debug, Deserialize)]
struct RawProvider {
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    model_count: Option<u64>,
    website: Option<String>,
    last_updated: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPricing {
    #[serde(default, deserialize_with = "lenient_f64")]
    input: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    output: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    id: Option<String>,
    name: Option<String>,
    provider: Option<String>,
    description: Option<String>,
    pricing: Option<RawPricing>,
    #[serde(default, deserialize_with = "lenient_f64")]
    input_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    output_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    context_window: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    max_output: Option<u64>,
    #[serde(default)]
    features: Option<Vec<String>>,
    status: Option<String>,
    release_date: Option<String>,
}

fn lenient_f64<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<f64>, D::Error> {
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    })
}

fn lenient_u64<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<u64>, D::Error> {
    let v = Option::<Value>::deserialize(de)?;
    Ok(match v {
        Some(Value::Number(n)) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Some(Value::String(s)) => s.trim().replace([',', '_'], "").parse().ok(),
        _ => None,
    })
}

/// Parse an ISO 8601 timestamp; naive timestamps and bare dates are taken
/// as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<DateTime<Utc>>() {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_release_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_timestamp(s).map(|dt| dt.date_naive()))
}

/// `pricing.*` wins over the legacy top-level fields, field by field;
/// neither present means 0.
fn resolve_pricing(raw: &RawModel) -> Pricing {
    let nested = raw.pricing.as_ref();
    let input = nested
        .and_then(|p| p.input)
        .or(raw.input_price)
        .unwrap_or(0.0);
    let output = nested
        .and_then(|p| p.output)
        .or(raw.output_price)
        .unwrap_or(0.0);
    if input < 0.0 || output < 0.0 {
        warn!(
            model_id = raw.id.as_deref().unwrap_or("?"),
            input, output, "negative price clamped to 0"
        );
    }
    Pricing::new(input, output)
}

fn normalize_model(raw: RawModel) -> Option<ModelRecord> {
    let id = match raw.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => {
            warn!(name = raw.name.as_deref().unwrap_or("?"), "model without id skipped");
            return None;
        }
    };

    let pricing = resolve_pricing(&raw);

    let status = raw.status.as_deref().and_then(|s| match s.parse::<ModelStatus>() {
        Ok(status) => Some(status),
        Err(e) => {
            warn!(model_id = %id, "{}", e);
            None
        }
    });

    let release_date = raw.release_date.as_deref().and_then(|s| {
        let parsed = parse_release_date(s);
        if parsed.is_none() {
            debug!(model_id = %id, release_date = s, "unparseable release date");
        }
        parsed
    });

    let mut seen = HashSet::new();
    let features: Vec<Feature> = raw
        .features
        .unwrap_or_default()
        .into_iter()
        .map(Feature::from)
        .filter(|f| seen.insert(f.clone()))
        .collect();

    Some(ModelRecord {
        name: raw.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
        provider: raw.provider.unwrap_or_else(|| "unknown".to_string()),
        description: raw.description.filter(|d| !d.trim().is_empty()),
        pricing,
        context_window: raw.context_window.filter(|c| *c > 0),
        max_output: raw.max_output.filter(|c| *c > 0),
        features,
        status,
        release_date,
        id,
    })
}

/// Parse and normalize a consolidated catalog document.
pub fn parse_catalog(content: &str) -> Result<CatalogStore> {
    let raw: RawCatalog = serde_json::from_str(content).context("parsing catalog JSON")?;

    let raw_models = if raw.models.is_empty() {
        raw.price_snapshot
    } else {
        raw.models
    };
    let models: Vec<ModelRecord> = raw_models.into_iter().filter_map(normalize_model).collect();

    let providers: Vec<ProviderRecord> = raw
        .providers
        .into_iter()
        .map(|(id, p)| {
            let model_count = match p.model_count {
                Some(n) => n as usize,
                None => models.iter().filter(|m| m.provider == id).count(),
            };
            ProviderRecord {
                name: p.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| id.clone()),
                model_count,
                website: p.website.filter(|w| !w.trim().is_empty()),
                last_updated: p.last_updated.as_deref().and_then(parse_timestamp),
                id,
            }
        })
        .collect();

    let last_updated = raw
        .last_updated
        .or(raw.timestamp)
        .as_deref()
        .and_then(parse_timestamp);

    Ok(CatalogStore::new(last_updated, providers, models))
}
