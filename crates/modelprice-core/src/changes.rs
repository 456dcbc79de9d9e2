use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::CatalogStore;
use crate::schema::ModelRecord;

const PRICE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    New,
    Increase,
    Decrease,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::New => write!(f, "new"),
            ChangeKind::Increase => write!(f, "increase"),
            ChangeKind::Decrease => write!(f, "decrease"),
        }
    }
}

/// One side (input or output) of a price move, in dollars per million
/// tokens. `old`, `change` and `change_percent` are absent for new models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceDelta {
    pub old: Option<f64>,
    pub new: f64,
    pub change: Option<f64>,
    /// Zero when the old price was zero.
    pub change_percent: Option<f64>,
}

impl PriceDelta {
    fn between(old: f64, new: f64) -> Self {
        let change = new - old;
        Self {
            old: Some(old),
            new,
            change: Some(change),
            change_percent: Some(if old > 0.0 { change / old * 100.0 } else { 0.0 }),
        }
    }

    fn introduced(new: f64) -> Self {
        Self {
            old: None,
            new,
            change: None,
            change_percent: None,
        }
    }

    pub fn moved(&self) -> bool {
        self.change.map_or(false, |c| c.abs() > PRICE_EPSILON)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChange {
    pub model_id: String,
    pub name: String,
    pub provider: String,
    pub kind: ChangeKind,
    pub input: PriceDelta,
    pub output: PriceDelta,
}

fn key(m: &ModelRecord) -> (&str, &str) {
    (m.provider.as_str(), m.id.as_str())
}

fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > PRICE_EPSILON
}

/// Compare a previous catalog snapshot with the current one, in current
/// catalog order. Models are matched on provider and id.
///
/// A known model is reported when either price moved and its previous input
/// price was positive; previously free models are not tracked. A model
/// absent from the snapshot is reported as new when it carries any price.
/// Removed models are not reported.
pub fn diff_catalogs(previous: &CatalogStore, current: &CatalogStore) -> Vec<PriceChange> {
    let before: HashMap<(&str, &str), &ModelRecord> =
        previous.models().iter().map(|m| (key(m), m)).collect();

    current
        .models()
        .iter()
        .filter_map(|m| {
            let now = m.pricing;
            let (kind, input, output) = match before.get(&key(m)) {
                Some(prev) => {
                    let was = prev.pricing;
                    let moved = differs(was.input_per_mtok, now.input_per_mtok)
                        || differs(was.output_per_mtok, now.output_per_mtok);
                    if !moved || was.input_per_mtok <= 0.0 {
                        return None;
                    }
                    let input = PriceDelta::between(was.input_per_mtok, now.input_per_mtok);
                    let output = PriceDelta::between(was.output_per_mtok, now.output_per_mtok);
                    let up = input.change.unwrap_or(0.0) > 0.0 || output.change.unwrap_or(0.0) > 0.0;
                    let kind = if up { ChangeKind::Increase } else { ChangeKind::Decrease };
                    (kind, input, output)
                }
                None if now.input_per_mtok > 0.0 || now.output_per_mtok > 0.0 => (
                    ChangeKind::New,
                    PriceDelta::introduced(now.input_per_mtok),
                    PriceDelta::introduced(now.output_per_mtok),
                ),
                None => return None,
            };
            Some(PriceChange {
                model_id: m.id.clone(),
                name: m.name.clone(),
                provider: m.provider.clone(),
                kind,
                input,
                output,
            })
        })
        .collect()
}
