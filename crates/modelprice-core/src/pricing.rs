use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CatalogStore;
use crate::scenario::UsageScenario;
use crate::schema::ModelRecord;
use crate::selection::SelectionSet;

const TOKENS_PER_MTOK: f64 = 1_000_000.0;

/// Per-model rates in USD per 1M tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pricing {
    pub input_per_mtok: f64,
    pub output_per_mtok: f64,
}

impl Pricing {
    pub const FREE: Pricing = Pricing {
        input_per_mtok: 0.0,
        output_per_mtok: 0.0,
    };

    /// Negative or non-finite rates are stored as 0.
    pub fn new(input: f64, output: f64) -> Self {
        Self {
            input_per_mtok: non_negative(input),
            output_per_mtok: non_negative(output),
        }
    }

    pub fn is_free(&self) -> bool {
        self.input_per_mtok == 0.0 && self.output_per_mtok == 0.0
    }

    pub fn input_cost(&self, input_tokens: u64) -> f64 {
        (input_tokens as f64 / TOKENS_PER_MTOK) * self.input_per_mtok
    }

    pub fn output_cost(&self, output_tokens: u64) -> f64 {
        (output_tokens as f64 / TOKENS_PER_MTOK) * self.output_per_mtok
    }

    pub fn estimate_cost(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        self.input_cost(input_tokens) + self.output_cost(output_tokens)
    }
}

fn non_negative(rate: f64) -> f64 {
    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

/// Monthly cost breakdown for one model under one scenario. Values are
/// unrounded; rounding is left to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub model: ModelRecord,
    pub input_cost: f64,
    pub output_cost: f64,
    pub total_cost: f64,
    pub cost_per_request: f64,
}

impl CostResult {
    pub fn for_model(model: &ModelRecord, scenario: &UsageScenario) -> Self {
        let input_cost = model.pricing.input_cost(scenario.input_tokens());
        let output_cost = model.pricing.output_cost(scenario.output_tokens());
        let total_cost = input_cost + output_cost;
        Self {
            model: model.clone(),
            input_cost,
            output_cost,
            total_cost,
            cost_per_request: total_cost / scenario.request_divisor(),
        }
    }

    pub fn annual_cost(&self) -> f64 {
        self.total_cost * 12.0
    }
}

/// Project monthly cost for every selected model, cheapest first.
///
/// Ids that no longer resolve in the catalog are skipped. Models with equal
/// totals keep their selection order.
pub fn calculate_costs(
    selection: &SelectionSet,
    scenario: &UsageScenario,
    catalog: &CatalogStore,
) -> Vec<CostResult> {
    let mut results: Vec<CostResult> = selection
        .iter()
        .filter_map(|id| match catalog.model(id) {
            Some(model) => Some(CostResult::for_model(model, scenario)),
            None => {
                debug!(model_id = id, "skipping stale selection entry");
                None
            }
        })
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| {
        a.total_cost
            .partial_cmp(&b.total_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    results
}
