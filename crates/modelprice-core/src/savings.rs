use serde::{Deserialize, Serialize};

use crate::pricing::CostResult;
use crate::schema::ModelRecord;

/// Cheapest vs most expensive model in a ranked result list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsReport {
    pub cheapest: ModelRecord,
    pub most_expensive: ModelRecord,
    pub absolute_savings: f64,
    /// Share of the most expensive total, 0..=100. Zero when every
    /// selected model is free.
    pub percent_savings: f64,
    pub annual_savings: f64,
}

/// Compare the first and last entries of results sorted cheapest first.
/// Needs at least two results.
pub fn analyze_savings(results: &[CostResult]) -> Option<SavingsReport> {
    if results.len() < 2 {
        return None;
    }
    let cheapest = results.first()?;
    let most_expensive = results.last()?;

    let absolute_savings = most_expensive.total_cost - cheapest.total_cost;
    let percent_savings = if most_expensive.total_cost > 0.0 {
        absolute_savings / most_expensive.total_cost * 100.0
    } else {
        0.0
    };

    Some(SavingsReport {
        cheapest: cheapest.model.clone(),
        most_expensive: most_expensive.model.clone(),
        absolute_savings,
        percent_savings,
        annual_savings: absolute_savings * 12.0,
    })
}
