use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::CatalogStore;
use crate::error::{ScenarioError, SelectionError};
use crate::pricing::{calculate_costs, CostResult};
use crate::savings::{analyze_savings, SavingsReport};
use crate::scenario::{UsageField, UsageScenario, ValidationResult};
use crate::selection::{ProviderToggle, SelectionSet};

/// One price-calculator session: a usage scenario and a model selection
/// over a shared catalog. Owned by whatever front-end drives it; every
/// operation returns data and performs no I/O.
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    catalog: Arc<CatalogStore>,
    scenario: UsageScenario,
    selection: SelectionSet,
}

/// Output of one calculation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub scenario: UsageScenario,
    pub results: Vec<CostResult>,
    pub savings: Option<SavingsReport>,
}

impl Projection {
    /// Nothing selected resolved to a model; the front-end should ask the
    /// user to pick at least one.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

impl PriceCalculator {
    pub fn new(catalog: Arc<CatalogStore>) -> Self {
        Self {
            catalog,
            scenario: UsageScenario::default(),
            selection: SelectionSet::new(),
        }
    }

    pub fn with_scenario(mut self, scenario: UsageScenario) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    pub fn scenario(&self) -> &UsageScenario {
        &self.scenario
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn set_usage_field(
        &mut self,
        name: &str,
        raw: &str,
    ) -> Result<ValidationResult, ScenarioError> {
        self.scenario.set_field_by_name(name, raw)
    }

    pub fn set_usage(&mut self, field: UsageField, raw: &str) -> ValidationResult {
        self.scenario.set_field(field, raw)
    }

    pub fn apply_preset(&mut self, name: &str) -> Result<UsageScenario, ScenarioError> {
        self.scenario.apply_preset_by_name(name).map_err(|e| {
            warn!("{}", e);
            e
        })
    }

    pub fn toggle_model(&mut self, id: &str) -> Result<bool, SelectionError> {
        let selected = self.selection.toggle(id)?;
        debug!(model_id = id, selected, "toggled model");
        Ok(selected)
    }

    pub fn toggle_provider(&mut self, provider: &str) -> Result<ProviderToggle, SelectionError> {
        let outcome = self.selection.toggle_provider(provider, &self.catalog)?;
        debug!(provider, ?outcome, "toggled provider");
        Ok(outcome)
    }

    /// Select every model the calculator offers (see
    /// [`CatalogStore::calculator_candidates`]).
    pub fn select_all(&mut self) -> Result<usize, SelectionError> {
        let ids: Vec<&str> = self
            .catalog
            .calculator_candidates()
            .into_iter()
            .flat_map(|g| g.models)
            .map(|m| m.id.as_str())
            .collect();
        self.selection.select_all(ids)
    }

    pub fn deselect_all(&mut self) {
        self.selection.clear();
    }

    pub fn calculate(&self) -> Vec<CostResult> {
        debug!(selected = self.selection.len(), "calculating costs");
        calculate_costs(&self.selection, &self.scenario, &self.catalog)
    }

    pub fn analyze_savings(&self, results: &[CostResult]) -> Option<SavingsReport> {
        analyze_savings(results)
    }

    pub fn project(&self) -> Projection {
        let results = self.calculate();
        let savings = self.analyze_savings(&results);
        Projection {
            scenario: self.scenario,
            results,
            savings,
        }
    }
}
