use serde::Serialize;
use tracing::debug;

use crate::error::{ScenarioError, ValidationError};

pub const MAX_TOKENS: u64 = 1_000_000_000;
pub const MAX_REQUESTS_PER_MONTH: u64 = 100_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageField {
    InputTokens,
    OutputTokens,
    RequestsPerMonth,
}

impl UsageField {
    pub const ALL: [UsageField; 3] = [
        UsageField::InputTokens,
        UsageField::OutputTokens,
        UsageField::RequestsPerMonth,
    ];

    pub fn min(self) -> u64 {
        match self {
            UsageField::InputTokens | UsageField::OutputTokens => 0,
            // used as a divisor for cost per request
            UsageField::RequestsPerMonth => 1,
        }
    }

    pub fn max(self) -> u64 {
        match self {
            UsageField::InputTokens | UsageField::OutputTokens => MAX_TOKENS,
            UsageField::RequestsPerMonth => MAX_REQUESTS_PER_MONTH,
        }
    }

    /// Clamp an already-numeric value into the field's range.
    fn clamp(self, value: f64) -> (u64, Option<ValidationError>) {
        let value = value.trunc();
        if value < self.min() as f64 {
            let err = ValidationError::BelowMinimum {
                field: self,
                min: self.min(),
                given: value,
            };
            (self.min(), Some(err))
        } else if value > self.max() as f64 {
            let err = ValidationError::AboveMaximum {
                field: self,
                max: self.max(),
                given: value,
            };
            (self.max(), Some(err))
        } else {
            (value as u64, None)
        }
    }
}

impl std::fmt::Display for UsageField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageField::InputTokens => write!(f, "inputTokens"),
            UsageField::OutputTokens => write!(f, "outputTokens"),
            UsageField::RequestsPerMonth => write!(f, "requestsPerMonth"),
        }
    }
}

impl std::str::FromStr for UsageField {
    type Err = ScenarioError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "inputtokens" | "input" => Ok(UsageField::InputTokens),
            "outputtokens" | "output" => Ok(UsageField::OutputTokens),
            "requestspermonth" | "requests" => Ok(UsageField::RequestsPerMonth),
            _ => Err(ScenarioError::UnknownField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Small,
    Medium,
    Large,
    Enterprise,
}

impl Preset {
    pub const ALL: [Preset; 4] = [Preset::Small, Preset::Medium, Preset::Large, Preset::Enterprise];

    pub const fn scenario(self) -> UsageScenario {
        match self {
            Preset::Small => UsageScenario::raw(100_000, 50_000, 100),
            Preset::Medium => UsageScenario::raw(1_000_000, 500_000, 1_000),
            Preset::Large => UsageScenario::raw(10_000_000, 5_000_000, 10_000),
            Preset::Enterprise => UsageScenario::raw(100_000_000, 50_000_000, 100_000),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Preset::Small => write!(f, "small"),
            Preset::Medium => write!(f, "medium"),
            Preset::Large => write!(f, "large"),
            Preset::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl std::str::FromStr for Preset {
    type Err = ScenarioError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(Preset::Small),
            "medium" => Ok(Preset::Medium),
            "large" => Ok(Preset::Large),
            "enterprise" => Ok(Preset::Enterprise),
            _ => Err(ScenarioError::UnknownPreset(s.to_string())),
        }
    }
}

/// Outcome of a field update: the value actually stored, plus the
/// diagnostic when the raw input had to be corrected.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub field: UsageField,
    pub value: u64,
    pub error: Option<ValidationError>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Monthly usage volumes. Fields are private so every stored value has
/// passed through the range clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageScenario {
    input_tokens: u64,
    output_tokens: u64,
    requests_per_month: u64,
}

impl Default for UsageScenario {
    fn default() -> Self {
        Preset::Medium.scenario()
    }
}

impl UsageScenario {
    const fn raw(input_tokens: u64, output_tokens: u64, requests_per_month: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            requests_per_month,
        }
    }

    /// Build a scenario, clamping each value into range.
    pub fn new(input_tokens: u64, output_tokens: u64, requests_per_month: u64) -> Self {
        let mut scenario = Self::raw(0, 0, 1);
        scenario.set(UsageField::InputTokens, input_tokens);
        scenario.set(UsageField::OutputTokens, output_tokens);
        scenario.set(UsageField::RequestsPerMonth, requests_per_month);
        scenario
    }

    pub fn input_tokens(&self) -> u64 {
        self.input_tokens
    }

    pub fn output_tokens(&self) -> u64 {
        self.output_tokens
    }

    pub fn requests_per_month(&self) -> u64 {
        self.requests_per_month
    }

    pub fn get(&self, field: UsageField) -> u64 {
        match field {
            UsageField::InputTokens => self.input_tokens,
            UsageField::OutputTokens => self.output_tokens,
            UsageField::RequestsPerMonth => self.requests_per_month,
        }
    }

    fn slot(&mut self, field: UsageField) -> &mut u64 {
        match field {
            UsageField::InputTokens => &mut self.input_tokens,
            UsageField::OutputTokens => &mut self.output_tokens,
            UsageField::RequestsPerMonth => &mut self.requests_per_month,
        }
    }

    /// Store a numeric value, clamped into the field's range.
    pub fn set(&mut self, field: UsageField, value: u64) -> ValidationResult {
        let (stored, error) = field.clamp(value as f64);
        self.store(field, stored, error)
    }

    /// Store raw user input. Thousands separators (`,` `_`) are ignored and
    /// fractional values truncate. Empty input counts as 0; anything else
    /// that does not parse also stores 0 (or the field minimum) and reports
    /// `NotANumber`.
    pub fn set_field(&mut self, field: UsageField, raw: &str) -> ValidationResult {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| *c != ',' && *c != '_')
            .collect();

        if cleaned.is_empty() {
            let (stored, error) = field.clamp(0.0);
            return self.store(field, stored, error);
        }

        match cleaned.parse::<f64>() {
            Ok(n) if n.is_finite() => {
                let (stored, error) = field.clamp(n);
                self.store(field, stored, error)
            }
            _ => {
                let err = ValidationError::NotANumber {
                    field,
                    raw: raw.to_string(),
                };
                self.store(field, field.min(), Some(err))
            }
        }
    }

    /// Same as [`set_field`](Self::set_field) with the field given by name
    /// (`inputTokens`, `input_tokens`, `input`, ...).
    pub fn set_field_by_name(
        &mut self,
        name: &str,
        raw: &str,
    ) -> Result<ValidationResult, ScenarioError> {
        let field: UsageField = name.parse()?;
        Ok(self.set_field(field, raw))
    }

    fn store(
        &mut self,
        field: UsageField,
        value: u64,
        error: Option<ValidationError>,
    ) -> ValidationResult {
        if let Some(err) = &error {
            debug!(%field, value, "usage value corrected: {}", err);
        }
        *self.slot(field) = value;
        ValidationResult { field, value, error }
    }

    pub fn apply_preset(&mut self, preset: Preset) -> UsageScenario {
        *self = preset.scenario();
        *self
    }

    /// Apply a preset by name. Unknown names leave the scenario untouched.
    pub fn apply_preset_by_name(&mut self, name: &str) -> Result<UsageScenario, ScenarioError> {
        let preset: Preset = name.parse()?;
        Ok(self.apply_preset(preset))
    }

    /// Divisor for cost-per-request; never zero.
    pub fn request_divisor(&self) -> f64 {
        self.requests_per_month.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_have_fixed_values() {
        let expected = [
            (Preset::Small, (100_000, 50_000, 100)),
            (Preset::Medium, (1_000_000, 500_000, 1_000)),
            (Preset::Large, (10_000_000, 5_000_000, 10_000)),
            (Preset::Enterprise, (100_000_000, 50_000_000, 100_000)),
        ];
        for (preset, (input, output, requests)) in expected {
            let mut s = UsageScenario::new(1, 1, 1);
            let applied = s.apply_preset(preset);
            assert_eq!(applied, s);
            assert_eq!(s.input_tokens(), input, "{preset}");
            assert_eq!(s.output_tokens(), output, "{preset}");
            assert_eq!(s.requests_per_month(), requests, "{preset}");
        }
    }

    #[test]
    fn unknown_preset_is_a_noop() {
        let mut s = UsageScenario::new(7, 8, 9);
        let err = s.apply_preset_by_name("huge").unwrap_err();
        assert_eq!(err, ScenarioError::UnknownPreset("huge".to_string()));
        assert_eq!(s, UsageScenario::new(7, 8, 9));

        let applied = s.apply_preset_by_name("Medium").unwrap();
        assert_eq!(applied, UsageScenario::default());
    }

    #[test]
    fn token_fields_clamp_to_range() {
        let mut s = UsageScenario::default();

        let r = s.set_field(UsageField::InputTokens, "-50");
        assert_eq!(r.value, 0);
        assert!(matches!(
            r.error,
            Some(ValidationError::BelowMinimum { min: 0, .. })
        ));

        let r = s.set_field(UsageField::OutputTokens, "5000000000");
        assert_eq!(r.value, MAX_TOKENS);
        assert!(matches!(
            r.error,
            Some(ValidationError::AboveMaximum { max: MAX_TOKENS, .. })
        ));
        assert_eq!(s.input_tokens(), 0);
        assert_eq!(s.output_tokens(), MAX_TOKENS);
    }

    #[test]
    fn requests_never_drop_below_one() {
        let mut s = UsageScenario::default();
        for raw in ["0", "", "-3", "abc"] {
            let r = s.set_field(UsageField::RequestsPerMonth, raw);
            assert_eq!(r.value, 1, "raw input {raw:?}");
            assert_eq!(s.requests_per_month(), 1);
            assert!(!r.is_ok());
        }
        assert_eq!(UsageScenario::new(10, 10, 0).requests_per_month(), 1);
    }

    #[test]
    fn malformed_token_input_stores_zero() {
        let mut s = UsageScenario::default();
        let r = s.set_field(UsageField::InputTokens, "lots");
        assert_eq!(r.value, 0);
        assert!(matches!(r.error, Some(ValidationError::NotANumber { .. })));

        let r = s.set_field(UsageField::InputTokens, "");
        assert_eq!(r.value, 0);
        assert!(r.is_ok());
    }

    #[test]
    fn separators_and_fractions_are_accepted() {
        let mut s = UsageScenario::default();
        assert_eq!(s.set_field(UsageField::InputTokens, " 2,500,000 ").value, 2_500_000);
        assert_eq!(s.set_field(UsageField::OutputTokens, "1_000").value, 1_000);
        let r = s.set_field(UsageField::RequestsPerMonth, "12.9");
        assert_eq!(r.value, 12);
        assert!(r.is_ok());
    }

    #[test]
    fn field_names_accept_common_spellings() {
        let mut s = UsageScenario::default();
        for name in ["inputTokens", "input_tokens", "input", "INPUT-TOKENS"] {
            let r = s.set_field_by_name(name, "42").unwrap();
            assert_eq!(r.field, UsageField::InputTokens);
        }
        assert!(matches!(
            s.set_field_by_name("latency", "1"),
            Err(ScenarioError::UnknownField(_))
        ));
    }

    #[test]
    fn stored_values_always_in_range() {
        let mut s = UsageScenario::default();
        let inputs = ["", "0", "-1", "1e12", "999999999999", "NaN", "inf", "17", "x1"];
        for field in UsageField::ALL {
            for raw in inputs {
                s.set_field(field, raw);
                let v = s.get(field);
                assert!(v >= field.min() && v <= field.max(), "{field}={v} from {raw:?}");
            }
        }
    }
}
