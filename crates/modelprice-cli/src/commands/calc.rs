use anyhow::Result;
use clap::Args;
use colored::Colorize;
use modelprice_core::*;
use modelprice_report::{html as html_report, json as jreport, terminal};
use std::path::PathBuf;
use tracing::debug;

use super::{split_list, write_or_print, AppContext, OutputFormat};

#[derive(Args, Default)]
pub struct CalcArgs {
    /// Comma-separated model ids
    #[arg(long)]
    pub models: Option<String>,

    /// Select every model of a provider (repeatable)
    #[arg(long)]
    pub provider: Vec<String>,

    /// Select every priced model in the catalog
    #[arg(long)]
    pub all: bool,

    /// Usage preset: small, medium, large, enterprise
    #[arg(long)]
    pub preset: Option<String>,

    /// Input tokens per month (overrides the preset)
    #[arg(long)]
    pub input_tokens: Option<String>,

    /// Output tokens per month (overrides the preset)
    #[arg(long)]
    pub output_tokens: Option<String>,

    /// Requests per month (overrides the preset)
    #[arg(long)]
    pub requests: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Output file for json or html (html defaults to modelprice-report.html)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// A configured calculator plus everything worth warning about.
pub struct CalcSetup {
    pub calc: PriceCalculator,
    pub diagnostics: Vec<ValidationResult>,
    pub unknown_models: Vec<String>,
    pub unknown_providers: Vec<String>,
}

/// Apply the scenario and selection flags to a fresh calculator. Field
/// corrections and unknown ids come back as diagnostics rather than
/// errors; only an unknown preset name fails.
pub fn build_calculator(args: &CalcArgs, ctx: &AppContext) -> Result<CalcSetup> {
    let mut calc = PriceCalculator::new(ctx.catalog.clone());

    if let Some(preset) = args.preset.as_deref().or(ctx.settings.default_preset.as_deref()) {
        calc.apply_preset(preset)?;
    }

    let mut diagnostics = Vec::new();
    let overrides = [
        (UsageField::InputTokens, &args.input_tokens),
        (UsageField::OutputTokens, &args.output_tokens),
        (UsageField::RequestsPerMonth, &args.requests),
    ];
    for (field, raw) in overrides {
        if let Some(raw) = raw {
            let result = calc.set_usage(field, raw);
            if !result.is_ok() {
                diagnostics.push(result);
            }
        }
    }

    if args.all {
        let n = calc.select_all()?;
        debug!(selected = n, "selected all priced models");
    }

    let mut unknown_providers = Vec::new();
    for provider in &args.provider {
        if calc.catalog().models_by_provider(provider).is_empty() {
            unknown_providers.push(provider.clone());
        } else if !calc.selection().is_provider_fully_selected(provider, calc.catalog()) {
            calc.toggle_provider(provider)?;
        }
    }

    let mut unknown_models = Vec::new();
    for id in args.models.as_deref().map(split_list).unwrap_or_default() {
        if !calc.catalog().contains_model(&id) {
            unknown_models.push(id);
        } else if !calc.selection().contains(&id) {
            calc.toggle_model(&id)?;
        }
    }

    Ok(CalcSetup {
        calc,
        diagnostics,
        unknown_models,
        unknown_providers,
    })
}

pub fn run(args: CalcArgs, ctx: &AppContext) -> Result<()> {
    args.format.ensure(
        "calc",
        &[OutputFormat::Table, OutputFormat::Json, OutputFormat::Html],
        args.out.as_deref(),
    )?;
    let setup = build_calculator(&args, ctx)?;

    for d in &setup.diagnostics {
        terminal::print_validation(d);
    }
    for id in &setup.unknown_providers {
        eprintln!("{} unknown provider '{}' ignored", "!".yellow().bold(), id);
    }
    for id in &setup.unknown_models {
        eprintln!("{} unknown model '{}' ignored", "!".yellow().bold(), id);
    }

    let calc = setup.calc;
    let projection = calc.project();
    match args.format {
        OutputFormat::Json => {
            let content = jreport::render_projection(&projection)?;
            write_or_print(&content, args.out.as_deref(), "modelprice-report.json")?;
        }
        OutputFormat::Html => {
            let content = html_report::render_projection(&projection, calc.catalog())?;
            write_or_print(&content, args.out.as_deref(), "modelprice-report.html")?;
        }
        OutputFormat::Table => terminal::print_projection(&projection, calc.catalog()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;

    fn ids(calc: &PriceCalculator) -> Vec<String> {
        calc.calculate().into_iter().map(|r| r.model.id).collect()
    }

    #[test]
    fn provider_flag_after_all_does_not_deselect() {
        let ctx = test_context();
        let args = CalcArgs {
            all: true,
            provider: vec!["anthropic".to_string()],
            ..Default::default()
        };
        let calc = build_calculator(&args, &ctx).unwrap().calc;
        assert_eq!(calc.selection().len(), 5);
        assert!(calc.selection().contains("opus"));
    }

    #[test]
    fn models_list_with_unknown_ids() {
        let ctx = test_context();
        let args = CalcArgs {
            models: Some("sonnet, nope ,gpt-4o-mini".to_string()),
            ..Default::default()
        };
        let setup = build_calculator(&args, &ctx).unwrap();
        assert!(setup.diagnostics.is_empty());
        assert_eq!(setup.unknown_models, vec!["nope"]);
        assert_eq!(ids(&setup.calc), vec!["gpt-4o-mini", "sonnet"]);
    }

    #[test]
    fn unknown_provider_is_reported_not_selected() {
        let ctx = test_context();
        let args = CalcArgs {
            provider: vec!["nobody".to_string(), "anthropic".to_string()],
            ..Default::default()
        };
        let setup = build_calculator(&args, &ctx).unwrap();
        assert_eq!(setup.unknown_providers, vec!["nobody"]);
        assert!(setup.unknown_models.is_empty());
        assert_eq!(ids(&setup.calc), vec!["haiku", "sonnet", "opus"]);
    }

    #[test]
    fn table_output_with_out_file_is_rejected() {
        let ctx = test_context();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("costs.txt");
        let args = CalcArgs {
            models: Some("haiku".to_string()),
            out: Some(out.clone()),
            ..Default::default()
        };
        let err = run(args, &ctx).unwrap_err();
        assert!(err.to_string().contains("--out needs --format json or html"));
        assert!(!out.exists());
    }

    #[test]
    fn json_output_goes_to_out_file() {
        let ctx = test_context();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("costs.json");
        let args = CalcArgs {
            models: Some("haiku".to_string()),
            format: OutputFormat::Json,
            out: Some(out.clone()),
            ..Default::default()
        };
        run(args, &ctx).unwrap();
        let v: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(v["results"][0]["model"]["id"], "haiku");
    }

    #[test]
    fn overrides_apply_after_preset_and_report_corrections() {
        let ctx = test_context();
        let args = CalcArgs {
            preset: Some("enterprise".to_string()),
            input_tokens: Some("2,000,000".to_string()),
            requests: Some("0".to_string()),
            ..Default::default()
        };
        let CalcSetup { calc, diagnostics, .. } = build_calculator(&args, &ctx).unwrap();
        let s = calc.scenario();
        assert_eq!(s.input_tokens(), 2_000_000);
        assert_eq!(s.output_tokens(), Preset::Enterprise.scenario().output_tokens());
        assert_eq!(s.requests_per_month(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].field, UsageField::RequestsPerMonth);
    }

    #[test]
    fn unknown_preset_fails() {
        let ctx = test_context();
        let args = CalcArgs {
            preset: Some("jumbo".to_string()),
            ..Default::default()
        };
        assert!(build_calculator(&args, &ctx).is_err());
    }

    #[test]
    fn configured_default_preset_is_used() {
        let mut ctx = test_context();
        ctx.settings.default_preset = Some("small".to_string());
        let calc = build_calculator(&CalcArgs::default(), &ctx).unwrap().calc;
        assert_eq!(*calc.scenario(), Preset::Small.scenario());
        assert!(calc.project().is_empty());
    }
}
