use anyhow::Result;
use clap::Args;
use colored::Colorize;
use modelprice_core::*;
use modelprice_report::{json as jreport, terminal};

use super::{split_list, AppContext, OutputFormat};

#[derive(Args)]
pub struct CompareArgs {
    /// Comma-separated model ids (at most five)
    #[arg(long)]
    pub models: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Fill a bounded selection in the order given. Ids past the cap are
/// returned so the caller can report them.
pub fn collect_comparison(ids: &[String], catalog: &CatalogStore) -> Result<(SelectionSet, Vec<String>)> {
    let mut selection = SelectionSet::bounded(COMPARISON_LIMIT);
    let mut dropped = Vec::new();
    for id in ids {
        if !catalog.contains_model(id) {
            anyhow::bail!("unknown model '{}'", id);
        }
        match selection.select(id) {
            Ok(_) => {}
            Err(SelectionError::CapacityReached { .. }) => dropped.push(id.clone()),
        }
    }
    Ok((selection, dropped))
}

pub fn run(args: CompareArgs, ctx: &AppContext) -> Result<()> {
    args.format
        .ensure("compare", &[OutputFormat::Table, OutputFormat::Json], None)?;
    let ids = split_list(&args.models);
    if ids.is_empty() {
        anyhow::bail!("--models needs at least one model id");
    }

    let (selection, dropped) = collect_comparison(&ids, &ctx.catalog)?;
    if !dropped.is_empty() {
        eprintln!(
            "{} comparison holds at most {} models; ignoring {}",
            "!".yellow().bold(),
            COMPARISON_LIMIT,
            dropped.join(", ")
        );
    }

    let models: Vec<&ModelRecord> = selection.iter().filter_map(|id| ctx.catalog.model(id)).collect();
    match args.format {
        OutputFormat::Json => println!("{}", jreport::render_models(&models)?),
        _ => terminal::print_comparison(&models, &ctx.catalog),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_context;

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn sixth_model_is_dropped() {
        let ctx = test_context();
        let ids = owned(&["gpt-4o", "gpt-4o-mini", "haiku", "sonnet", "opus", "flash"]);
        let (selection, dropped) = collect_comparison(&ids, &ctx.catalog).unwrap();
        assert_eq!(selection.len(), COMPARISON_LIMIT);
        assert_eq!(dropped, vec!["flash"]);
    }

    #[test]
    fn repeated_ids_count_once() {
        let ctx = test_context();
        let ids = owned(&["haiku", "haiku", "opus"]);
        let (selection, dropped) = collect_comparison(&ids, &ctx.catalog).unwrap();
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec!["haiku", "opus"]);
        assert!(dropped.is_empty());
    }

    #[test]
    fn unknown_id_is_an_error() {
        let ctx = test_context();
        assert!(collect_comparison(&owned(&["haiku", "gpt-5"]), &ctx.catalog).is_err());
    }

    #[test]
    fn html_comparison_is_rejected() {
        let ctx = test_context();
        let args = CompareArgs {
            models: "haiku,opus".to_string(),
            format: OutputFormat::Html,
        };
        assert!(run(args, &ctx).is_err());
    }
}
