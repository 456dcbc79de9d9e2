use colored::Colorize;
use modelprice_core::*;

use crate::format::*;

/// Rows shown in the annual projection.
pub const ANNUAL_PROJECTION_ROWS: usize = 4;

const RULE: &str = "────────────────────────────────────────────────────────────────";

fn section(title: &str) {
    let pad = RULE.chars().count().saturating_sub(title.chars().count() + 4);
    println!("\n{}", format!("── {} {}", title, "─".repeat(pad)).bold());
}

fn status_colored(status: Option<ModelStatus>) -> String {
    match status {
        None => "-".dimmed().to_string(),
        Some(s @ ModelStatus::Ga) => s.label().green().to_string(),
        Some(s @ ModelStatus::Deprecated) => s.label().red().to_string(),
        Some(s) => s.label().yellow().to_string(),
    }
}

/// Plain-text savings sentence, also reused by the HTML page.
pub fn savings_statement(report: &SavingsReport) -> String {
    format!(
        "Save {}/month ({}) by choosing {} over {}",
        fmt_usd(report.absolute_savings),
        fmt_percent(report.percent_savings),
        report.cheapest.name,
        report.most_expensive.name,
    )
}

/// The cheapest results, in rank order, with their annual cost.
pub fn annual_projection(results: &[CostResult]) -> Vec<(&ModelRecord, f64)> {
    results
        .iter()
        .take(ANNUAL_PROJECTION_ROWS)
        .map(|r| (&r.model, r.annual_cost()))
        .collect()
}

// ── catalog ───────────────────────────────────────────────────────────────────

pub fn print_model_list(models: &[&ModelRecord], catalog: &CatalogStore) {
    if models.is_empty() {
        println!("{}", "No models match.".yellow());
        return;
    }

    let (w_id, w_name, w_prov, w_in, w_out, w_ctx, w_status) = (28, 28, 14, 11, 11, 7, 12);

    println!(
        "{:<w0$}  {:<w1$}  {:<w2$}  {:>w3$}  {:>w4$}  {:>w5$}  {:<w6$}",
        "MODEL ID".bold(),
        "NAME".bold(),
        "PROVIDER".bold(),
        "INPUT".bold(),
        "OUTPUT".bold(),
        "CONTEXT".bold(),
        "STATUS".bold(),
        w0 = w_id,
        w1 = w_name,
        w2 = w_prov,
        w3 = w_in,
        w4 = w_out,
        w5 = w_ctx,
        w6 = w_status,
    );
    println!("{}", "─".repeat(w_id + w_name + w_prov + w_in + w_out + w_ctx + w_status + 12));

    for m in models {
        let input = if m.is_free() {
            format!("{:>w$}", "free", w = w_in).green().to_string()
        } else {
            format!("{:>w$}", fmt_rate(m.pricing.input_per_mtok), w = w_in)
        };
        println!(
            "{:<w0$}  {:<w1$}  {:<w2$}  {}  {:>w4$}  {:>w5$}  {}",
            truncate(&m.id, w_id),
            truncate(&m.name, w_name),
            truncate(catalog.provider_name(&m.provider), w_prov).cyan(),
            input,
            fmt_rate(m.pricing.output_per_mtok),
            fmt_context_window(m.context_window),
            status_colored(m.status),
            w0 = w_id,
            w1 = w_name,
            w2 = w_prov,
            w4 = w_out,
            w5 = w_ctx,
        );
    }
    println!("\n{} models", models.len());
}

pub fn print_provider_list(catalog: &CatalogStore) {
    let providers = catalog.providers();
    if providers.is_empty() {
        println!("{}", "No providers in catalog.".yellow());
        return;
    }

    println!(
        "{:<16}  {:<22}  {:>6}  {:>23}  {:<16}",
        "PROVIDER ID".bold(),
        "NAME".bold(),
        "MODELS".bold(),
        "INPUT RANGE ($/1M)".bold(),
        "UPDATED".bold(),
    );
    println!("{}", "─".repeat(16 + 22 + 6 + 23 + 16 + 8));

    for p in providers {
        let range = match catalog.provider_price_range(&p.id) {
            Some((lo, hi)) if lo == hi => format!("{:.2}", lo),
            Some((lo, hi)) => format!("{:.2} - {:.2}", lo, hi),
            None => "-".to_string(),
        };
        println!(
            "{:<16}  {:<22}  {:>6}  {:>23}  {:<16}",
            truncate(&p.id, 16).cyan(),
            truncate(&p.name, 22),
            p.model_count,
            range,
            fmt_ts(p.last_updated),
        );
    }
    println!("\n{} providers", providers.len());
}

/// Features shown in the statistics block.
const TOP_FEATURES: usize = 6;

pub fn print_statistics(catalog: &CatalogStore) {
    let stats = catalog.statistics();
    section("Catalog");
    println!("  Models     : {}", stats.total_models);
    println!("  Providers  : {}", stats.providers);
    println!("  Free       : {}", stats.free_models.to_string().green());
    println!("  Paid       : {}", stats.paid_models);
    if let Some(range) = stats.price_range {
        println!(
            "  Input      : {} min, {} max, {} avg",
            fmt_rate(range.min),
            fmt_rate(range.max),
            fmt_rate(range.average)
        );
    }
    let ctx = stats.context_windows;
    if ctx.max.is_some() {
        println!(
            "  Context    : {} to {}, {} over 100K, {} over 1M",
            fmt_context_window(ctx.min),
            fmt_context_window(ctx.max),
            ctx.over_100k,
            ctx.over_1m
        );
    }
    if !stats.by_status.is_empty() {
        println!("  Status     : {}", count_list(stats.by_status.iter().collect()));
    }
    if !stats.by_feature.is_empty() {
        let mut features: Vec<(&String, &usize)> = stats.by_feature.iter().collect();
        features.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
        features.truncate(TOP_FEATURES);
        println!("  Features   : {}", count_list(features));
    }
    println!("  Updated    : {}", fmt_ts(catalog.last_updated()));
}

fn count_list(counts: Vec<(&String, &usize)>) -> String {
    counts
        .iter()
        .map(|(k, n)| format!("{} {}", k, n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── calculator ────────────────────────────────────────────────────────────────

pub fn print_scenario(scenario: &UsageScenario) {
    println!(
        "  Usage      : {} input / {} output tokens, {} requests/month",
        fmt_tokens(scenario.input_tokens()).bold(),
        fmt_tokens(scenario.output_tokens()).bold(),
        group_thousands(scenario.requests_per_month()).bold(),
    );
}

/// Inline warning for a corrected usage field. Silent when the value was
/// accepted as given.
pub fn print_validation(result: &ValidationResult) {
    if let Some(err) = &result.error {
        eprintln!(
            "{} {} (using {})",
            "!".yellow().bold(),
            err,
            group_thousands(result.value)
        );
    }
}

pub fn print_projection(projection: &Projection, catalog: &CatalogStore) {
    section("Monthly Cost Estimate");
    print_scenario(&projection.scenario);

    if projection.is_empty() {
        println!(
            "\n  {}",
            "No models selected. Select at least one model to see costs.".yellow()
        );
        println!();
        return;
    }

    println!(
        "\n  {:<4} {:<28}  {:<14}  {:>11}  {:>11}  {:>12}  {:>10}",
        "#".bold(),
        "MODEL".bold(),
        "PROVIDER".bold(),
        "INPUT".bold(),
        "OUTPUT".bold(),
        "TOTAL/MO".bold(),
        "PER REQ".bold(),
    );
    for (i, r) in projection.results.iter().enumerate() {
        let total = format!("{:>12}", fmt_usd(r.total_cost));
        let total = if i == 0 {
            total.green().bold().to_string()
        } else {
            total
        };
        let rank = if i == 0 {
            format!("{:<4}", "★").green().to_string()
        } else {
            format!("{:<4}", i + 1)
        };
        println!(
            "  {} {:<28}  {:<14}  {:>11}  {:>11}  {}  {:>10}",
            rank,
            truncate(&r.model.name, 28),
            truncate(catalog.provider_name(&r.model.provider), 14).cyan(),
            fmt_usd(r.input_cost),
            fmt_usd(r.output_cost),
            total,
            fmt_usd_fine(r.cost_per_request),
        );
    }

    if let Some(savings) = &projection.savings {
        section("Potential Savings");
        println!("  {}", savings_statement(savings).green());
        println!(
            "  Annually   : {}",
            fmt_usd_whole(savings.annual_savings).green().bold()
        );
    }

    section("Annual Projection");
    for (model, annual) in annual_projection(&projection.results) {
        println!(
            "  {:<28}  {:>14}",
            truncate(&model.name, 28),
            fmt_usd_whole(annual).yellow()
        );
    }
    println!();
}

pub fn print_selection(selection: &SelectionSet, catalog: &CatalogStore) {
    if selection.is_empty() {
        println!("  {}", "Selection is empty.".dimmed());
        return;
    }
    for id in selection.iter() {
        match catalog.model(id) {
            Some(m) => println!(
                "  {} {} {}",
                "•".cyan(),
                m.name,
                format!("({})", catalog.provider_name(&m.provider)).dimmed()
            ),
            None => println!("  {} {} {}", "•".dimmed(), id, "(not in catalog)".dimmed()),
        }
    }
}

// ── comparison ────────────────────────────────────────────────────────────────

pub fn print_comparison(models: &[&ModelRecord], catalog: &CatalogStore) {
    if models.is_empty() {
        println!("{}", "No models to compare.".yellow());
        return;
    }

    let label_w = 14;
    let col_w = 20;
    let row = |label: &str, cells: Vec<String>| {
        let mut line = format!("  {:<w$}", label.bold(), w = label_w);
        for c in cells {
            line.push_str(&format!("  {:<w$}", truncate(&c, col_w), w = col_w));
        }
        println!("{}", line);
    };

    section("Model Comparison");
    row("Model", models.iter().map(|m| m.name.clone()).collect());
    row(
        "Provider",
        models.iter().map(|m| catalog.provider_name(&m.provider).to_string()).collect(),
    );
    row(
        "Input",
        models.iter().map(|m| fmt_rate(m.pricing.input_per_mtok)).collect(),
    );
    row(
        "Output",
        models.iter().map(|m| fmt_rate(m.pricing.output_per_mtok)).collect(),
    );
    row(
        "Context",
        models.iter().map(|m| fmt_context_window(m.context_window)).collect(),
    );
    row(
        "Max output",
        models.iter().map(|m| m.max_output.map(fmt_tokens).unwrap_or_else(|| "-".into())).collect(),
    );
    row(
        "Status",
        models.iter().map(|m| m.status.map(|s| s.label().to_string()).unwrap_or_else(|| "-".into())).collect(),
    );
    row("Released", models.iter().map(|m| fmt_date(m.release_date)).collect());
    row(
        "Features",
        models
            .iter()
            .map(|m| {
                if m.features.is_empty() {
                    "-".to_string()
                } else {
                    m.features.iter().map(|f| f.as_str()).collect::<Vec<_>>().join(", ")
                }
            })
            .collect(),
    );
    println!();
}

// ── price changes ─────────────────────────────────────────────────────────────

/// `$5.00/1M → $2.50/1M (-2.50, -50.0%)`, or just the new rate for a
/// model that was not in the snapshot.
pub fn fmt_price_move(delta: &PriceDelta) -> String {
    match (delta.old, delta.change, delta.change_percent) {
        (Some(old), Some(change), Some(pct)) if delta.moved() => format!(
            "{} → {} ({:+.2}, {:+.1}%)",
            fmt_rate(old),
            fmt_rate(delta.new),
            change,
            pct
        ),
        _ => fmt_rate(delta.new),
    }
}

pub fn changes_summary(changes: &[PriceChange]) -> String {
    let count = |kind: ChangeKind| changes.iter().filter(|c| c.kind == kind).count();
    format!(
        "{} new, {} increased, {} decreased",
        count(ChangeKind::New),
        count(ChangeKind::Increase),
        count(ChangeKind::Decrease)
    )
}

pub fn print_changes(changes: &[PriceChange], catalog: &CatalogStore) {
    if changes.is_empty() {
        println!("{}", "No price changes since the snapshot.".green());
        return;
    }

    let groups = [
        (ChangeKind::New, "New Models"),
        (ChangeKind::Increase, "Price Increases"),
        (ChangeKind::Decrease, "Price Decreases"),
    ];
    for (kind, title) in groups {
        let rows: Vec<&PriceChange> = changes.iter().filter(|c| c.kind == kind).collect();
        if rows.is_empty() {
            continue;
        }
        section(title);
        for c in rows {
            let name = format!("{:<28}", truncate(&c.name, 28));
            let name = match kind {
                ChangeKind::New => name.cyan().to_string(),
                ChangeKind::Increase => name.red().to_string(),
                ChangeKind::Decrease => name.green().to_string(),
            };
            println!(
                "  {}  {}",
                name,
                truncate(catalog.provider_name(&c.provider), 14).dimmed()
            );
            println!("    Input    : {}", fmt_price_move(&c.input));
            println!("    Output   : {}", fmt_price_move(&c.output));
        }
    }
    println!("\n{}", changes_summary(changes));
}
