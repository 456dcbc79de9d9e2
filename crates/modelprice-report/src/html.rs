use anyhow::Result;
use modelprice_core::*;

use crate::format::*;
use crate::terminal::{annual_projection, savings_statement};

const STYLE: &str = r#"
  :root {
    --bg: #0f1117; --surface: #1a1d27; --border: #2a2d3a;
    --text: #e2e8f0; --muted: #64748b; --accent: #7c6af7;
    --green: #4ade80; --yellow: #facc15; --cyan: #22d3ee;
    font-family: 'Inter', system-ui, sans-serif;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); min-height: 100vh; }
  .header { background: var(--surface); border-bottom: 1px solid var(--border);
    padding: 1.5rem 2rem; display: flex; align-items: center; gap: 1rem; }
  .header h1 { font-size: 1.25rem; font-weight: 700; color: var(--accent); }
  .container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
  .kpi-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
    gap: 1rem; margin-bottom: 2rem; }
  .kpi { background: var(--surface); border: 1px solid var(--border);
    border-radius: 8px; padding: 1.25rem; }
  .kpi .label { font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.1em;
    color: var(--muted); margin-bottom: 0.4rem; }
  .kpi .value { font-size: 1.5rem; font-weight: 700; }
  .green { color: var(--green); }
  .yellow { color: var(--yellow); }
  .cyan { color: var(--cyan); }
  .section { background: var(--surface); border: 1px solid var(--border);
    border-radius: 8px; margin-bottom: 1.5rem; overflow: hidden; }
  .section-header { padding: 0.875rem 1.25rem; border-bottom: 1px solid var(--border);
    font-size: 0.8rem; font-weight: 600; text-transform: uppercase;
    letter-spacing: 0.08em; color: var(--muted); }
  .note { padding: 1.25rem; font-size: 0.9rem; }
  table { width: 100%; border-collapse: collapse; }
  th, td { padding: 0.6rem 1.25rem; text-align: left; border-bottom: 1px solid var(--border);
    font-size: 0.85rem; }
  th { font-size: 0.7rem; text-transform: uppercase; letter-spacing: 0.08em;
    color: var(--muted); }
  td.num, th.num { text-align: right; font-variant-numeric: tabular-nums; }
  tr.cheapest td { background: rgba(74,222,128,0.08); }
  tr:last-child td { border-bottom: none; }
  footer { text-align: center; padding: 2rem; color: var(--muted); font-size: 0.75rem; }
"#;

/// Standalone HTML page for one calculation run.
pub fn render_projection(projection: &Projection, catalog: &CatalogStore) -> Result<String> {
    let s = &projection.scenario;
    let cheapest = projection
        .results
        .first()
        .map(|r| fmt_usd(r.total_cost))
        .unwrap_or_else(|| "-".to_string());
    let annual_savings = projection
        .savings
        .as_ref()
        .map(|sv| fmt_usd_whole(sv.annual_savings))
        .unwrap_or_else(|| "-".to_string());

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>modelprice · cost estimate</title>
<style>{style}</style>
</head>
<body>
<div class="header">
  <h1>modelprice</h1>
  <span style="color:var(--muted);font-size:0.85rem">catalog updated {catalog_updated}</span>
</div>
<div class="container">

  <div class="kpi-grid">
    <div class="kpi"><div class="label">Input Tokens / mo</div><div class="value">{input_tokens}</div></div>
    <div class="kpi"><div class="label">Output Tokens / mo</div><div class="value">{output_tokens}</div></div>
    <div class="kpi"><div class="label">Requests / mo</div><div class="value cyan">{requests}</div></div>
    <div class="kpi"><div class="label">Cheapest / mo</div><div class="value green">{cheapest}</div></div>
    <div class="kpi"><div class="label">Annual Savings</div><div class="value yellow">{annual_savings}</div></div>
  </div>

  <div class="section">
    <div class="section-header">Monthly Cost Estimate</div>
    {results_html}
  </div>

  {savings_html}

  <div class="section">
    <div class="section-header">Annual Projection</div>
    {annual_html}
  </div>

</div>
<footer>Generated by modelprice · {timestamp}</footer>
</body>
</html>"#,
        style = STYLE,
        catalog_updated = fmt_ts(catalog.last_updated()),
        input_tokens = fmt_tokens(s.input_tokens()),
        output_tokens = fmt_tokens(s.output_tokens()),
        requests = group_thousands(s.requests_per_month()),
        cheapest = cheapest,
        annual_savings = annual_savings,
        results_html = render_results(&projection.results, catalog),
        savings_html = render_savings(projection.savings.as_ref()),
        annual_html = render_annual(&projection.results),
        timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC"),
    ))
}

fn render_results(results: &[CostResult], catalog: &CatalogStore) -> String {
    if results.is_empty() {
        return r#"<div class="note yellow">No models selected. Select at least one model to see costs.</div>"#
            .to_string();
    }

    let rows: String = results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                r#"<tr{class}><td>{rank}</td><td>{name}</td><td class="cyan">{provider}</td><td class="num">{input}</td><td class="num">{output}</td><td class="num">{total}</td><td class="num">{per_req}</td></tr>"#,
                class = if i == 0 { r#" class="cheapest""# } else { "" },
                rank = i + 1,
                name = html_escape(&truncate(&r.model.name, 48)),
                provider = html_escape(catalog.provider_name(&r.model.provider)),
                input = fmt_usd(r.input_cost),
                output = fmt_usd(r.output_cost),
                total = fmt_usd(r.total_cost),
                per_req = fmt_usd_fine(r.cost_per_request),
            )
        })
        .collect();

    format!(
        r#"<table><thead><tr><th>#</th><th>Model</th><th>Provider</th><th class="num">Input</th><th class="num">Output</th><th class="num">Total / mo</th><th class="num">Per Request</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

fn render_savings(savings: Option<&SavingsReport>) -> String {
    match savings {
        None => String::new(),
        Some(sv) => format!(
            r#"<div class="section">
    <div class="section-header">Potential Savings</div>
    <div class="note green">{statement} · {annual} per year</div>
  </div>"#,
            statement = html_escape(&savings_statement(sv)),
            annual = fmt_usd_whole(sv.annual_savings),
        ),
    }
}

fn render_annual(results: &[CostResult]) -> String {
    let rows = annual_projection(results);
    if rows.is_empty() {
        return r#"<div class="note">-</div>"#.to_string();
    }
    let body: String = rows
        .into_iter()
        .map(|(model, annual)| {
            format!(
                r#"<tr><td>{}</td><td class="num yellow">{}</td></tr>"#,
                html_escape(&model.name),
                fmt_usd_whole(annual)
            )
        })
        .collect();
    format!(
        r#"<table><thead><tr><th>Model</th><th class="num">Per Year</th></tr></thead><tbody>{}</tbody></table>"#,
        body
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
