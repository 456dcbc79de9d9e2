// ── display helpers shared by the terminal and HTML renderers ────────────────
//
// Costs are carried unrounded through the calculator; rounding happens here
// and only here.

use chrono::{DateTime, NaiveDate, Utc};

/// Monthly and per-model totals: two decimals.
pub fn fmt_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Per-request costs are small; four decimals.
pub fn fmt_usd_fine(amount: f64) -> String {
    format!("${:.4}", amount)
}

/// Annual projections: whole dollars with thousands separators.
pub fn fmt_usd_whole(amount: f64) -> String {
    format!("${}", group_thousands(amount.max(0.0).round() as u64))
}

pub fn fmt_rate(per_mtok: f64) -> String {
    format!("${:.2}/1M", per_mtok)
}

pub fn fmt_percent(pct: f64) -> String {
    format!("{:.1}%", pct)
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn fmt_tokens(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}k", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

pub fn fmt_context_window(size: Option<u64>) -> String {
    match size {
        None | Some(0) => "N/A".to_string(),
        Some(n) if n >= 1_000_000 => format!("{:.1}M", n as f64 / 1_000_000.0),
        Some(n) if n >= 1_000 => format!("{:.0}K", n as f64 / 1_000.0),
        Some(n) => n.to_string(),
    }
}

pub fn fmt_ts(ts: Option<DateTime<Utc>>) -> String {
    match ts {
        Some(t) => t.format("%Y-%m-%d %H:%M").to_string(),
        None => "-".to_string(),
    }
}

pub fn fmt_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
