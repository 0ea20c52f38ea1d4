//! Plain-text rendering of the dashboard and the investor report.
//!
//! Output is built into a `String` so the same text can go to the terminal
//! or to an exported file.

use std::fmt::Write;

use founderval_core::{
    AnalysisResult, Project, ProjectStatus, User, Verdict, validate_analysis,
};

const BAR_WIDTH: usize = 30;
const LABEL_WIDTH: usize = 14;
const FOOTER: &str = "Generated by Idea Validator AI. Not financial advice.";

// ── Public API ──

/// Dashboard: one line per project, most recent first.
pub fn render_dashboard(user: Option<&User>, projects: &[Project]) -> String {
    let mut out = String::new();
    if let Some(user) = user {
        let _ = writeln!(out, "Welcome back, {}", user.name);
        out.push('\n');
    }
    if projects.is_empty() {
        out.push_str("No projects yet. Run `founderval analyze` to validate your first idea.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10}  {:<10}  {:>5}  {:<36}  {}",
        "DATE", "STATUS", "SCORE", "ID", "TITLE"
    );
    for p in projects {
        let score = p
            .average_score()
            .map(|s| format!("{s:.1}"))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<10}  {:<10}  {:>5}  {:<36}  {}",
            date(p),
            p.status,
            score,
            p.id,
            p.submission.title
        );
    }
    out
}

/// Full investor report for one project.
pub fn render_report(project: &Project) -> String {
    let mut out = String::new();
    let s = &project.submission;
    let _ = writeln!(out, "=== {} ===", s.title);
    let _ = writeln!(out, "{} · {} · {}", s.industry, s.location, date(project));
    out.push('\n');

    let analysis = match (&project.analysis, project.status) {
        (Some(a), _) => a,
        (None, ProjectStatus::Failed) => {
            out.push_str("Analysis failed. Submit the idea again to retry.\n");
            return out;
        }
        (None, _) => {
            out.push_str("Analysis in progress.\n");
            return out;
        }
    };

    render_summary(&mut out, analysis);
    render_scores(&mut out, analysis);
    render_team(&mut out, analysis);
    render_market(&mut out, analysis);
    render_financials(&mut out, analysis);
    render_legal(&mut out, analysis);
    render_risks(&mut out, analysis);
    render_notes(&mut out, analysis);

    out.push('\n');
    out.push_str(FOOTER);
    out.push('\n');
    out
}

// ── Sections ──

fn render_summary(out: &mut String, a: &AnalysisResult) {
    let badge = match a.verdict() {
        Verdict::Invest => "[INVEST]",
        Verdict::Pivot => "[PIVOT]",
        Verdict::Kill => "[KILL]",
    };
    section(out, "Executive Summary");
    let _ = writeln!(out, "  Verdict: {badge} {}", a.investment_verdict);
    out.push('\n');
    paragraph(out, &a.executive_summary);
}

fn render_scores(out: &mut String, a: &AnalysisResult) {
    section(out, "Scores");
    for (label, value) in a.scores.labelled() {
        let _ = writeln!(
            out,
            "  {label:<LABEL_WIDTH$} {:<BAR_WIDTH$} {value:>3}",
            bar(value as f64, 100.0)
        );
    }
    let _ = writeln!(out, "  {:<LABEL_WIDTH$} {:.1}", "Average", a.scores.average());
}

fn render_team(out: &mut String, a: &AnalysisResult) {
    section(out, "Recommended Stack");
    bullets(out, &a.recommended_stack);
    section(out, "Key Hires");
    bullets(out, &a.hiring_plan);
}

fn render_market(out: &mut String, a: &AnalysisResult) {
    section(out, "Market Analysis");
    paragraph(out, &a.market_analysis);
    section(out, "Competitors");
    bullets(out, &a.competitors);
}

fn render_financials(out: &mut String, a: &AnalysisResult) {
    section(out, "Financial Projections");
    if a.financials.is_empty() {
        out.push_str("  (none)\n");
        return;
    }
    let _ = writeln!(
        out,
        "  {:<10} {:>14} {:>14} {:>14}",
        "Year", "Revenue", "Cost", "Profit"
    );
    for f in &a.financials {
        let _ = writeln!(
            out,
            "  {:<10} {:>14} {:>14} {:>14}",
            f.year,
            format_usd(f.revenue),
            format_usd(f.cost),
            format_usd(f.profit)
        );
    }
    out.push('\n');

    let max = a
        .financials
        .iter()
        .flat_map(|f| [f.revenue.abs(), f.profit.abs()])
        .fold(0.0_f64, f64::max);
    for f in &a.financials {
        let _ = writeln!(out, "  {:<10} revenue {}", f.year, bar(f.revenue, max));
        let loss = if f.profit < 0.0 { " (loss)" } else { "" };
        let _ = writeln!(out, "  {:<10} profit  {}{loss}", "", bar(f.profit.abs(), max));
    }
}

fn render_legal(out: &mut String, a: &AnalysisResult) {
    section(out, "Legal Roadmap");
    if a.legal_steps.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, step) in a.legal_steps.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, step.title);
        let _ = writeln!(out, "     {}", step.description);
    }
}

fn render_risks(out: &mut String, a: &AnalysisResult) {
    section(out, "Risk Assessment");
    if a.risks.is_empty() {
        out.push_str("  (none)\n");
    }
    for r in &a.risks {
        let _ = writeln!(out, "  [{} Risk] {}", r.severity, r.risk);
        let _ = writeln!(out, "     Mitigation: {}", r.mitigation);
    }
}

fn render_notes(out: &mut String, a: &AnalysisResult) {
    let violations = validate_analysis(a);
    if violations.is_empty() {
        return;
    }
    section(out, "Report Notes");
    for v in violations {
        let _ = writeln!(out, "  - {v}");
    }
}

// ── Helpers ──

fn section(out: &mut String, header: &str) {
    out.push('\n');
    out.push_str(header);
    out.push('\n');
}

fn paragraph(out: &mut String, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

fn bullets(out: &mut String, items: &[String]) {
    if items.is_empty() {
        out.push_str("  (none)\n");
    }
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn date(p: &Project) -> String {
    p.created_at_utc()
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Horizontal bar proportional to `value / max`, clamped to the bar width.
fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() {
        return String::new();
    }
    let filled = ((value / max).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}

/// Whole-dollar amount with thousands separators: `-$12,500`.
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
