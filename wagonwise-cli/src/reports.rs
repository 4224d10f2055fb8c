use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use wagonwise_core::{Advice, Explanation, NodeId, Priority, RouteMap, RouteQuote};

/// Outcome of a simulated fast-travel commit.
#[derive(Debug, Clone, Serialize)]
pub struct TravelReport {
    pub origin: NodeId,
    pub destination: NodeId,
    pub path: Vec<NodeId>,
    pub cost: u32,
    pub funds_before: f64,
    pub funds_after: f64,
    pub arrived_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct LocationRow<'a> {
    id: &'a NodeId,
    name: &'a str,
    neighbors: &'a [NodeId],
}

pub fn write_json<W: Write + ?Sized, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn priority_badge(priority: Priority) -> colored::ColoredString {
    let label = priority.label().to_uppercase();
    match priority {
        Priority::Critical => label.bright_red().bold(),
        Priority::High => label.yellow().bold(),
        Priority::Medium => label.cyan(),
        Priority::Low => label.normal(),
    }
}

pub fn write_advice_console<W: Write + ?Sized>(out: &mut W, advice: &Advice) -> Result<()> {
    let rec = &advice.recommendation;
    writeln!(out, "{}", "🧭 Wagonwise Advice".bright_cyan().bold())?;
    writeln!(out, "{}", "===================".cyan())?;
    writeln!(
        out,
        "[{}] {} {}",
        priority_badge(rec.priority),
        rec.primary_action.icon,
        rec.primary_action.text.bold()
    )?;
    if let Some(subtext) = &rec.primary_action.subtext {
        writeln!(out, "   {subtext}")?;
    }
    if let Some(impact) = &rec.primary_action.impact {
        writeln!(out, "   Impact: {}", impact.green())?;
    }
    if let Some(secondary) = &rec.secondary_action {
        writeln!(out, "   Then: {}", secondary.text)?;
    }
    if !rec.constraints.is_empty() {
        let labels: Vec<&str> = rec.constraints.iter().map(|c| c.as_str()).collect();
        writeln!(out, "   Constraints: {}", labels.join(", ").red())?;
    }
    writeln!(out, "   Rule: {} ({} game)", advice.rule_id, advice.phase)?;
    Ok(())
}

pub fn write_explanation_console<W: Write + ?Sized>(
    out: &mut W,
    explanation: &Explanation,
) -> Result<()> {
    write_advice_console(out, &explanation.advice)?;
    let diagnostics = &explanation.diagnostics;
    writeln!(out)?;
    writeln!(out, "{}", "🔎 Rule Trace".bright_yellow().bold())?;
    writeln!(out, "{}", "=============".yellow())?;
    for evaluation in &diagnostics.per_rule_evaluation {
        let status = if evaluation.rule_id == diagnostics.rule_id {
            "▶ SELECTED".green()
        } else if evaluation.matched {
            "✓ shadowed".yellow()
        } else {
            "✗ no match".dimmed()
        };
        writeln!(out, "{status} {}", evaluation.rule_id.bold())?;
        writeln!(out, "     {}", evaluation.reason)?;
    }
    writeln!(out, "Evaluated at {}", diagnostics.timestamp.to_rfc3339())?;
    Ok(())
}

pub fn write_route_console<W: Write + ?Sized>(
    out: &mut W,
    map: &RouteMap,
    quote: &RouteQuote,
) -> Result<()> {
    let from = map.display_name(quote.origin.as_str());
    let to = map.display_name(quote.destination.as_str());
    writeln!(out, "{} {} → {}", "🐎 Route".bright_cyan().bold(), from, to)?;
    if quote.path.is_empty() {
        writeln!(out, "   {}", "No overland route".red())?;
    } else {
        let names: Vec<&str> = quote
            .path
            .iter()
            .map(|id| map.display_name(id.as_str()))
            .collect();
        writeln!(out, "   {}", names.join(" → "))?;
        writeln!(out, "   Hops: {}", quote.hops)?;
    }
    writeln!(out, "   Fare: {}", format!("${}", quote.cost).green())?;
    Ok(())
}

pub fn write_travel_console<W: Write + ?Sized>(
    out: &mut W,
    map: &RouteMap,
    report: &TravelReport,
) -> Result<()> {
    writeln!(
        out,
        "{} {}",
        "✅ Arrived at".green().bold(),
        map.display_name(report.destination.as_str()).bold()
    )?;
    writeln!(
        out,
        "   Paid ${} from ${:.2}, ${:.2} left",
        report.cost, report.funds_before, report.funds_after
    )?;
    Ok(())
}

pub fn write_locations_console<W: Write + ?Sized>(out: &mut W, map: &RouteMap) -> Result<()> {
    writeln!(out, "{}", "📍 Locations".bright_cyan().bold())?;
    for id in map.locations() {
        let neighbors: Vec<&str> = map.neighbors(id.as_str()).iter().map(NodeId::as_str).collect();
        let links = if neighbors.is_empty() {
            "(isolated)".dimmed().to_string()
        } else {
            neighbors.join(", ")
        };
        writeln!(
            out,
            "  {:18} {:20} {}",
            id.as_str(),
            map.display_name(id.as_str()),
            links
        )?;
    }
    Ok(())
}

pub fn write_locations_json<W: Write + ?Sized>(out: &mut W, map: &RouteMap) -> Result<()> {
    let rows: Vec<LocationRow<'_>> = map
        .locations()
        .iter()
        .map(|id| LocationRow {
            id,
            name: map.display_name(id.as_str()),
            neighbors: map.neighbors(id.as_str()),
        })
        .collect();
    write_json(out, &rows)
}
