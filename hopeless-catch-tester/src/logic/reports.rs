use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use hopeless_catch_game::FishingStats;

use super::{SimulationResult, Strategy};

/// Per-strategy totals across every seed.
#[derive(Debug, Clone, Serialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub runs: usize,
    pub failed_runs: usize,
    pub abandoned: u64,
    pub stats: FishingStats,
}

#[must_use]
pub fn summarize(results: &[SimulationResult]) -> Vec<StrategySummary> {
    let mut by_strategy: BTreeMap<Strategy, StrategySummary> = BTreeMap::new();
    for result in results {
        let entry = by_strategy
            .entry(result.strategy)
            .or_insert_with(|| StrategySummary {
                strategy: result.strategy,
                runs: 0,
                failed_runs: 0,
                abandoned: 0,
                stats: FishingStats::new(),
            });
        entry.runs += 1;
        if !result.passed() {
            entry.failed_runs += 1;
        }
        entry.abandoned += u64::from(result.abandoned);
        entry.stats.merge(&result.stats);
    }
    by_strategy.into_values().collect()
}

fn fastest_strike(stats: &FishingStats) -> String {
    stats
        .fastest_reaction_ms
        .map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"))
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[SimulationResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Angler Run Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=====================".cyan())?;

    let passed = results.iter().filter(|r| r.passed()).count();
    writeln!(out, "Total runs: {}", results.len())?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (results.len() - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for summary in summarize(results) {
        let stats = &summary.stats;
        writeln!(out, "{}", summary.strategy.label().bold())?;
        writeln!(
            out,
            "   Casts: {}  Catches: {}  Catch rate: {:.1}%",
            stats.casts,
            stats.catches,
            stats.catch_rate_pct()
        )?;
        writeln!(
            out,
            "   Missed bites: {}  Escapes: {}  Lines broken: {}  Abandoned: {}",
            stats.bites_missed, stats.fish_escaped, stats.lines_broken, summary.abandoned
        )?;
        writeln!(
            out,
            "   Horror catches: {}  Mean reaction: {:.2}s  Fastest strike: {}",
            stats.horror_catches,
            stats.mean_reaction_secs(),
            fastest_strike(stats)
        )?;
        if !stats.catches_by_species.is_empty() {
            let species: Vec<String> = stats
                .catches_by_species
                .iter()
                .map(|(id, count)| format!("{id} x{count}"))
                .collect();
            writeln!(out, "   Landed: {}", species.join(", "))?;
        }
        writeln!(out)?;
    }

    for result in results.iter().filter(|r| !r.passed()) {
        writeln!(
            out,
            "{} {} seed {}",
            "❌ FAIL".red(),
            result.strategy.label().bold(),
            result.seed
        )?;
        for violation in &result.violations {
            writeln!(out, "     • {}", violation.red())?;
        }
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[SimulationResult]) -> Result<()> {
    #[derive(Serialize)]
    struct Report<'a> {
        runs: &'a [SimulationResult],
        summary: Vec<StrategySummary>,
    }

    let report = Report {
        runs: results,
        summary: summarize(results),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    results: &[SimulationResult],
    generated_at: &str,
) -> Result<()> {
    writeln!(out, "# Hopeless Catch Angler Results\n")?;
    writeln!(out, "_Generated {generated_at}_\n")?;
    writeln!(
        out,
        "| Strategy | Runs | Casts | Catches | Catch rate | Missed | Escaped | Broken | Abandoned | Horror | Fastest strike |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|---|")?;
    for summary in summarize(results) {
        let stats = &summary.stats;
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.1}% | {} | {} | {} | {} | {} | {} |",
            summary.strategy.label(),
            summary.runs,
            stats.casts,
            stats.catches,
            stats.catch_rate_pct(),
            stats.bites_missed,
            stats.fish_escaped,
            stats.lines_broken,
            summary.abandoned,
            stats.horror_catches,
            fastest_strike(stats)
        )?;
    }

    let failures: Vec<&SimulationResult> = results.iter().filter(|r| !r.passed()).collect();
    if !failures.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failures {
            writeln!(out, "### {} seed {}\n", result.strategy.label(), result.seed)?;
            for violation in &result.violations {
                writeln!(out, "- {violation}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
