//! Keyword fact generator CLI.
//!
//! Collects unique facts about a keyword from a local LLM subprocess and
//! exports them to an `.xlsx` workbook. Interrupting the run still exports
//! whatever was collected.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use factsmith::core::collector::AttemptOutcome;
use factsmith::exit_codes;
use factsmith::io::config::{RunConfig, load_config};
use factsmith::io::export::export_facts;
use factsmith::io::generator::SubprocessGenerator;
use factsmith::io::interrupt::{InterruptFlag, install_handler};
use factsmith::logging;
use factsmith::run::{AttemptReport, RunOutcome, run_collection};

#[derive(Parser)]
#[command(
    name = "factsmith",
    version,
    about = "Generate unique facts about a keyword with a local LLM"
)]
struct Cli {
    /// Subject to generate facts about. Prompted for interactively if omitted.
    keyword: Option<String>,

    /// Path to a TOML config file (defaults apply if missing).
    #[arg(long, default_value = "factsmith.toml")]
    config: PathBuf,

    /// Number of unique facts to collect.
    #[arg(long)]
    target: Option<u32>,

    /// Model identifier passed to the backend command.
    #[arg(long)]
    model: Option<String>,

    /// Minimum accepted fact length in characters.
    #[arg(long)]
    min_length: Option<usize>,

    /// Maximum accepted fact length in characters.
    #[arg(long)]
    max_length: Option<usize>,

    /// Per-attempt backend timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Total attempt budget before aborting.
    #[arg(long)]
    max_attempts: Option<u32>,

    /// Output file path (default: <keyword>_facts.xlsx).
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    logging::init();
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    let (config, keyword) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(err) => {
            eprintln!("{err:#}");
            return exit_codes::INVALID;
        }
    };

    let interrupt = InterruptFlag::new();
    if let Err(err) = install_handler(&interrupt) {
        // The run still works without the handler, minus graceful interrupts.
        eprintln!("warning: {err:#}");
    }

    let generator = SubprocessGenerator::new(
        config.backend.command.clone(),
        config.model.clone(),
        config.output_limit_bytes,
    );

    println!(
        "Collecting {} unique facts about '{}' using {}...",
        config.target_count, keyword, config.model
    );
    let outcome = run_collection(&config, &keyword, &generator, &interrupt, print_progress);

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&keyword));
    report_outcome(&outcome, &keyword);

    match export_facts(&output_path, &keyword, &outcome.facts) {
        Ok(()) => {
            println!("Saved {} facts to {}", outcome.facts.len(), output_path.display());
            exit_codes::OK
        }
        Err(err) => {
            eprintln!("export failed: {err:#}");
            exit_codes::EXPORT_FAILED
        }
    }
}

/// Load config, apply CLI overrides, and resolve the keyword.
fn prepare(cli: &Cli) -> Result<(RunConfig, String)> {
    let mut config = load_config(&cli.config)?;
    if let Some(target) = cli.target {
        config.target_count = target;
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(min_length) = cli.min_length {
        config.min_length = min_length;
    }
    if let Some(max_length) = cli.max_length {
        config.max_length = max_length;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.max_attempts = max_attempts;
    }
    config.validate()?;

    let keyword = match &cli.keyword {
        Some(keyword) => keyword.trim().to_string(),
        None => prompt_for_keyword()?,
    };
    if keyword.is_empty() {
        return Err(anyhow!("keyword must be a non-empty string"));
    }
    Ok((config, keyword))
}

fn prompt_for_keyword() -> Result<String> {
    print!("Enter a keyword to generate facts about: ");
    std::io::stdout().flush().context("flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read keyword from stdin")?;
    Ok(line.trim().to_string())
}

fn default_output_path(keyword: &str) -> PathBuf {
    let safe: String = keyword
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    PathBuf::from(format!("{safe}_facts.xlsx"))
}

fn print_progress(report: &AttemptReport) {
    match &report.outcome {
        AttemptOutcome::Accepted { sequence_number } => {
            let text = report.text.as_deref().unwrap_or("");
            println!(
                "  [{}/{}] #{}: {}",
                report.accepted_so_far,
                report.target_count,
                sequence_number,
                preview(text, 80)
            );
        }
        AttemptOutcome::Rejected(reason) => {
            println!("  attempt {} rejected: {reason}", report.attempt);
        }
        AttemptOutcome::Failed(failure) => {
            println!("  attempt {} failed: {failure}", report.attempt);
        }
    }
}

/// First `limit` characters with an ellipsis, safe at any char boundary.
fn preview(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let head: String = text.chars().take(limit).collect();
    format!("{head}...")
}

fn report_outcome(outcome: &RunOutcome, keyword: &str) {
    println!(
        "Generated {} facts about '{}' in {} attempts ({} failed): {}",
        outcome.accepted_count(),
        keyword,
        outcome.attempts,
        outcome.failures,
        outcome.stop.describe()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keyword_and_overrides() {
        let cli = Cli::parse_from(["factsmith", "volcanoes", "--target", "10"]);
        assert_eq!(cli.keyword.as_deref(), Some("volcanoes"));
        assert_eq!(cli.target, Some(10));
        assert_eq!(cli.config, PathBuf::from("factsmith.toml"));
    }

    #[test]
    fn parse_without_keyword() {
        let cli = Cli::parse_from(["factsmith"]);
        assert!(cli.keyword.is_none());
    }

    #[test]
    fn default_output_path_sanitizes_keyword() {
        assert_eq!(
            default_output_path("black holes"),
            PathBuf::from("black_holes_facts.xlsx")
        );
        assert_eq!(
            default_output_path("a/b"),
            PathBuf::from("a_b_facts.xlsx")
        );
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(preview("short", 80), "short");
        let long = "\u{e9}".repeat(100);
        let shown = preview(&long, 80);
        assert_eq!(shown.chars().count(), 83);
        assert!(shown.ends_with("..."));
    }
}
