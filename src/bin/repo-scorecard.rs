//! CLI tool for scoring repository quality

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use repo_scorecard::{
    analyze, analyze_with_enhancement, fetch_snapshot, AnalysisResult, AnalyzerConfig, Dimension,
    Enhancer, Importance, RepoHealth, RepositorySnapshot, Severity,
};
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "repo-scorecard")]
#[command(about = "Score GitHub repositories for code quality, documentation, security and maintenance", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a repository and display a summary
    Scan {
        #[command(flatten)]
        source: SourceArgs,

        /// Fail if the overall score is below this threshold (0-100)
        #[arg(long)]
        fail_threshold: Option<u8>,

        /// Display insights, tech stack and every missing file
        #[arg(long)]
        detailed: bool,
    },

    /// Generate a full analysis report
    Report {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(short = 'f', long, default_value = "markdown")]
        format: ReportFormat,

        /// Output file (default: stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
    },

    /// Check a repository against a minimum score (exit code based)
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Minimum acceptable overall score (0-100)
        #[arg(long, default_value = "60")]
        min_score: u8,
    },
}

#[derive(Args)]
struct SourceArgs {
    #[command(flatten)]
    target: Target,

    /// Skip the generative narrative even when a provider is configured
    #[arg(long)]
    no_ai: bool,
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct Target {
    /// Repository to analyze (owner/repo or GitHub URL)
    repo: Option<String>,

    /// Analyze a saved snapshot (JSON) instead of fetching from GitHub
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

#[derive(Clone, Debug)]
enum ReportFormat {
    Json,
    Markdown,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };

    match cli.command {
        Commands::Scan {
            source,
            fail_threshold,
            detailed,
        } => {
            let result = run_analysis(&source, &config).await?;
            display_summary(&result);

            if detailed {
                println!();
                display_detailed(&result);
            }

            if let Some(threshold) = fail_threshold {
                if result.scores.overall < threshold {
                    eprintln!(
                        "\n{} overall score {} is below threshold {}",
                        "Failed:".red().bold(),
                        result.scores.overall,
                        threshold
                    );
                    return Ok(1);
                }
            }
        }

        Commands::Report {
            source,
            format,
            output,
        } => {
            let result = run_analysis(&source, &config).await?;
            let content = match format {
                ReportFormat::Json => generate_json_report(&result)?,
                ReportFormat::Markdown => generate_markdown_report(&result),
            };

            if let Some(output_path) = output {
                std::fs::write(&output_path, content).with_context(|| {
                    format!("Failed to write report to {}", output_path.display())
                })?;
                println!("Report written to: {}", output_path.display());
            } else {
                println!("{}", content);
            }
        }

        Commands::Check { source, min_score } => {
            let result = run_analysis(&source, &config).await?;
            let mut failures = Vec::new();

            if result.scores.overall < min_score {
                failures.push(format!(
                    "  - overall score {} < {}",
                    result.scores.overall, min_score
                ));
            }

            for missing in &result.missing_files {
                if missing.importance == Importance::Critical {
                    failures.push(format!("  - missing critical file: {}", missing.name));
                }
            }

            if !failures.is_empty() {
                eprintln!("{} {} check failures:", "Failed:".red().bold(), failures.len());
                for failure in failures {
                    eprintln!("{}", failure);
                }
                return Ok(1);
            }

            println!(
                "{} {} scored {}/100, all checks passed!",
                "Success:".green().bold(),
                result.full_name,
                result.scores.overall
            );
        }
    }

    Ok(0)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run_analysis(source: &SourceArgs, config: &AnalyzerConfig) -> Result<AnalysisResult> {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let snapshot = match (&source.target.snapshot, &source.target.repo) {
        (Some(path), _) => {
            spinner.set_message("Loading snapshot...");
            load_snapshot(path)?
        }
        (None, Some(repo)) => {
            spinner.set_message(format!("Fetching {}...", repo));
            fetch_snapshot(repo, &config.network)
                .await
                .with_context(|| format!("Failed to fetch repository {}", repo))?
        }
        (None, None) => anyhow::bail!("Provide a repository or --snapshot FILE"),
    };

    spinner.set_message("Analyzing repository...");
    let result = if source.no_ai || !config.enhancement.is_configured() {
        analyze(&snapshot)
    } else {
        let enhancer = Enhancer::new(&config.enhancement)?;
        analyze_with_enhancement(&snapshot, &enhancer).await
    };

    spinner.finish_and_clear();

    let result = result.with_context(|| {
        format!("Failed to analyze {}", snapshot.repository.full_name)
    })?;
    info!(
        "{} analyzed (narrative source: {})",
        result.full_name,
        if result.ai_powered { "provider" } else { "rules" }
    );

    Ok(result)
}

fn load_snapshot(path: &Path) -> Result<RepositorySnapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let snapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    Ok(snapshot)
}

fn colored_score(score: u8) -> ColoredString {
    let text = score.to_string();
    match RepoHealth::from_score(score) {
        RepoHealth::Excellent | RepoHealth::Good => text.green(),
        RepoHealth::Fair => text.yellow(),
        RepoHealth::NeedsWork => text.truecolor(255, 165, 0), // Orange
        RepoHealth::Critical => text.red(),
    }
}

fn score_bar(score: u8) -> String {
    let filled = (score as usize + 5) / 10;
    format!("{}{}", "█".repeat(filled), "░".repeat(10 - filled))
}

fn display_summary(result: &AnalysisResult) {
    println!("\n{}", "=== Repository Scorecard ===".bold());
    println!("Repository: {}", result.full_name.cyan());
    println!(
        "Overall score: {}/100 ({})",
        colored_score(result.scores.overall).bold(),
        result.repo_health
    );
    println!(
        "Complexity: {} | Team: {}",
        result.complexity_level, result.estimated_team_size
    );
    println!();

    println!("Scores:");
    for dimension in Dimension::ALL {
        let score = result.scores.get(dimension);
        println!(
            "  {:<22} {} {:>3}",
            dimension.to_string(),
            score_bar(score),
            colored_score(score)
        );
    }
    println!();

    println!("{}", result.summary);

    if !result.suggestions.is_empty() {
        println!("\nSuggestions:");
        for suggestion in &result.suggestions {
            println!("  - {}", suggestion);
        }
    }

    let critical: Vec<_> = result
        .missing_files
        .iter()
        .filter(|m| m.importance == Importance::Critical)
        .collect();
    if !critical.is_empty() {
        println!("\n{}", "Missing critical files:".red());
        for missing in critical {
            println!("  - {}", missing.name);
        }
    }
}

fn display_detailed(result: &AnalysisResult) {
    println!("{}", "=== Insights ===".bold());

    for insight in &result.insights {
        let severity = match insight.severity {
            Severity::Critical => insight.severity.to_string().red(),
            Severity::Warning => insight.severity.to_string().yellow(),
            Severity::Info => insight.severity.to_string().cyan(),
            Severity::Success => insight.severity.to_string().green(),
        };

        println!("\n[{}] {} ({})", severity, insight.title.bold(), insight.category);
        println!("  {}", insight.description);
        if let Some(suggestion) = &insight.suggestion {
            println!("  Suggestion: {}", suggestion.yellow());
        }
    }

    if !result.tech_stack.is_empty() {
        println!("\n{}", "=== Tech Stack ===".bold());
        for tech in &result.tech_stack {
            println!(
                "  {} ({}, confidence {:.1})",
                tech.name, tech.category, tech.confidence
            );
        }
    }

    if !result.missing_files.is_empty() {
        println!("\n{}", "=== Missing Files ===".bold());
        for missing in &result.missing_files {
            println!(
                "  {} [{}]: {}",
                missing.name, missing.importance, missing.description
            );
        }
    }
}

fn generate_json_report(result: &AnalysisResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("Failed to serialize report")
}

fn generate_markdown_report(result: &AnalysisResult) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Repository Scorecard: {}\n\n", result.full_name));
    md.push_str(&format!("**Generated:** {}\n\n", result.analyzed_at));

    md.push_str("## Summary\n\n");
    md.push_str(&format!(
        "- Overall score: {}/100 ({})\n",
        result.scores.overall, result.repo_health
    ));
    md.push_str(&format!("- Complexity: {}\n", result.complexity_level));
    md.push_str(&format!("- Estimated team: {}\n", result.estimated_team_size));
    md.push_str(&format!(
        "- Narrative: {}\n\n",
        if result.ai_powered { "enhanced" } else { "rule-based" }
    ));
    md.push_str(&format!("{}\n\n", result.summary));

    md.push_str("## Scores\n\n");
    md.push_str("| Dimension | Weight | Score |\n");
    md.push_str("|-----------|--------|-------|\n");
    for dimension in Dimension::ALL {
        md.push_str(&format!(
            "| {} | {}% | {} |\n",
            dimension,
            dimension.weight_percent(),
            result.scores.get(dimension)
        ));
    }
    md.push('\n');

    if !result.insights.is_empty() {
        md.push_str("## Insights\n\n");
        for insight in &result.insights {
            md.push_str(&format!(
                "### {} ({}, {})\n\n{}\n\n",
                insight.title, insight.severity, insight.category, insight.description
            ));
            if let Some(suggestion) = &insight.suggestion {
                md.push_str(&format!("> {}\n\n", suggestion));
            }
        }
    }

    if !result.suggestions.is_empty() {
        md.push_str("## Suggestions\n\n");
        for suggestion in &result.suggestions {
            md.push_str(&format!("- {}\n", suggestion));
        }
        md.push('\n');
    }

    if !result.tech_stack.is_empty() {
        md.push_str("## Tech Stack\n\n");
        md.push_str("| Name | Category | Confidence |\n");
        md.push_str("|------|----------|------------|\n");
        for tech in &result.tech_stack {
            md.push_str(&format!(
                "| {} | {} | {:.1} |\n",
                tech.name, tech.category, tech.confidence
            ));
        }
        md.push('\n');
    }

    if !result.missing_files.is_empty() {
        md.push_str("## Missing Files\n\n");
        md.push_str("| File | Importance | Why |\n");
        md.push_str("|------|------------|-----|\n");
        for missing in &result.missing_files {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                missing.name, missing.importance, missing.description
            ));
        }
    }

    md
}
