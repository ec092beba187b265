//! # probe-club
//!
//! Runs the probe suites of the club domain and prints the summary report.
//!
//! ## Usage
//!
//! ```bash
//! # Run every suite
//! probe-club
//!
//! # Run two suites and keep the full output
//! probe-club --suite StructureChecks --suite ContractChecks --full-output results.txt
//!
//! # List suites and their tests
//! probe-club --list
//! ```

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use probe_club::suites;
use probe_core::{Catalog, HarnessConfig, TestEngine, TestSuite};
use std::io::{IsTerminal, stderr};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Color output mode for terminal display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Automatically detect if stderr is a TTY
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    fn should_use_colors(self) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => stderr().is_terminal(),
        }
    }
}

/// Probe harness for the club membership domain.
#[derive(Parser, Debug)]
#[command(name = "probe-club", version, about)]
struct Cli {
    /// Path to a YAML harness configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the full-detail report to this file
    #[arg(long)]
    full_output: Option<PathBuf>,

    /// Run only this suite (repeatable)
    #[arg(long = "suite", value_name = "NAME")]
    suites: Vec<String>,

    /// Register every test as an isolated test instead of per suite
    #[arg(long)]
    isolated: bool,

    /// Print the machine-readable run summary after the report
    #[arg(long)]
    json: bool,

    /// List suites and their tests without running them
    #[arg(long)]
    list: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Color output mode (auto, always, never)
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,
}

impl Cli {
    /// Loads the configuration file, if any, and applies the flags on top.
    fn config(&self) -> Result<HarnessConfig> {
        let mut config = match &self.config {
            Some(path) => HarnessConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => HarnessConfig::default(),
        };
        if let Some(path) = &self.full_output {
            config.full_output = Some(path.clone());
        }
        if !self.suites.is_empty() {
            config.suites = Some(self.suites.clone());
        }
        Ok(config)
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(stderr)
        .with_ansi(false)
        .init();
}

/// Builds the selected suites in run order. Unknown names are an error.
fn select_suites(catalog: &Arc<Catalog>, config: &HarnessConfig) -> Result<Vec<TestSuite>> {
    if let Some(names) = &config.suites {
        if let Some(unknown) = names.iter().find(|n| !suites::ALL.contains(&n.as_str())) {
            bail!(
                "Unknown suite '{}' (available: {})",
                unknown,
                suites::ALL.join(", ")
            );
        }
    }

    let mut selected = Vec::new();
    for name in suites::ALL.iter().filter(|n| config.selects(n)) {
        if let Some(suite) = suites::by_name(catalog, name) {
            selected.push(suite.with_context(|| format!("Failed to build suite {}", name))?);
        }
    }
    Ok(selected)
}

fn list(selected: &[TestSuite]) {
    println!("{}\n", "Available suites:".bold());
    for suite in selected {
        println!("  {}", suite.name().bold().underline());
        for test in suite.tests() {
            println!(
                "    {}  {}",
                test.name().cyan(),
                test.meta().description().dimmed()
            );
        }
    }
    let total: usize = selected.iter().map(|s| s.tests().len()).sum();
    println!(
        "\n  {}",
        format!(
            "Total: {} suite{}, {} test{}",
            selected.len(),
            if selected.len() == 1 { "" } else { "s" },
            total,
            if total == 1 { "" } else { "s" }
        )
        .dimmed()
    );
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    colored::control::set_override(cli.color.should_use_colors());

    let config = cli.config()?;
    let catalog = probe_club::catalog().context("Failed to build the club catalog")?;
    let selected = select_suites(&catalog, &config)?;
    debug!(suites = selected.len(), "Selected suites");

    if cli.list {
        list(&selected);
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!(
        "\n{} {}",
        "Probe: club membership".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    eprintln!("{}", "━".repeat(40).dimmed());

    let mut builder = TestEngine::builder().layout(config.report);
    if let Some(path) = &config.full_output {
        builder = builder.full_output(path);
    }
    for suite in selected {
        builder = if cli.isolated {
            builder.register_all_as_isolated(&suite)
        } else {
            builder.register_suite(suite)
        };
    }
    let mut engine = builder.build();

    info!(isolated = cli.isolated, "Running probe suites");
    let results = engine.run();

    if cli.json {
        let summary = serde_json::to_string_pretty(&results.summary())
            .context("Failed to serialize the run summary")?;
        println!("{}", summary);
    }

    if results.all_successful() {
        eprintln!(
            "{} {} tests passed",
            "✓".green().bold(),
            results.total_successes()
        );
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!(
            "{} {} of {} tests failed: {}",
            "✗".red().bold(),
            results.total_failures(),
            results.total_tests(),
            results.failed_names().join(", ")
        );
        Ok(ExitCode::FAILURE)
    }
}
