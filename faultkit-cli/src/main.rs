//! # faultkit CLI
//!
//! Runs the failure demonstrations and prints how each failure was
//! classified and handled.
//!
//! Usage:
//!   faultkit [SCENARIO...]
//!   faultkit run [SCENARIO...]
//!   faultkit list
//!   faultkit taxonomy
//!
//! Examples:
//!   faultkit
//!   faultkit missing-file read-past-end
//!   faultkit --config inputs.json --json
//!   faultkit -vv run divide-by-zero

mod logging;

use clap::{ArgAction, Parser, Subcommand};
use faultkit_core::{ErrorKind, Harness, HarnessConfig, Report, Scenario};
use logging::{init_logging, LogLevel};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "faultkit")]
#[command(author, version, about = "faultkit - classify, dispatch and recover from failures")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Scenarios to run (when not using subcommands); all when empty
    #[arg(trailing_var_arg = true)]
    scenarios: Vec<Scenario>,

    /// JSON file overriding the default inputs
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - no headers, no summary, no logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print one JSON report per scenario
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run scenarios (all when none are named)
    Run {
        scenarios: Vec<Scenario>,
    },
    /// List the available scenarios
    List,
    /// Show the failure categories and what each specializes
    Taxonomy,
}

fn load_config(path: Option<&PathBuf>) -> HarnessConfig {
    match path {
        Some(path) => match HarnessConfig::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(2);
            }
        },
        None => HarnessConfig::default(),
    }
}

fn print_report(report: &Report, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Error: failed to serialize {}: {}", report.scenario, e),
        }
        return;
    }
    for line in report.lines() {
        println!("{}", line);
    }
}

/// Run scenarios in order; returns how many failures stayed unhandled
fn run_scenarios(config: HarnessConfig, scenarios: &[Scenario], quiet: bool, json: bool) -> usize {
    let harness = match Harness::new(config) {
        Ok(harness) => harness,
        Err(e) => {
            eprintln!("Error: failed to set up harness: {}", e);
            std::process::exit(2);
        }
    };

    tracing::info!(
        count = scenarios.len(),
        store = harness.store().backend_name(),
        "running scenarios"
    );
    let decorate = !quiet && !json;
    let mut group = None;
    let mut unhandled = 0;

    for &scenario in scenarios {
        let report = harness.run(scenario);

        if decorate && group != Some(report.group) {
            if group.is_some() {
                println!();
            }
            println!("=== {} ===", report.group.title());
            group = Some(report.group);
        }

        if report.outcome.is_unhandled() {
            unhandled += 1;
        }
        print_report(&report, json);
    }

    if decorate {
        println!();
        println!("{} scenarios run, {} unhandled", scenarios.len(), unhandled);
    }
    unhandled
}

fn list_scenarios() {
    let width = Scenario::ALL.iter().map(|s| s.name().len()).max().unwrap_or(0);
    for scenario in Scenario::ALL {
        println!(
            "{:width$}  {:<17}  {:<24}  {}",
            scenario.name(),
            scenario.group().title(),
            scenario.expected_kind().as_str(),
            scenario.description(),
            width = width
        );
    }
}

fn show_taxonomy() {
    for kind in ErrorKind::ALL {
        let chain: Vec<&str> = kind.ancestors().map(|k| k.as_str()).collect();
        println!("{}", chain.join(" -> "));
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(LogLevel::from_flags(cli.verbose, cli.quiet));

    let unhandled = match cli.command {
        Some(Commands::List) => {
            list_scenarios();
            0
        }
        Some(Commands::Taxonomy) => {
            show_taxonomy();
            0
        }
        Some(Commands::Run { scenarios }) => {
            let config = load_config(cli.config.as_ref());
            run_scenarios(config, selection(&scenarios), cli.quiet, cli.json)
        }
        None => {
            let config = load_config(cli.config.as_ref());
            run_scenarios(config, selection(&cli.scenarios), cli.quiet, cli.json)
        }
    };

    if unhandled > 0 {
        std::process::exit(1);
    }
}

/// Named scenarios, or every scenario when none were named
fn selection(named: &[Scenario]) -> &[Scenario] {
    if named.is_empty() {
        &Scenario::ALL
    } else {
        named
    }
}
