//! Command-line interface for banksafe.
//!
//! Provides commands for checking the configured state, adjudicating a
//! single request, replaying a scenario and inspecting configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use crate::config::{self, ResolvedConfig};
use crate::core::{Scenario, StepReport};
use crate::domain::{SafetyResult, SystemSnapshot};

pub mod render;

/// banksafe - Banker's algorithm deadlock-avoidance simulator
#[derive(Parser, Debug)]
#[command(name = "banksafe")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file describing the initial state
    #[arg(short, long, global = true, env = "BANKSAFE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the state tables and whether the state is safe
    Check,

    /// Ask for resources on behalf of a process
    Request {
        /// Process index (P0 is 0)
        process: usize,

        /// Units requested, one per resource type (e.g. `1 0 2` or `1,0,2`)
        #[arg(required = true, num_args = 1.., value_delimiter = ',')]
        units: Vec<u32>,
    },

    /// Replay a scenario file of requests
    Simulate {
        /// Scenario YAML file
        scenario: PathBuf,
    },

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let resolved = config::load_config(self.config.as_deref())?;

        match self.command {
            Commands::Check => check(resolved, self.json),
            Commands::Request { process, units } => request(resolved, process, &units, self.json),
            Commands::Simulate { scenario } => simulate(resolved, &scenario, self.json),
            Commands::Config => show_config(&resolved, self.json),
        }
    }
}

#[derive(Serialize)]
struct CheckOutput<'a> {
    resource_names: &'a [String],
    snapshot: &'a SystemSnapshot,
    safety: SafetyResult,
}

fn check(resolved: ResolvedConfig, json: bool) -> Result<()> {
    let bank = resolved.into_bank()?;
    let safety = bank.status();

    if json {
        return print_json(&CheckOutput {
            resource_names: bank.resource_names(),
            snapshot: bank.snapshot(),
            safety,
        });
    }

    println!("{}", render::state_tables(bank.snapshot(), bank.resource_names()));
    print!("{}", render::safety(&safety));
    Ok(())
}

fn request(resolved: ResolvedConfig, process: usize, units: &[u32], json: bool) -> Result<()> {
    let mut bank = resolved.into_bank()?;
    let result = bank
        .request(process, units)
        .with_context(|| format!("Invalid request for process {}", process))?;

    if json {
        return print_json(&result);
    }

    print!("{}", render::decision(process, &result));
    println!();
    print!("{}", render::state_tables(&result.snapshot, bank.resource_names()));
    Ok(())
}

#[derive(Serialize)]
struct SimulateOutput<'a> {
    scenario: &'a str,
    steps: &'a [StepReport],
    granted: u64,
    denied: u64,
    mismatches: usize,
}

fn simulate(resolved: ResolvedConfig, path: &Path, json: bool) -> Result<()> {
    let scenario = Scenario::from_file(path)?;
    replay(resolved, &scenario, json)
}

/// Run a loaded scenario; fails when any step's expectation is not met
fn replay(resolved: ResolvedConfig, scenario: &Scenario, json: bool) -> Result<()> {
    scenario.validate()?;

    let mut bank = resolved.into_bank()?;
    let initial = bank.status();
    let reports = scenario.run(&mut bank)?;
    let mismatches = reports.iter().filter(|r| r.is_mismatch()).count();

    if json {
        print_json(&SimulateOutput {
            scenario: &scenario.name,
            steps: &reports,
            granted: bank.requests_granted(),
            denied: bank.requests_denied(),
            mismatches,
        })?;
    } else {
        println!("Scenario: {}", scenario.name);
        if !scenario.description.is_empty() {
            println!("{}", scenario.description);
        }
        println!();
        print!("Initial state: {}", render::safety(&initial));
        for report in &reports {
            print!("{}", render::step(report));
        }
        println!();
        println!("{}", render::state_tables(bank.snapshot(), bank.resource_names()));
        println!(
            "{} granted, {} denied, {} unexpected",
            bank.requests_granted(),
            bank.requests_denied(),
            mismatches
        );
    }

    if mismatches > 0 {
        anyhow::bail!("{} step(s) did not match their expected outcome", mismatches);
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigOutput<'a> {
    source: String,
    processes: usize,
    resources: usize,
    resource_names: &'a [String],
    snapshot: &'a SystemSnapshot,
}

fn show_config(resolved: &ResolvedConfig, json: bool) -> Result<()> {
    if json {
        return print_json(&ConfigOutput {
            source: resolved.source.to_string(),
            processes: resolved.snapshot.process_count(),
            resources: resolved.snapshot.resource_count(),
            resource_names: &resolved.resource_names,
            snapshot: &resolved.snapshot,
        });
    }

    println!("Source:     {}", resolved.source);
    println!("Processes:  {}", resolved.snapshot.process_count());
    println!(
        "Resources:  {} ({})",
        resolved.snapshot.resource_count(),
        resolved.resource_names.join(", ")
    );
    println!("Totals:     {:?}", resolved.snapshot.totals());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, ConfigSource};
    use clap::CommandFactory;

    fn classic_config() -> ResolvedConfig {
        let (snapshot, resource_names) = ConfigFile::classic().resolve().unwrap();
        ResolvedConfig {
            source: ConfigSource::Builtin,
            snapshot,
            resource_names,
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_request_units() {
        let cli = Cli::try_parse_from(["banksafe", "request", "1", "1", "0", "2"]).unwrap();
        match cli.command {
            Commands::Request { process, units } => {
                assert_eq!(process, 1);
                assert_eq!(units, vec![1, 0, 2]);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::try_parse_from(["banksafe", "--json", "request", "0", "0,2,0"]).unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Request { units, .. } => assert_eq!(units, vec![0, 2, 0]),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_negative_units_are_rejected() {
        assert!(Cli::try_parse_from(["banksafe", "request", "1", "-1", "0", "2"]).is_err());
    }

    #[test]
    fn test_replay_accepts_matching_expectations() {
        let scenario = Scenario::from_yaml(
            r#"
name: grant-then-wait
steps:
  - process: 1
    request: [1, 0, 2]
    expect: granted
  - process: 4
    request: [3, 3, 0]
    expect: insufficient_available
"#,
        )
        .unwrap();

        replay(classic_config(), &scenario, true).unwrap();
    }

    #[test]
    fn test_replay_fails_on_unexpected_outcome() {
        let scenario = Scenario::from_yaml(
            r#"
name: over-claim
steps:
  - process: 1
    request: [2, 0, 0]
    expect: granted
"#,
        )
        .unwrap();

        let err = replay(classic_config(), &scenario, false).unwrap_err();
        assert!(format!("{:#}", err).contains("1 step(s) did not match"));
    }
}
