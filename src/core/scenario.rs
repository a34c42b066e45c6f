//! Scenario definitions and replay.
//!
//! Scenarios are defined in YAML as an ordered list of steps. Each step
//! is either a resource request (optionally with the expected outcome) or
//! a reset back to the initial state.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::{AdjudicationResult, Reason, SafetyResult};

use super::bank::Bank;

/// A scripted sequence of requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name (shown in reports)
    pub name: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Steps, applied in order
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse a scenario from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse scenario YAML")
    }

    /// Validate the scenario definition
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Scenario name cannot be empty");
        }

        if self.steps.is_empty() {
            anyhow::bail!("Scenario must have at least one step");
        }

        for (i, step) in self.steps.iter().enumerate() {
            if let ScenarioStep::Reset { reset: false } = step {
                anyhow::bail!("Step {} has `reset: false`; omit the step instead", i);
            }
        }

        Ok(())
    }

    /// Replay every step against `bank`
    ///
    /// Malformed requests abort the replay; denials do not.
    pub fn run(&self, bank: &mut Bank) -> Result<Vec<StepReport>> {
        let mut reports = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            let report = match step {
                ScenarioStep::Request {
                    process,
                    request,
                    expect,
                } => {
                    let result = bank
                        .request(*process, request)
                        .with_context(|| format!("Step {} of scenario '{}'", index, self.name))?;
                    StepReport::Decision {
                        index,
                        process: *process,
                        request: request.clone(),
                        expected: *expect,
                        result,
                    }
                }
                ScenarioStep::Reset { .. } => StepReport::Reset {
                    index,
                    status: bank.reset(),
                },
            };
            reports.push(report);
        }

        Ok(reports)
    }
}

/// A single scenario step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScenarioStep {
    /// Ask for `request` on behalf of `process`
    Request {
        process: usize,
        request: Vec<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expect: Option<Reason>,
    },

    /// Return to the initial state
    Reset { reset: bool },
}

/// What happened at one step of a replay
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StepReport {
    Decision {
        index: usize,
        process: usize,
        request: Vec<u32>,
        expected: Option<Reason>,
        result: AdjudicationResult,
    },
    Reset {
        index: usize,
        status: SafetyResult,
    },
}

impl StepReport {
    /// True when the step declared an expected reason and got another one
    pub fn is_mismatch(&self) -> bool {
        match self {
            StepReport::Decision {
                expected: Some(expected),
                result,
                ..
            } => *expected != result.reason,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SystemSnapshot;

    const CLASSIC: &str = r#"
name: classic
description: grant P1, then P0 would deadlock
steps:
  - process: 1
    request: [1, 0, 2]
    expect: granted
  - process: 0
    request: [0, 2, 0]
    expect: would_deadlock
  - reset: true
  - process: 1
    request: [2, 0, 0]
    expect: granted
"#;

    fn classic_bank() -> Bank {
        let snapshot = SystemSnapshot::new(
            vec![3, 3, 2],
            vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
        )
        .unwrap();
        Bank::with_default_names(snapshot)
    }

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_yaml(CLASSIC).unwrap();
        assert_eq!(scenario.name, "classic");
        assert_eq!(scenario.steps.len(), 4);
        assert_eq!(
            scenario.steps[0],
            ScenarioStep::Request {
                process: 1,
                request: vec![1, 0, 2],
                expect: Some(Reason::Granted),
            }
        );
        assert_eq!(scenario.steps[2], ScenarioStep::Reset { reset: true });
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_empty_and_false_reset() {
        let scenario = Scenario::from_yaml("name: empty\nsteps: []\n").unwrap();
        assert!(scenario.validate().is_err());

        let scenario = Scenario::from_yaml("name: x\nsteps:\n  - reset: false\n").unwrap();
        assert!(scenario.validate().is_err());
    }

    #[test]
    fn test_run_reports_expectation_mismatch() {
        let scenario = Scenario::from_yaml(CLASSIC).unwrap();
        let mut bank = classic_bank();
        let reports = scenario.run(&mut bank).unwrap();

        assert_eq!(reports.len(), 4);
        assert!(!reports[0].is_mismatch());
        assert!(!reports[1].is_mismatch());
        assert!(matches!(reports[2], StepReport::Reset { .. }));
        // [2,0,0] exceeds need[1] = [1,2,2]
        assert!(reports[3].is_mismatch());
        assert_eq!(bank.snapshot(), bank.initial());
    }

    #[test]
    fn test_run_aborts_on_malformed_request() {
        let scenario = Scenario::from_yaml("name: bad\nsteps:\n  - process: 7\n    request: [0, 0, 0]\n").unwrap();
        let mut bank = classic_bank();
        let err = scenario.run(&mut bank).unwrap_err();
        assert!(format!("{:#}", err).contains("Step 0"));
    }
}
