//! Engine configuration module
//!
//! Handles loading and validating blue-green settings from environment
//! variables. Everything has a sensible default so the engine works with
//! zero configuration.

use serde::{Deserialize, Serialize};

use crate::error::{BlueGreenError, Result};

/// Which phase an apply step targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationPhase {
    Blue,
    Green,
    Both,
}

/// How to handle operations that cannot be split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpossiblePolicy {
    /// Prompt the operator (interactive mode)
    Ask,
    /// Raise an error
    Fail,
    /// Apply the operation as-is
    Ignore,
    /// Skip the operation
    Skip,
}

/// Complete blue-green engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlueGreenConfig {
    /// Which phase to apply (blue/green/both)
    pub phase: MigrationPhase,
    /// Non-interactive mode (for CI/CD): fail instead of prompting
    pub non_interactive: bool,
    /// Policy for impossible operations
    pub impossible_policy: ImpossiblePolicy,
    /// Dry-run mode: never write migration files
    pub dry_run: bool,
    /// Include a generated-at header in written migrations
    pub include_header: bool,
    /// Output detail level (0 = quiet, 3 = full file dumps on dry run)
    pub verbosity: u8,
}

impl Default for BlueGreenConfig {
    fn default() -> Self {
        Self {
            phase: MigrationPhase::Both,
            non_interactive: false,
            impossible_policy: ImpossiblePolicy::Ask,
            dry_run: false,
            include_header: true,
            verbosity: 1,
        }
    }
}

impl BlueGreenConfig {
    /// Load settings from `BLUEGREEN_*` environment variables.
    ///
    /// Reads a `.env` file if one is present, then the process environment.
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; a malformed one is not.
        match dotenvy::dotenv() {
            Ok(_) => {}
            Err(e) if e.not_found() => {}
            Err(e) => return Err(BlueGreenError::Config(format!("failed to load .env: {e}"))),
        }

        let mut config = Self::default();

        if let Ok(raw) = std::env::var("BLUEGREEN_PHASE") {
            config.phase = parse_phase(&raw)?;
        }
        if let Ok(raw) = std::env::var("BLUEGREEN_NON_INTERACTIVE") {
            config.non_interactive = parse_bool("BLUEGREEN_NON_INTERACTIVE", &raw)?;
        }
        if let Ok(raw) = std::env::var("BLUEGREEN_IMPOSSIBLE_POLICY") {
            config.impossible_policy = parse_policy(&raw)?;
        }
        if let Ok(raw) = std::env::var("BLUEGREEN_DRY_RUN") {
            config.dry_run = parse_bool("BLUEGREEN_DRY_RUN", &raw)?;
        }
        if let Ok(raw) = std::env::var("BLUEGREEN_INCLUDE_HEADER") {
            config.include_header = parse_bool("BLUEGREEN_INCLUDE_HEADER", &raw)?;
        }
        if let Ok(raw) = std::env::var("BLUEGREEN_VERBOSITY") {
            config.verbosity = raw.parse().map_err(|_| {
                BlueGreenError::Config(format!("BLUEGREEN_VERBOSITY must be 0-3, got {raw:?}"))
            })?;
        }

        Ok(config)
    }
}

fn parse_phase(raw: &str) -> Result<MigrationPhase> {
    match raw.to_ascii_lowercase().as_str() {
        "blue" => Ok(MigrationPhase::Blue),
        "green" => Ok(MigrationPhase::Green),
        "both" => Ok(MigrationPhase::Both),
        other => Err(BlueGreenError::Config(format!(
            "BLUEGREEN_PHASE must be one of blue/green/both, got {other:?}"
        ))),
    }
}

fn parse_policy(raw: &str) -> Result<ImpossiblePolicy> {
    match raw.to_ascii_lowercase().as_str() {
        "ask" => Ok(ImpossiblePolicy::Ask),
        "fail" => Ok(ImpossiblePolicy::Fail),
        "ignore" => Ok(ImpossiblePolicy::Ignore),
        "skip" => Ok(ImpossiblePolicy::Skip),
        other => Err(BlueGreenError::Config(format!(
            "BLUEGREEN_IMPOSSIBLE_POLICY must be one of ask/fail/ignore/skip, got {other:?}"
        ))),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(BlueGreenError::Config(format!(
            "{var} must be a boolean (true/false), got {other:?}"
        ))),
    }
}
