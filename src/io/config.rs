//! Run configuration, loaded from an optional TOML file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::core::collector::CollectorLimits;

/// Configuration for one collection run (TOML).
///
/// This file is intended to be edited by humans. Missing fields default to
/// values matching the stock ollama workflow; a missing file means all
/// defaults. The keyword is not part of the file, it comes from the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Number of unique facts to collect before stopping.
    pub target_count: u32,

    /// Inclusive character bounds a cleaned fact must satisfy.
    pub min_length: usize,
    pub max_length: usize,

    /// Total attempt budget (accepted + rejected + failed).
    pub max_attempts: u32,

    /// Consecutive generator failures treated as the backend being down.
    pub max_consecutive_failures: u32,

    /// Model identifier appended to the backend command.
    pub model: String,

    /// Per-attempt wall-clock budget for the backend process.
    pub timeout_secs: u64,

    /// Truncate captured backend stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,

    pub backend: BackendConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendConfig {
    /// Command the generator spawns; the model name is appended as the last
    /// argument (e.g. `["ollama", "run"]` becomes `ollama run llama3`).
    pub command: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            command: vec!["ollama".to_string(), "run".to_string()],
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_count: 1500,
            min_length: 20,
            max_length: 600,
            max_attempts: 15_000,
            max_consecutive_failures: 10,
            model: "llama3".to_string(),
            timeout_secs: 120,
            output_limit_bytes: 100_000,
            backend: BackendConfig::default(),
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_count == 0 {
            return Err(anyhow!("target_count must be > 0"));
        }
        if self.min_length > self.max_length {
            return Err(anyhow!(
                "min_length ({}) must not exceed max_length ({})",
                self.min_length,
                self.max_length
            ));
        }
        if self.max_attempts < self.target_count {
            return Err(anyhow!(
                "max_attempts ({}) must be at least target_count ({})",
                self.max_attempts,
                self.target_count
            ));
        }
        if self.max_consecutive_failures == 0 {
            return Err(anyhow!("max_consecutive_failures must be > 0"));
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("timeout_secs must be > 0"));
        }
        if self.output_limit_bytes == 0 {
            return Err(anyhow!("output_limit_bytes must be > 0"));
        }
        if self.model.trim().is_empty() {
            return Err(anyhow!("model must be a non-empty string"));
        }
        if self.backend.command.is_empty() || self.backend.command[0].trim().is_empty() {
            return Err(anyhow!("backend.command must be a non-empty array"));
        }
        Ok(())
    }

    pub fn limits(&self) -> CollectorLimits {
        CollectorLimits {
            target_count: self.target_count,
            min_length: self.min_length,
            max_length: self.max_length,
            max_attempts: self.max_attempts,
            max_consecutive_failures: self.max_consecutive_failures,
        }
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RunConfig::default()`.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    if !path.exists() {
        let cfg = RunConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RunConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
