//! Viewer configuration.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `STORM_*` environment variables, then command-line flags (applied by the
//! binary). YAML values may reference the environment with `${VAR}` or
//! `${VAR:-default}`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use storm_engine::ExplorerConfig;

/// Top-level viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Boundary file (GeoJSON feature collection or region list)
    pub boundary_path: PathBuf,

    /// Observation records (JSON array)
    pub observations_path: PathBuf,

    /// Directory PNG frames are written to
    pub output_dir: PathBuf,

    /// Engine settings
    pub explorer: ExplorerConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            boundary_path: PathBuf::from("data/states.json"),
            observations_path: PathBuf::from("data/storms.json"),
            output_dir: PathBuf::from("out"),
            explorer: ExplorerConfig::default(),
        }
    }
}

impl ViewerConfig {
    /// Load defaults, an optional YAML file and environment overrides, then validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_yaml(path)?,
            None => Self::default(),
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read viewer config from {:?}", path.as_ref()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse viewer config from {:?}", path.as_ref()))
    }

    /// Parse YAML content after environment substitution.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let expanded = expand_env_vars(content)?;
        Ok(serde_yaml::from_str(&expanded)?)
    }

    /// Apply `STORM_*` environment variables.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("STORM_BOUNDARY") {
            self.boundary_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("STORM_OBSERVATIONS") {
            self.observations_path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("STORM_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(val);
        }
        self.explorer = self.explorer.with_env_overrides();
        self
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.boundary_path.as_os_str().is_empty(),
            "Boundary path cannot be empty"
        );
        anyhow::ensure!(
            !self.observations_path.as_os_str().is_empty(),
            "Observations path cannot be empty"
        );
        self.explorer
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid explorer config: {}", e))
    }
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Expand `${VAR}` and `${VAR:-default}` references.
pub fn expand_env_vars(content: &str) -> Result<String> {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            result.push(ch);
            continue;
        }
        chars.next();

        let mut expr = String::new();
        loop {
            match chars.next() {
                Some('}') => break,
                Some(c) => expr.push(c),
                None => anyhow::bail!("Unclosed variable substitution: ${{{}", expr),
            }
        }
        result.push_str(&resolve_var_expr(&expr)?);
    }

    Ok(result)
}

fn resolve_var_expr(expr: &str) -> Result<String> {
    if let Some((name, default)) = expr.split_once(":-") {
        match std::env::var(name.trim()) {
            Ok(val) if !val.is_empty() => Ok(val),
            _ => Ok(default.to_string()),
        }
    } else {
        std::env::var(expr.trim()).with_context(|| format!("Environment variable {} not set", expr))
    }
}
