//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rootbench/rootbench.toml`
//! 3. Explicit config file passed with `--config`
//! 4. Environment variables: `ROOTBENCH_*` prefix (`__` separates sections)
//!
//! Command-line flags are applied on top by the CLI layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::services::{ReportFormat, MAX_DIGITS};
use crate::application::ApplicationError;
use crate::domain::{
    expand_env_vars, RootApproximator, DEFAULT_DEGREE, DEFAULT_MAX_ITERATIONS, DEFAULT_PRECISION,
};

/// Environment variable prefix for overrides.
pub const ENV_PREFIX: &str = "ROOTBENCH";

/// Approximator parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApproximatorConfig {
    /// Root degree (3 = cube root)
    pub degree: u32,
    /// Maximum absolute error of `root^degree` against the input
    pub precision: f64,
    /// Hard cap on bisection steps
    pub max_iterations: u32,
    /// Fail instead of returning a best-effort root when precision is not met
    pub strict: bool,
}

impl Default for ApproximatorConfig {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            precision: DEFAULT_PRECISION,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            strict: false,
        }
    }
}

/// Benchmark harness parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    /// Largest digit length to test (1..=19)
    pub max_digits: u32,
    /// Calls per input; reported time is the mean
    pub repetitions: u32,
    /// Export format when the export path has no recognised extension
    pub format: ReportFormat,
    /// Export path; no export when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            max_digits: 10,
            repetitions: 1,
            format: ReportFormat::Toml,
            export: None,
        }
    }
}

/// Raw approximator config for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawApproximatorConfig {
    pub degree: Option<u32>,
    pub precision: Option<f64>,
    pub max_iterations: Option<u32>,
    pub strict: Option<bool>,
}

/// Raw bench config for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawBenchConfig {
    pub max_digits: Option<u32>,
    pub repetitions: Option<u32>,
    pub format: Option<ReportFormat>,
    pub export: Option<PathBuf>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub approximator: RawApproximatorConfig,
    pub bench: RawBenchConfig,
}

/// Unified configuration for rootbench.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub approximator: ApproximatorConfig,
    pub bench: BenchConfig,
}

/// Get the XDG config directory for rootbench.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rootbench").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rootbench.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base). Overlay wins where specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        let a = &overlay.approximator;
        let b = &overlay.bench;
        Self {
            approximator: ApproximatorConfig {
                degree: a.degree.unwrap_or(self.approximator.degree),
                precision: a.precision.unwrap_or(self.approximator.precision),
                max_iterations: a.max_iterations.unwrap_or(self.approximator.max_iterations),
                strict: a.strict.unwrap_or(self.approximator.strict),
            },
            bench: BenchConfig {
                max_digits: b.max_digits.unwrap_or(self.bench.max_digits),
                repetitions: b.repetitions.unwrap_or(self.bench.repetitions),
                format: b.format.unwrap_or(self.bench.format),
                export: b.export.clone().or_else(|| self.bench.export.clone()),
            },
        }
    }

    /// Expand shell variables and tilde in the export path.
    fn expand_paths(&mut self) {
        if let Some(export) = &self.bench.export {
            self.bench.export = Some(PathBuf::from(expand_env_vars(
                export.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `explicit` - Optional config file given on the command line; must exist
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/rootbench/rootbench.toml`
    /// 3. Explicit config file
    /// 4. Environment variables: `ROOTBENCH_*` prefix
    ///
    /// The result is not validated: command-line flags may still override
    /// it, so callers run [`Settings::validate`] once those are applied.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with_env(explicit, None)
    }

    /// Like [`Settings::load`], reading overrides from `env` instead of the
    /// process environment when given.
    pub fn load_with_env(
        explicit: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Explicit config file
        if let Some(path) = explicit {
            debug!("load: explicit config {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, env)?;

        current.expand_paths();

        Ok(current)
    }

    /// Apply ROOTBENCH_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let source = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .source(env);
        let config = Config::builder()
            .add_source(source)
            .build()
            .map_err(config_err)?;

        if let Some(val) = env_value(&config, "approximator.degree")? {
            settings.approximator.degree = val;
        }
        if let Some(val) = env_value(&config, "approximator.precision")? {
            settings.approximator.precision = val;
        }
        if let Some(val) = env_value(&config, "approximator.max_iterations")? {
            settings.approximator.max_iterations = val;
        }
        if let Some(val) = env_value(&config, "approximator.strict")? {
            settings.approximator.strict = val;
        }
        if let Some(val) = env_value(&config, "bench.max_digits")? {
            settings.bench.max_digits = val;
        }
        if let Some(val) = env_value(&config, "bench.repetitions")? {
            settings.bench.repetitions = val;
        }
        if let Some(val) = env_value(&config, "bench.format")? {
            settings.bench.format = val;
        }
        if let Some(val) = env_value::<String>(&config, "bench.export")? {
            settings.bench.export = Some(PathBuf::from(val));
        }

        Ok(settings)
    }

    /// Reject values the approximator or harness cannot run with.
    pub fn validate(&self) -> Result<(), ApplicationError> {
        self.build_approximator()?;
        if self.bench.max_digits == 0 || self.bench.max_digits > MAX_DIGITS {
            return Err(ApplicationError::Config {
                message: format!(
                    "bench.max_digits must be between 1 and {}, got {}",
                    MAX_DIGITS, self.bench.max_digits
                ),
            });
        }
        if self.bench.repetitions == 0 {
            return Err(ApplicationError::Config {
                message: "bench.repetitions must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Build the approximator described by these settings.
    pub fn build_approximator(&self) -> Result<RootApproximator, ApplicationError> {
        let a = &self.approximator;
        RootApproximator::new(a.degree, a.precision, a.max_iterations, a.strict).map_err(|e| {
            ApplicationError::Config {
                message: e.to_string(),
            }
        })
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# rootbench configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/rootbench/rootbench.toml
#   Explicit: rootbench --config <FILE>
#   Env:      ROOTBENCH_<SECTION>__<KEY>, e.g. ROOTBENCH_APPROXIMATOR__PRECISION=1e-8

[approximator]
# Root degree, 2 to 64 (3 = cube root)
# degree = 3

# Accept a midpoint m once |m^degree - |n|| < precision
# precision = 1e-10

# Hard cap on bisection steps
# max_iterations = 4096

# Fail instead of returning a best-effort root when precision is not reached
# strict = false

[bench]
# Test values 10^(d-1) + 5 for d in 1..=max_digits (max 19)
# max_digits = 10

# Calls per value; the reported time is the mean
# repetitions = 1

# Export format: "toml" or "json" (overridden by the export file extension)
# format = "toml"

# Write samples here after each run
# export = "~/rootbench/last-run.toml"
"#
        .to_string()
    }
}

/// Read an optional key; a present but malformed value is an error.
fn env_value<T: DeserializeOwned>(config: &Config, key: &str) -> Result<Option<T>, ApplicationError> {
    match config.get::<T>(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
