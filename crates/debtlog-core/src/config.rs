use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

use crate::score::Priority;
use crate::summary::{DEFAULT_TOP_N, ReportSettings};

const PROJECT_CONFIG_PATH: &str = ".debtlog/config.toml";
const USER_CONFIG_PATH: &str = "debtlog/config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_high_priority_threshold")]
    pub high_priority_threshold: f64,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            high_priority_threshold: default_high_priority_threshold(),
        }
    }
}

impl ReportConfig {
    /// Validate and convert into the settings used by the report view.
    ///
    /// # Errors
    ///
    /// Fails when the threshold is negative or not a finite number.
    pub fn settings(&self) -> Result<ReportSettings> {
        let Some(high_priority_threshold) = Priority::from_decimal(self.high_priority_threshold)
        else {
            bail!(
                "invalid report.high_priority_threshold: {}",
                self.high_priority_threshold
            );
        };
        Ok(ReportSettings {
            top_n: self.top_n,
            high_priority_threshold,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
    pub report: ReportSettings,
}

/// Parse the TOML file at `path` into `T`, or `T::default()` when it does not exist.
fn read_toml_or_default<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load `.debtlog/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    read_toml_or_default(&project_root.join(PROJECT_CONFIG_PATH))
}

/// Load `<config_dir>/debtlog/config.toml`, or defaults if absent.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    dirs::config_dir().map_or_else(
        || Ok(UserConfig::default()),
        |dir| read_toml_or_default(&dir.join(USER_CONFIG_PATH)),
    )
}

/// Merge project config, user config, and the `FORMAT` env var.
///
/// # Errors
///
/// Fails when either config file is malformed or holds invalid values.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;
    let report = project.report.settings()?;

    let resolved_output = resolve_output(
        cli_json,
        user.output.as_deref(),
        env::var("FORMAT").ok().as_deref(),
        std::io::stdout().is_terminal(),
    )
    .to_string();

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
        report,
    })
}

/// Canonical output mode name for a configured value. `human` and `table` are older spellings.
fn output_mode_name(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

/// `--json`, then `FORMAT`, then the user config, then the terminal default.
/// Unrecognized values fall through to the next source.
fn resolve_output(
    cli_json: bool,
    user_output: Option<&str>,
    env_format: Option<&str>,
    is_tty: bool,
) -> &'static str {
    if cli_json {
        return "json";
    }
    [env_format, user_output]
        .into_iter()
        .flatten()
        .find_map(output_mode_name)
        .unwrap_or(if is_tty { "pretty" } else { "text" })
}

const fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

const fn default_high_priority_threshold() -> f64 {
    3.0
}
