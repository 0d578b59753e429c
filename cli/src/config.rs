use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Deserialize;

pub(crate) const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;
pub(crate) const DEFAULT_TRACE_FILTER: &str = "cursorctx_core=warn,cursorctx_cli=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Effective settings after merging flags, the config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) max_input_bytes: usize,
    pub(crate) format: OutputFormat,
    pub(crate) log_filter: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            format: OutputFormat::Text,
            log_filter: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    analysis: AnalysisConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct AnalysisConfig {
    #[serde(default)]
    max_input_bytes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct OutputConfig {
    #[serde(default)]
    format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Deserialize, Default)]
struct LogConfig {
    #[serde(default)]
    filter: Option<String>,
}

impl ConfigFile {
    pub(crate) fn parse(raw: &str) -> anyhow::Result<Self> {
        toml::from_str(raw).context("Invalid config file")
    }

    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Failed to load '{}'", path.display()))
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub(crate) struct Overrides {
    pub(crate) max_input_bytes: Option<usize>,
    pub(crate) format: Option<OutputFormat>,
    pub(crate) log_filter: Option<String>,
}

impl Settings {
    pub(crate) fn resolve(overrides: Overrides, file: ConfigFile) -> anyhow::Result<Self> {
        let defaults = Settings::default();
        let max_input_bytes = match overrides.max_input_bytes.or(file.analysis.max_input_bytes) {
            Some(0) => return Err(anyhow::anyhow!("max_input_bytes must be greater than 0")),
            Some(limit) => limit,
            None => defaults.max_input_bytes,
        };
        Ok(Self {
            max_input_bytes,
            format: overrides.format.or(file.output.format).unwrap_or(defaults.format),
            log_filter: overrides.log_filter.or(file.log.filter),
        })
    }
}
