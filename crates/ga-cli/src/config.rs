use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use ga_runner::agent::ollama::{Backend, OllamaConfig};
use ga_runner::DEFAULT_MAX_WORKERS;

pub const DEFAULT_MODEL: &str = "qwen3:8b";

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub ollama: OllamaSection,
    #[serde(default)]
    pub review: ReviewSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OllamaSection {
    pub host: Option<String>,
    pub backend: Option<Backend>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub num_ctx: Option<u32>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewSection {
    pub models: Option<Vec<String>>,
    pub max_lines: Option<usize>,
    pub staged_only: Option<bool>,
    pub max_workers: Option<usize>,
}

/// Values taken from the command line (or their env fallbacks).
#[derive(Debug, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub backend: Option<Backend>,
    pub models: Option<String>,
    pub max_lines: Option<usize>,
    pub unstaged: bool,
}

/// Fully resolved settings for one invocation.
#[derive(Debug)]
pub struct Settings {
    pub models: Vec<String>,
    pub ollama: OllamaConfig,
    pub staged_only: bool,
    pub max_lines: Option<usize>,
    pub max_workers: usize,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir()
            .context("could not determine config directory")?
            .join("git-agent");
        Ok(dir.join("config.toml"))
    }

    /// Load `explicit` if given (it must exist), otherwise the default
    /// location if present.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} does not exist", path.display());
                }
                path.to_path_buf()
            }
            None => match Self::path() {
                Ok(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Merge: command line / env over file over built-in defaults.
    pub fn resolve(self, overrides: Overrides) -> Settings {
        let defaults = OllamaConfig::default();

        let models = overrides
            .models
            .as_deref()
            .map(parse_models)
            .filter(|m| !m.is_empty())
            .or_else(|| {
                self.review
                    .models
                    .map(|list| list.iter().flat_map(|m| parse_models(m)).collect::<Vec<_>>())
                    .filter(|m| !m.is_empty())
            })
            .unwrap_or_else(|| vec![DEFAULT_MODEL.to_string()]);

        let host = overrides
            .host
            .or(self.ollama.host)
            .map(|h| normalize_host(&h))
            .unwrap_or(defaults.host);

        let ollama = OllamaConfig {
            host,
            backend: overrides
                .backend
                .or(self.ollama.backend)
                .unwrap_or(defaults.backend),
            temperature: self.ollama.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.ollama.max_tokens.unwrap_or(defaults.max_tokens),
            num_ctx: self.ollama.num_ctx.unwrap_or(defaults.num_ctx),
            request_timeout: self
                .ollama
                .request_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        };

        Settings {
            models,
            ollama,
            staged_only: !overrides.unstaged && self.review.staged_only.unwrap_or(true),
            max_lines: overrides.max_lines.or(self.review.max_lines),
            max_workers: self.review.max_workers.unwrap_or(DEFAULT_MAX_WORKERS),
        }
    }
}

/// Split a comma-separated model list, trimming and dropping empties.
pub fn parse_models(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

// OLLAMA_HOST is commonly set without a scheme ("127.0.0.1:11434").
fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{host}")
    }
}
