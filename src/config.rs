// src/config.rs
//! Startup configuration: one TOML file per group under `{dir}/groups`, plus
//! a shared substitution rule list in `{dir}/rules.toml`. Everything is
//! immutable once loaded; each runner gets its own copy.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::warn;

const ENV_CONFIG_DIR: &str = "CURATOR_CONFIG_DIR";
const ENV_DATA_DIR: &str = "CURATOR_DATA_DIR";

pub fn config_dir() -> PathBuf {
    std::env::var(ENV_CONFIG_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config"))
}

pub fn data_dir() -> PathBuf {
    std::env::var(ENV_DATA_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}

fn default_phase() -> u32 {
    6
}

fn default_interval() -> u32 {
    60
}

fn default_language() -> String {
    "en".to_string()
}

/// Per-group settings. Secret-bearing fields may hold the literal `"ENV"`,
/// resolved from `{GROUP}_{FIELD}` environment variables at load time so the
/// files themselves can be committed.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupConfig {
    /// Platform topic id; doubles as the store file key.
    pub group: String,
    /// Search terms; one is drawn at random per ingest.
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Domains excluded from search results.
    #[serde(default)]
    pub exclude_domains: Vec<String>,
    /// Case-sensitive substrings that veto a composed post.
    #[serde(default)]
    pub blocked_words: Vec<String>,
    pub search_api_key: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub refresh_token: String,
    /// Cycles between ingest fetches.
    #[serde(default = "default_phase")]
    pub phase: u32,
    /// Upper bound in minutes for the randomized post-publish sleep.
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
    /// Search language code.
    #[serde(default = "default_language")]
    pub language: String,
}

impl GroupConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading group config {}", path.display()))?;
        let mut cfg: GroupConfig = toml::from_str(&raw)
            .with_context(|| format!("parsing group config {}", path.display()))?;
        if cfg.group.trim().is_empty() {
            bail!("group config {} has an empty group id", path.display());
        }
        cfg.resolve_env_secrets()?;
        cfg.sanitize();
        Ok(cfg)
    }

    /// Replace `"ENV"` markers with values from `{GROUP}_{FIELD}` variables.
    /// A marker without a matching variable is a startup error.
    fn resolve_env_secrets(&mut self) -> Result<()> {
        let prefix = env_prefix(&self.group);
        for (field, slot) in [
            ("SEARCH_API_KEY", &mut self.search_api_key),
            ("CONSUMER_KEY", &mut self.consumer_key),
            ("CONSUMER_SECRET", &mut self.consumer_secret),
            ("REFRESH_TOKEN", &mut self.refresh_token),
        ] {
            if slot.trim().eq_ignore_ascii_case("env") {
                let var = format!("{prefix}_{field}");
                *slot = std::env::var(&var).with_context(|| format!("missing {var}"))?;
            }
        }
        Ok(())
    }

    /// Parameter hygiene. A zero phase would refetch every cycle off an
    /// underflowing countdown, and a zero interval would panic the sleep
    /// draw, so both clamp to 1. Blank keywords are dropped.
    fn sanitize(&mut self) {
        if self.phase == 0 {
            self.phase = 1;
        }
        if self.interval_minutes == 0 {
            self.interval_minutes = 1;
        }
        self.keywords.retain(|k| !k.trim().is_empty());
    }
}

/// Env-var prefix for a group id: uppercased, non-alphanumerics as `_`.
fn env_prefix(group: &str) -> String {
    group
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Load every `*.toml` under `{dir}/groups`, sorted by file name so startup
/// order is stable. No groups at all is a startup error.
pub fn load_groups(config_dir: &Path) -> Result<Vec<GroupConfig>> {
    let groups_dir = config_dir.join("groups");
    let entries = fs::read_dir(&groups_dir)
        .with_context(|| format!("reading group config dir {}", groups_dir.display()))?;
    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("toml"))
        .collect();
    paths.sort();

    let mut configs = Vec::with_capacity(paths.len());
    for path in &paths {
        configs.push(GroupConfig::load_from_file(path)?);
    }
    if configs.is_empty() {
        bail!("no group configs found in {}", groups_dir.display());
    }
    Ok(configs)
}

/// One ordered substitution: every occurrence of `target` becomes
/// `replacement`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRule {
    pub target: String,
    pub replacement: String,
}

/// Load `rules.toml`, shaped as `replace = [["target", "replacement"], ..]`.
/// A missing file is an empty rule set; a present but malformed file is an
/// error.
pub fn load_rules(path: &Path) -> Result<Vec<TranslationRule>> {
    #[derive(Deserialize)]
    struct RulesFile {
        #[serde(default)]
        replace: Vec<(String, String)>,
    }

    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "no rules file, substitutions disabled");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e).with_context(|| format!("reading rules {}", path.display())),
    };
    let parsed: RulesFile =
        toml::from_str(&raw).with_context(|| format!("parsing rules {}", path.display()))?;
    Ok(parsed
        .replace
        .into_iter()
        .map(|(target, replacement)| TranslationRule {
            target,
            replacement,
        })
        .collect())
}
