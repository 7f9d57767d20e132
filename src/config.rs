// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config/feed.toml";

fn default_limit() -> usize {
    10
}
fn default_max_description() -> usize {
    200
}
fn default_articles_max_age() -> u64 {
    3_600
}
fn default_profile_max_age() -> u64 {
    86_400
}
fn default_swr() -> u64 {
    86_400
}
fn default_base_url() -> String {
    "https://medium.com".to_string()
}

/// Single configuration surface for the feed pipeline: default item limit,
/// description bound, response cache windows, and the upstream base URL.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Items returned when the caller supplies no (or a malformed) limit.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Description truncation bound, in characters (ellipsis excluded).
    #[serde(default = "default_max_description")]
    pub max_description_len: usize,
    /// Freshness window for article list responses. Article lists churn with
    /// every publish, so this stays short.
    #[serde(default = "default_articles_max_age")]
    pub articles_max_age_secs: u64,
    /// Freshness window for profile responses; profile metadata barely moves.
    #[serde(default = "default_profile_max_age")]
    pub profile_max_age_secs: u64,
    /// Background-refresh window appended to both cache directives.
    #[serde(default = "default_swr")]
    pub stale_while_revalidate_secs: u64,
    /// Upstream origin; tests point this at a local mock server.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_description_len: default_max_description(),
            articles_max_age_secs: default_articles_max_age(),
            profile_max_age_secs: default_profile_max_age(),
            stale_while_revalidate_secs: default_swr(),
            base_url: default_base_url(),
        }
    }
}

impl FeedConfig {
    /// Load from an explicit TOML file, then apply env overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading feed config from {}", path.display()))?;
        let cfg: FeedConfig = toml::from_str(&content)
            .with_context(|| format!("parsing feed config from {}", path.display()))?;
        Ok(cfg.apply_env())
    }

    /// Resolution order:
    /// 1) $FEED_CONFIG_PATH (must exist when set)
    /// 2) config/feed.toml
    /// 3) built-in defaults
    /// Individual env overrides win over file values either way.
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            }
            return Err(anyhow!("FEED_CONFIG_PATH points to non-existent path"));
        }
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if default_path.exists() {
            return Self::load_from(default_path);
        }
        Ok(Self::default().apply_env())
    }

    fn apply_env(mut self) -> Self {
        if let Some(v) = env_parse::<usize>("FEED_DEFAULT_LIMIT") {
            self.default_limit = v;
        }
        if let Some(v) = env_parse::<usize>("FEED_MAX_DESCRIPTION") {
            self.max_description_len = v;
        }
        if let Some(v) = env_parse::<u64>("FEED_ARTICLES_MAX_AGE") {
            self.articles_max_age_secs = v;
        }
        if let Some(v) = env_parse::<u64>("FEED_PROFILE_MAX_AGE") {
            self.profile_max_age_secs = v;
        }
        if let Some(v) = env_parse::<u64>("FEED_SWR") {
            self.stale_while_revalidate_secs = v;
        }
        if let Ok(v) = env::var("FEED_BASE_URL") {
            let v = v.trim();
            if !v.is_empty() {
                self.base_url = v.trim_end_matches('/').to_string();
            }
        }
        self
    }
}

// Malformed env values are ignored rather than fatal; the file/default value
// stays in effect.
fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
