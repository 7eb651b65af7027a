use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Scraper configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Trailing URL segment; the site ignores it, but it must be present.
    #[serde(default = "default_slug")]
    pub slug: String,

    #[serde(default = "default_user_agents_path")]
    pub user_agents_path: PathBuf,
}

/// Pipeline configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// First match ID (inclusive).
    #[serde(default = "default_from")]
    pub from: u64,

    /// Last match ID (exclusive).
    #[serde(default = "default_to")]
    pub to: u64,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_base_url() -> String {
    "http://www.dust2.us".to_string()
}
fn default_slug() -> String {
    "match".to_string()
}
fn default_user_agents_path() -> PathBuf {
    PathBuf::from("lists/ua_list.txt")
}
fn default_from() -> u64 {
    2_367_000
}
fn default_to() -> u64 {
    2_367_001
}
fn default_concurrency() -> usize {
    20
}
fn default_queue_capacity() -> usize {
    64
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            slug: default_slug(),
            user_agents_path: default_user_agents_path(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            from: default_from(),
            to: default_to(),
            concurrency: default_concurrency(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("DUST2").separator("__"))
            .build()
            .context("Failed to read configuration sources")?;

        let mut app_cfg: AppConfig = cfg
            .try_deserialize()
            .context("Invalid configuration")?;
        app_cfg.pipeline.clamp();
        Ok(app_cfg)
    }
}

impl PipelineConfig {
    /// A zero-width pool or queue would never make progress.
    pub fn clamp(&mut self) {
        self.concurrency = self.concurrency.max(1);
        self.queue_capacity = self.queue_capacity.max(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_run() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.pipeline.concurrency, 20);
        assert_eq!(cfg.pipeline.to - cfg.pipeline.from, 1);
        assert_eq!(cfg.scraper.base_url, "http://www.dust2.us");
    }

    #[test]
    fn partial_source_keeps_section_defaults() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[pipeline]\nconcurrency = 4\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.pipeline.concurrency, 4);
        assert_eq!(cfg.pipeline.queue_capacity, 64);
        assert_eq!(cfg.scraper.slug, "match");
        assert_eq!(cfg.storage.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn clamp_rejects_zero_width() {
        let mut p = PipelineConfig {
            concurrency: 0,
            queue_capacity: 0,
            ..PipelineConfig::default()
        };
        p.clamp();
        assert_eq!((p.concurrency, p.queue_capacity), (1, 1));
    }
}
