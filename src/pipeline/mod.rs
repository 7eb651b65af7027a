//! Pipeline orchestrator: ties fetcher → extractors → aggregator together.
//!
//! 1. Map the ID range to page URLs
//! 2. Fetch every page through the bounded pool (outcomes come back in order)
//! 3. Parse and extract each page on this task, then fold into the tables
//!
//! Nothing below step 1 aborts the run: a failed page or extractor only
//! removes its own rows.

pub mod aggregator;

pub use self::aggregator::{Aggregator, RunStats};

use crate::config::AppConfig;
use crate::error::{PageError, SetupError};
use crate::loader::load_user_agents;
use crate::models::{FetchOutcome, PageOutput, PageTask, Tables};
use crate::scraper::{self, ConcurrentFetcher, HttpClient, IdentityPool, PageSource};
use crate::utils;
use anyhow::{Context, Result};
use std::ops::Range;
use std::sync::Arc;
use tracing::{info, info_span};
use url::Url;

pub struct Pipeline {
    config: AppConfig,
}

impl Pipeline {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// `<base>/matches/{id}/{slug}` for every ID in `range`.
    pub fn tasks(&self, range: Range<u64>) -> Result<Vec<PageTask>, SetupError> {
        let base = &self.config.scraper.base_url;
        Url::parse(base).map_err(|source| SetupError::BaseUrl {
            url: base.clone(),
            source,
        })?;

        let base = base.trim_end_matches('/');
        let slug = &self.config.scraper.slug;
        Ok(range
            .map(|id| PageTask {
                id,
                url: format!("{}/matches/{}/{}", base, id, slug),
            })
            .collect())
    }

    /// Load identities, then run against the live site.
    pub async fn run(&self, range: Range<u64>) -> Result<(Tables, RunStats)> {
        let agents = load_user_agents(&self.config.scraper.user_agents_path);
        let identities = IdentityPool::new(agents).with_context(|| {
            format!(
                "Cannot start without user agents ({:?})",
                self.config.scraper.user_agents_path
            )
        })?;

        let client = HttpClient::new()?;
        self.run_with(range, identities, Arc::new(client)).await
    }

    pub async fn run_with(
        &self,
        range: Range<u64>,
        identities: IdentityPool,
        source: Arc<dyn PageSource>,
    ) -> Result<(Tables, RunStats)> {
        let tasks = self.tasks(range).context("Cannot build page URLs")?;
        info!(
            "=== Fetching {} pages ({} workers, {} identities) ===",
            tasks.len(),
            self.config.pipeline.concurrency,
            identities.len()
        );

        let fetcher = ConcurrentFetcher::new(source, identities)
            .concurrency(self.config.pipeline.concurrency)
            .queue_capacity(self.config.pipeline.queue_capacity);

        let outcomes = {
            let _t = utils::Timer::start("Page fetch");
            fetcher.fetch_all(tasks).await
        };

        // Join point: everything below is single-threaded.
        let mut aggregator = Aggregator::new();
        aggregator.extend(outcomes.into_iter().map(process_outcome));
        let (tables, stats) = aggregator.finish();

        info!(
            "=== Done: {} pages | {} matches | {} maps | {} player rows | {} fetch / {} parse failures ===",
            utils::fmt_count(stats.pages),
            utils::fmt_count(tables.matches.len()),
            utils::fmt_count(tables.maps.len()),
            utils::fmt_count(tables.players.len()),
            stats.fetch_failures,
            stats.parse_failures,
        );

        Ok((tables, stats))
    }
}

/// Turn one fetch outcome into a tagged page result.
pub fn process_outcome(outcome: FetchOutcome) -> PageOutput {
    let FetchOutcome { id, url, body } = outcome;
    let _span = info_span!("page", match_id = id).entered();

    match body {
        Ok(bytes) => scraper::process_body(&bytes, id, url),
        Err(e) => PageOutput::Failed {
            id,
            url,
            error: PageError::Fetch(e),
        },
    }
}
