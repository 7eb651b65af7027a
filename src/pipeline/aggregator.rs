use crate::error::PageError;
use crate::models::{PageOutput, Tables};

/// Per-run counters, reported once the aggregate is complete.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub pages: usize,
    pub fetch_failures: usize,
    pub parse_failures: usize,
    pub match_failures: usize,
    pub map_failures: usize,
    pub player_failures: usize,
}

/// Single-writer accumulator; fed only after every fetch has completed.
#[derive(Debug, Default)]
pub struct Aggregator {
    tables: Tables,
    stats: RunStats,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take whatever this page managed to produce.
    pub fn add(&mut self, page: PageOutput) {
        self.stats.pages += 1;

        match page {
            PageOutput::Failed { error, .. } => match error {
                PageError::Fetch(_) => self.stats.fetch_failures += 1,
                PageError::Parse(_) => self.stats.parse_failures += 1,
            },
            PageOutput::Extracted {
                matches,
                maps,
                players,
                ..
            } => {
                match matches {
                    Ok(m) => self.tables.matches.push(m),
                    Err(_) => self.stats.match_failures += 1,
                }
                match maps {
                    Ok(m) => self.tables.maps.extend(m),
                    Err(_) => self.stats.map_failures += 1,
                }
                match players {
                    Ok(p) => self.tables.players.extend(p),
                    Err(_) => self.stats.player_failures += 1,
                }
            }
        }
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn finish(self) -> (Tables, RunStats) {
        (self.tables, self.stats)
    }
}

impl Extend<PageOutput> for Aggregator {
    fn extend<I: IntoIterator<Item = PageOutput>>(&mut self, iter: I) {
        for page in iter {
            self.add(page);
        }
    }
}
