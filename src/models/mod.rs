use serde::Serialize;

use crate::error::{ExtractionError, FetchError, PageError};

// ── Fetch side ────────────────────────────────────────────────────────────────

/// One requested match page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTask {
    pub id: u64,
    pub url: String,
}

/// Result of fetching one `PageTask`. Exactly one per task.
#[derive(Debug)]
pub struct FetchOutcome {
    pub id: u64,
    pub url: String,
    pub body: Result<Vec<u8>, FetchError>,
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        self.body.is_ok()
    }
}

// ── Records ───────────────────────────────────────────────────────────────────
//
// Field order is the CSV column order.

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MatchRecord {
    #[serde(rename = "MatchID")]
    pub match_id: u64,
    #[serde(rename = "Team1")]
    pub team1: String,
    #[serde(rename = "Team2")]
    pub team2: String,
    #[serde(rename = "T1Score")]
    pub team1_score: u32,
    #[serde(rename = "T2Score")]
    pub team2_score: u32,
    #[serde(rename = "Date")]
    pub date: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MapRecord {
    #[serde(rename = "MapID")]
    pub map_id: String,
    #[serde(rename = "T1Score")]
    pub team1_score: u32,
    #[serde(rename = "T2Score")]
    pub team2_score: u32,
    #[serde(rename = "MapName")]
    pub map_name: String,
    #[serde(rename = "MatchID")]
    pub match_id: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlayerRecord {
    #[serde(rename = "MapID")]
    pub map_id: String,
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Kills")]
    pub kills: u32,
    #[serde(rename = "Deaths")]
    pub deaths: u32,
    /// Net kill-death difference ("+12" → 12).
    #[serde(rename = "K-D")]
    pub kd_diff: i32,
    #[serde(rename = "ADR")]
    pub adr: String,
    #[serde(rename = "KAST")]
    pub kast: String,
    #[serde(rename = "Rating")]
    pub rating: String,
}

// ── Per-page output ───────────────────────────────────────────────────────────

/// What one page contributed. Each extractor result is independent.
#[derive(Debug)]
pub enum PageOutput {
    Failed {
        id: u64,
        url: String,
        error: PageError,
    },
    Extracted {
        id: u64,
        url: String,
        matches: Result<MatchRecord, ExtractionError>,
        maps: Result<Vec<MapRecord>, ExtractionError>,
        players: Result<Vec<PlayerRecord>, ExtractionError>,
    },
}

/// The three flat output tables.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tables {
    pub matches: Vec<MatchRecord>,
    pub maps: Vec<MapRecord>,
    pub players: Vec<PlayerRecord>,
}

impl Tables {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty() && self.maps.is_empty() && self.players.is_empty()
    }
}
