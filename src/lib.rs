//! Scrapes dust2.us match pages into match, map and player-stat tables.

pub mod config;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod scraper;
pub mod storage;
pub mod utils;

pub use crate::config::AppConfig;
pub use crate::models::{MapRecord, MatchRecord, PlayerRecord, Tables};
pub use crate::pipeline::{Pipeline, RunStats};
pub use crate::storage::CsvSink;
