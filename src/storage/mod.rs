use crate::models::Tables;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const MATCHES_FILE: &str = "matches.csv";
pub const MAPS_FILE: &str = "maps.csv";
pub const PLAYERS_FILE: &str = "player_stats.csv";

/// Spreadsheet tools sniff this to pick UTF-8.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Writes the three output tables as CSV files under one directory.
pub struct CsvSink {
    dir: PathBuf,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write every non-empty table; returns the paths written.
    pub fn write_tables(&self, tables: &Tables) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Could not create dir {:?}", self.dir))?;

        let mut written = Vec::new();
        if let Some(p) = self.write_table(MAPS_FILE, &tables.maps)? {
            written.push(p);
        }
        if let Some(p) = self.write_table(PLAYERS_FILE, &tables.players)? {
            written.push(p);
        }
        if let Some(p) = self.write_table(MATCHES_FILE, &tables.matches)? {
            written.push(p);
        }
        Ok(written)
    }

    fn write_table<T: Serialize>(&self, name: &str, rows: &[T]) -> Result<Option<PathBuf>> {
        if rows.is_empty() {
            debug!("{}: no rows, not written", name);
            return Ok(None);
        }

        let path = self.dir.join(name);
        write_csv(&path, rows).with_context(|| format!("Error while saving {:?}", path))?;
        info!("File {:?} was saved successfully ({} rows)", path, rows.len());
        Ok(Some(path))
    }
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut file = File::create(path)?;
    file.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MapRecord, MatchRecord, PlayerRecord};

    fn read(path: &Path) -> String {
        let raw = std::fs::read(path).unwrap();
        assert!(raw.starts_with(UTF8_BOM));
        String::from_utf8(raw[UTF8_BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn writes_fixed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let tables = Tables {
            matches: vec![MatchRecord {
                match_id: 7,
                team1: "Team A".into(),
                team2: "Team, B".into(),
                team1_score: 1,
                team2_score: 0,
                date: "Oct 29, 2023".into(),
            }],
            maps: vec![MapRecord {
                map_id: "71".into(),
                team1_score: 16,
                team2_score: 9,
                map_name: "Anubis".into(),
                match_id: 7,
            }],
            players: vec![PlayerRecord {
                map_id: "71".into(),
                player: "zeus".into(),
                kills: 20,
                deaths: 23,
                kd_diff: -3,
                adr: "71.2".into(),
                kast: "66%".into(),
                rating: "0.97".into(),
            }],
        };

        let written = CsvSink::new(dir.path()).write_tables(&tables).unwrap();
        assert_eq!(written.len(), 3);

        let matches = read(&dir.path().join(MATCHES_FILE));
        assert_eq!(
            matches,
            "MatchID,Team1,Team2,T1Score,T2Score,Date\n7,Team A,\"Team, B\",1,0,\"Oct 29, 2023\"\n"
        );

        let maps = read(&dir.path().join(MAPS_FILE));
        assert_eq!(maps, "MapID,T1Score,T2Score,MapName,MatchID\n71,16,9,Anubis,7\n");

        let players = read(&dir.path().join(PLAYERS_FILE));
        assert_eq!(
            players,
            "MapID,Player,Kills,Deaths,K-D,ADR,KAST,Rating\n71,zeus,20,23,-3,71.2,66%,0.97\n"
        );
    }

    #[test]
    fn empty_tables_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("data");
        let tables = Tables {
            maps: vec![MapRecord {
                map_id: "11".into(),
                team1_score: 13,
                team2_score: 2,
                map_name: "Vertigo".into(),
                match_id: 1,
            }],
            ..Tables::default()
        };

        let written = CsvSink::new(&out).write_tables(&tables).unwrap();
        assert_eq!(written, vec![out.join(MAPS_FILE)]);
        assert!(!out.join(MATCHES_FILE).exists());
        assert!(!out.join(PLAYERS_FILE).exists());
    }
}
