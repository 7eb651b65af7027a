//! Loader for the User-Agent list that seeds the identity pool.

use std::path::Path;
use tracing::{info, warn};

/// Read one identity per line. Blank lines are skipped.
///
/// An unreadable file is logged and yields an empty list; the caller decides
/// whether that is fatal (building an `IdentityPool` from it is).
pub fn load_user_agents(path: &Path) -> Vec<String> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!("Failed to load user agents from {:?}: {}", path, e);
            return vec![];
        }
    };

    let agents: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    info!("{} user agents loaded from {:?}", agents.len(), path);
    agents
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_non_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Mozilla/5.0 (X11; Linux x86_64)").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  curl/8.4.0  ").unwrap();

        let agents = load_user_agents(file.path());
        assert_eq!(agents, ["Mozilla/5.0 (X11; Linux x86_64)", "curl/8.4.0"]);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_user_agents(&dir.path().join("nope.txt")).is_empty());
    }
}
