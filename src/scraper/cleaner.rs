use crate::error::ConversionError;
use regex::Regex;
use std::sync::LazyLock;

// ── Dates ─────────────────────────────────────────────────────────────────────

// "May" is never abbreviated, so it gets its own pattern.
static MAY_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"May \d{1,2}, \d{4}").expect("static regex"));

static ABBREV_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:Jan|Feb|Mar|Apr|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \d{1,2}, \d{4}")
        .expect("static regex")
});

/// Pull "Mon d, yyyy" out of the header date text.
/// "Oct 29, 2023 - 14:00" → "Oct 29, 2023". Unknown shapes come back trimmed.
pub fn normalize_date(s: &str) -> String {
    let pattern = if s.starts_with("May") {
        &*MAY_DATE
    } else {
        &*ABBREV_DATE
    };

    match pattern.find(s) {
        Some(m) => m.as_str().to_string(),
        None => s.trim().to_string(),
    }
}

// ── Scores ────────────────────────────────────────────────────────────────────

/// Parse "X - Y" into (X, Y).
pub fn parse_score(s: &str) -> Result<(u32, u32), ConversionError> {
    let (left, right) = s
        .split_once(" - ")
        .ok_or_else(|| ConversionError::new(s, "missing \" - \" separator"))?;

    let left = left
        .trim()
        .parse()
        .map_err(|e| ConversionError::new(s, e))?;
    let right = right
        .trim()
        .parse()
        .map_err(|e| ConversionError::new(s, e))?;

    Ok((left, right))
}

/// Parse a single non-negative score cell ("13").
pub fn parse_count(s: &str) -> Result<u32, ConversionError> {
    s.trim().parse().map_err(|e| ConversionError::new(s, e))
}

/// Parse the net kill-death cell: "+12" → 12, "-3" → -3, "0" → 0.
pub fn parse_net(s: &str) -> Result<i32, ConversionError> {
    let t = s.trim();
    let t = t.strip_prefix('+').unwrap_or(t);
    t.parse().map_err(|e| ConversionError::new(s, e))
}

/// Bo1 results are reported as round counts; fold them to a 1-0 map score.
/// A side collapses only when it is above 5 and strictly ahead.
pub fn collapse_best_of_one(left: u32, right: u32) -> (u32, u32) {
    if left > 5 && left > right {
        (1, 0)
    } else if right > 5 && right > left {
        (0, 1)
    } else {
        (left, right)
    }
}

// ── IDs ───────────────────────────────────────────────────────────────────────

/// "2367000" + "3" → "23670003"
pub fn map_id(match_id: u64, index: impl std::fmt::Display) -> String {
    format!("{match_id}{index}")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_date_abbreviated() {
        assert_eq!(normalize_date("Oct 29, 2023"), "Oct 29, 2023");
        assert_eq!(normalize_date("Sunday Jan 7, 2024 at 18:00"), "Jan 7, 2024");
        assert_eq!(normalize_date("Dec 31, 1999"), "Dec 31, 1999");
    }

    #[test]
    fn test_normalize_date_may() {
        assert_eq!(normalize_date("May 5, 2024"), "May 5, 2024");
        assert_eq!(normalize_date("May 21, 2022 - 20:30 CEST"), "May 21, 2022");
    }

    #[test]
    fn test_normalize_date_fallback() {
        assert_eq!(normalize_date("  tomorrow  "), "tomorrow");
        // "Sept" is not one of the abbreviations
        assert_eq!(normalize_date("Sept 3, 2021 "), "Sept 3, 2021");
        // Leading space skips the May pattern; no other pattern matches, so
        // the trimmed text comes back.
        assert_eq!(normalize_date(" May 5, 2024"), "May 5, 2024");
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("13 - 7"), Ok((13, 7)));
        assert_eq!(parse_score(" 0 - 2 "), Ok((0, 2)));
        assert!(parse_score("13-7").is_err());
        assert!(parse_score("x - 7").is_err());
        assert!(parse_score("-1 - 7").is_err());
    }

    #[test]
    fn test_parse_net() {
        assert_eq!(parse_net("+12"), Ok(12));
        assert_eq!(parse_net("-3"), Ok(-3));
        assert_eq!(parse_net("0"), Ok(0));
        assert!(parse_net("+").is_err());
    }

    #[test]
    fn test_collapse_best_of_one() {
        assert_eq!(collapse_best_of_one(9, 3), (1, 0));
        assert_eq!(collapse_best_of_one(2, 1), (2, 1));
        assert_eq!(collapse_best_of_one(16, 14), (1, 0));
        assert_eq!(collapse_best_of_one(14, 16), (0, 1));
        assert_eq!(collapse_best_of_one(5, 6), (0, 1));
        assert_eq!(collapse_best_of_one(5, 5), (5, 5));
        assert_eq!(collapse_best_of_one(6, 6), (6, 6));
    }

    #[test]
    fn test_map_id() {
        assert_eq!(map_id(2367000, 1), "23670001");
        assert_eq!(map_id(42, "3"), "423");
    }
}
