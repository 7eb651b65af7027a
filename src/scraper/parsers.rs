use crate::error::{ExtractionError, ParseError};
use crate::models::{MapRecord, MatchRecord, PlayerRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use super::cleaner::{
    collapse_best_of_one, map_id, normalize_date, parse_count, parse_net, parse_score,
};

const HEADER_TIME: &str = "div.match-page-header-time";
const HEADER_DAY: &str = "div.match-page-header-day";
const HEADER_TITLE: &str = "h1.matchpage-header-title";

const MAP_PICKED: &str = "div.standard-box.map-container.map-picked";
const MAP_LEFTOVER: &str = "div.standard-box.map-container.map-leftover";
const MAP_SCORE_LEFT: &str = "div.map-container-score-left";
const MAP_SCORE_RIGHT: &str = "div.map-container-score-right";
const MAP_NAME: &str = "div.map-container-map-name";

const RESULT_TAB: &str = "div.tabs-content.match-result-wrapper-tab.not-active";
const RESULT_TAB_INDEX: &str = "data-tab-content-id";

/// Player table columns: Player | K - D | +/- | ADR | KAST | Rating
const PLAYER_CELLS: usize = 6;

static TEAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+?)\s+vs.\s+(.+)").expect("static regex"));

// ── Document ──────────────────────────────────────────────────────────────────

/// Parse a fetched body once; the three extractors share the result.
pub fn parse_document(body: &[u8]) -> Result<Html, ParseError> {
    // Stray non-UTF-8 bytes (Latin-1 names) become U+FFFD instead of
    // failing the page.
    let text = String::from_utf8_lossy(body);

    if text.trim().is_empty() {
        return Err(ParseError::new("empty body"));
    }

    let doc = Html::parse_document(&text);

    // html5ever always synthesises <html><head><body>; a page with nothing
    // inside <body> is not a match page we can read.
    let body_sel = selector("body").map_err(|e| ParseError::new(e.to_string()))?;
    let has_content = doc
        .select(&body_sel)
        .next()
        .is_some_and(|b| b.children().any(|c| c.value().is_element()));
    if !has_content {
        return Err(ParseError::new("document has no body content"));
    }

    Ok(doc)
}

// ── Match ─────────────────────────────────────────────────────────────────────

pub fn extract_match(doc: &Html, match_id: u64) -> Result<MatchRecord, ExtractionError> {
    let result = required_text(doc.root_element(), HEADER_TIME)?;
    let day = required_text(doc.root_element(), HEADER_DAY)?;
    let title = required_text(doc.root_element(), HEADER_TITLE)?;

    let (left, right) = parse_score(&result)?;
    let (team1_score, team2_score) = collapse_best_of_one(left, right);
    let (team1, team2) = split_title(&title)?;

    Ok(MatchRecord {
        match_id,
        team1,
        team2,
        team1_score,
        team2_score,
        date: normalize_date(&day),
    })
}

/// "Team A vs. Team B tips & odds" → ("Team A", "Team B")
pub fn split_title(title: &str) -> Result<(String, String), ExtractionError> {
    let title = title.replace(" tips & odds", "");
    let caps = TEAMS
        .captures(&title)
        .ok_or_else(|| ExtractionError::TitleMismatch(title.clone()))?;

    let team1 = caps[1].trim().to_string();
    let team2 = caps[2].trim().to_string();

    if team1 == team2 {
        return Err(ExtractionError::SameTeam(team1));
    }
    Ok((team1, team2))
}

// ── Maps ──────────────────────────────────────────────────────────────────────

pub fn extract_maps(doc: &Html, match_id: u64) -> Result<Vec<MapRecord>, ExtractionError> {
    let picked_sel = selector(MAP_PICKED)?;
    let leftover_sel = selector(MAP_LEFTOVER)?;

    let mut played = Vec::new();
    for container in doc.select(&picked_sel) {
        played.push(read_map(container)?);
    }

    // An unplayed decider has an empty score box.
    if let Some(leftover) = doc.select(&leftover_sel).next() {
        let left = required_text(leftover, MAP_SCORE_LEFT)?;
        if left.is_empty() {
            debug!("match {}: leftover map not played", match_id);
        } else {
            played.push(read_map(leftover)?);
        }
    }

    played
        .into_iter()
        .enumerate()
        .map(|(i, (left, right, name))| {
            Ok(MapRecord {
                map_id: map_id(match_id, i + 1),
                team1_score: parse_count(&left)?,
                team2_score: parse_count(&right)?,
                map_name: name,
                match_id,
            })
        })
        .collect()
}

fn read_map(container: ElementRef<'_>) -> Result<(String, String, String), ExtractionError> {
    Ok((
        required_text(container, MAP_SCORE_LEFT)?,
        required_text(container, MAP_SCORE_RIGHT)?,
        required_text(container, MAP_NAME)?,
    ))
}

// ── Players ───────────────────────────────────────────────────────────────────

pub fn extract_players(doc: &Html, match_id: u64) -> Result<Vec<PlayerRecord>, ExtractionError> {
    let tab_sel = selector(RESULT_TAB)?;
    let tr_sel = selector("tr")?;
    let td_sel = selector("td")?;

    let mut players = Vec::new();

    for tab in doc.select(&tab_sel) {
        let index = tab
            .value()
            .attr(RESULT_TAB_INDEX)
            .ok_or(ExtractionError::MissingAttribute {
                selector: RESULT_TAB,
                attr: RESULT_TAB_INDEX,
            })?;
        let id = map_id(match_id, index.trim());

        for tr in tab.select(&tr_sel) {
            let cells: Vec<String> = tr.select(&td_sel).map(text_of).collect();

            // Header and spacer rows never have exactly six cells.
            let [player, kd, net, adr, kast, rating]: [String; PLAYER_CELLS] =
                match cells.try_into() {
                    Ok(row) => row,
                    Err(_) => continue,
                };

            let (kills, deaths) = parse_score(&kd)?;
            players.push(PlayerRecord {
                map_id: id.clone(),
                player,
                kills,
                deaths,
                kd_diff: parse_net(&net)?,
                adr,
                kast,
                rating,
            });
        }
    }

    Ok(players)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn selector(css: &'static str) -> Result<Selector, ExtractionError> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css,
        error: format!("{:?}", e),
    })
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Trimmed text of the first `css` match under `scope`.
fn required_text(scope: ElementRef<'_>, css: &'static str) -> Result<String, ExtractionError> {
    let sel = selector(css)?;
    scope
        .select(&sel)
        .next()
        .map(text_of)
        .ok_or(ExtractionError::MissingElement { selector: css })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
