pub mod cleaner;
pub mod fetcher;
pub mod http_client;
pub mod identity;
pub mod parsers;

pub use self::fetcher::ConcurrentFetcher;
pub use self::http_client::{HttpClient, PageSource};
pub use self::identity::IdentityPool;

use crate::models::PageOutput;
use scraper::Html;
use tracing::warn;

use self::parsers::{extract_maps, extract_match, extract_players, parse_document};

/// Run all three extractors over one parsed page. None of them depends on
/// another succeeding.
pub fn extract_page(doc: &Html, id: u64, url: String) -> PageOutput {
    let matches = extract_match(doc, id);
    let maps = extract_maps(doc, id);
    let players = extract_players(doc, id);

    if let Err(e) = &matches {
        warn!("{}: match header: {}", url, e);
    }
    if let Err(e) = &maps {
        warn!("{}: maps: {}", url, e);
    }
    if let Err(e) = &players {
        warn!("{}: player stats: {}", url, e);
    }

    PageOutput::Extracted {
        id,
        url,
        matches,
        maps,
        players,
    }
}

/// Parse a raw body and extract from it; a parse failure fails the whole page.
pub fn process_body(body: &[u8], id: u64, url: String) -> PageOutput {
    match parse_document(body) {
        Ok(doc) => extract_page(&doc, id, url),
        Err(e) => {
            warn!("{}: {}", url, e);
            PageOutput::Failed {
                id,
                url,
                error: e.into(),
            }
        }
    }
}
