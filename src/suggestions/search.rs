use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::suggestions::{Platform, placeholder_thumbnail};
use crate::utils;

const YOUTUBE_RESULTS: usize = 5;
const SPOTIFY_RESULTS: usize = 3;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid thumbnail url: {0}")]
    Thumbnail(#[from] url::ParseError),
}

/// A ranked candidate returned by a [`SearchProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail: Url,
    pub source: Platform,
}

/// Turns a free-text query into song candidates, best match first.
pub trait SearchProvider {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;
}

/// Offline provider that makes up YouTube and Spotify looking results.
#[derive(Debug, Clone, Copy, Default)]
pub struct FabricatedSearch;

impl SearchProvider for FabricatedSearch {
    fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let stamp = utils::now_millis();
        let mut hits = Vec::with_capacity(YOUTUBE_RESULTS + SPOTIFY_RESULTS);

        for i in 1..=YOUTUBE_RESULTS {
            let title = if i == 1 {
                format!("{} - Official Video", query)
            } else {
                format!("{} - Cover {}", query, i)
            };
            hits.push(SearchHit {
                id: format!("yt-{}-{}", i, stamp),
                title,
                artist: format!("Artist {}", letter(i)),
                thumbnail: placeholder_thumbnail(&format!("{}{}", query, i))?,
                source: Platform::Youtube,
            });
        }

        for i in 1..=SPOTIFY_RESULTS {
            let title = if i == 1 {
                format!("{} Radio", query)
            } else {
                format!("{} Mix {}", query, i)
            };
            hits.push(SearchHit {
                id: format!("sp-{}-{}", i, stamp),
                title,
                artist: format!("DJ {}", letter(i)),
                thumbnail: placeholder_thumbnail(&format!("spot{}{}", query, i))?,
                source: Platform::Spotify,
            });
        }

        Ok(hits)
    }
}

// 1 -> 'A'
fn letter(i: usize) -> char {
    char::from(b'A' + (i as u8 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_has_no_hits() {
        assert!(FabricatedSearch.search("  ").unwrap().is_empty());
    }

    #[test]
    fn test_fabricated_hits_layout() {
        let hits = FabricatedSearch.search("Bohemian Rhapsody").unwrap();
        assert_eq!(hits.len(), 8);

        let youtube: Vec<_> = hits.iter().filter(|h| h.source == Platform::Youtube).collect();
        let spotify: Vec<_> = hits.iter().filter(|h| h.source == Platform::Spotify).collect();
        assert_eq!(youtube.len(), 5);
        assert_eq!(spotify.len(), 3);

        assert_eq!(hits[0].title, "Bohemian Rhapsody - Official Video");
        assert_eq!(hits[0].artist, "Artist A");
        assert_eq!(hits[4].title, "Bohemian Rhapsody - Cover 5");
        assert_eq!(hits[4].artist, "Artist E");
        assert_eq!(hits[5].title, "Bohemian Rhapsody Radio");
        assert_eq!(hits[7].title, "Bohemian Rhapsody Mix 3");
        assert_eq!(hits[7].artist, "DJ C");
        assert!(hits[5].id.starts_with("sp-1-"));
        assert_eq!(
            hits[5].thumbnail.as_str(),
            "https://picsum.photos/seed/spotBohemianRhapsody1/200/200"
        );
    }
}
