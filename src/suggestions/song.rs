use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

const THUMBNAIL_SIZE: u32 = 200;

/// Where a suggested song can be listened to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Spotify,
    Soundcloud,
    Bandcamp,
    /// Free-form platform name typed by the user.
    Other(String),
}

impl Platform {
    /// Maps the platform field of the submission form, anything unknown
    /// is kept verbatim as a custom platform.
    pub fn from_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let platform = match trimmed.to_ascii_lowercase().as_str() {
            "youtube" => Platform::Youtube,
            "spotify" => Platform::Spotify,
            "soundcloud" => Platform::Soundcloud,
            "bandcamp" => Platform::Bandcamp,
            _ => Platform::Other(trimmed.to_string()),
        };
        Some(platform)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Youtube => f.write_str("YouTube"),
            Platform::Spotify => f.write_str("Spotify"),
            Platform::Soundcloud => f.write_str("SoundCloud"),
            Platform::Bandcamp => f.write_str("Bandcamp"),
            Platform::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Accept,
    Reject,
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accept" => Ok(VoteDirection::Accept),
            "reject" => Ok(VoteDirection::Reject),
            other => Err(format!("unknown vote direction: {}", other)),
        }
    }
}

/// Accept/reject ballots of a single song.
///
/// A user id is never present in both sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    accepted: BTreeSet<String>,
    rejected: BTreeSet<String>,
}

impl Votes {
    pub fn accepted(&self) -> &BTreeSet<String> {
        &self.accepted
    }

    pub fn rejected(&self) -> &BTreeSet<String> {
        &self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.rejected.is_empty()
    }

    /// Current ballot of `user_id`, if any.
    pub fn ballot(&self, user_id: &str) -> Option<VoteDirection> {
        if self.accepted.contains(user_id) {
            Some(VoteDirection::Accept)
        } else if self.rejected.contains(user_id) {
            Some(VoteDirection::Reject)
        } else {
            None
        }
    }

    /// Casts `direction` for `user_id`, or retracts it when already cast.
    /// Any ballot in the opposite direction is dropped first.
    pub fn toggle(&mut self, direction: VoteDirection, user_id: &str) {
        let (requested, opposite) = match direction {
            VoteDirection::Accept => (&mut self.accepted, &mut self.rejected),
            VoteDirection::Reject => (&mut self.rejected, &mut self.accepted),
        };
        opposite.remove(user_id);
        if !requested.remove(user_id) {
            requested.insert(user_id.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub timestamp_millis: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub thumbnail: Url,
    pub creator: String,
    pub source: Platform,
    pub votes: Votes,
    pub comments: Vec<Comment>,
}

/// Picsum placeholder image for a song without artwork.
pub fn placeholder_thumbnail(seed: &str) -> Result<Url, url::ParseError> {
    let seed: String = seed.split_whitespace().collect();
    Url::parse(&format!(
        "https://picsum.photos/seed/{}/{}/{}",
        urlencoding::encode(&seed),
        THUMBNAIL_SIZE,
        THUMBNAIL_SIZE
    ))
}
