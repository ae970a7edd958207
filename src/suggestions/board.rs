use thiserror::Error;

use crate::locale::{Language, Preferences, Text};
use crate::suggestions::{
    Comment, Platform, SearchHit, Song, VoteDirection, Votes, placeholder_thumbnail,
};
use crate::utils;

#[derive(Debug, Error, PartialEq)]
pub enum SuggestionError {
    #[error("song title must not be blank")]
    BlankTitle,

    #[error("no song with id {0}")]
    UnknownSong(String),

    #[error("invalid thumbnail url: {0}")]
    Thumbnail(#[from] url::ParseError),
}

impl SuggestionError {
    /// Text for the validation toast.
    pub fn user_message(&self, language: Language) -> &'static str {
        match self {
            SuggestionError::BlankTitle => language.text(Text::EnterSongTitle),
            SuggestionError::UnknownSong(_) => language.text(Text::SongNotFound),
            SuggestionError::Thumbnail(_) => language.text(Text::InvalidThumbnail),
        }
    }
}

/// Contents of the "add new song" form. Only the title is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub artist: String,
    pub creator: String,
    pub platform: String,
    pub comment: String,
    pub author: String,
}

/// Song suggestions of one session, newest first.
#[derive(Debug, Clone, Default)]
pub struct SongBoard {
    songs: Vec<Song>,
}

impl SongBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, song_id: &str) -> Option<&Song> {
        self.songs.iter().find(|song| song.id == song_id)
    }

    fn get_mut(&mut self, song_id: &str) -> Result<&mut Song, SuggestionError> {
        self.songs
            .iter_mut()
            .find(|song| song.id == song_id)
            .ok_or_else(|| SuggestionError::UnknownSong(song_id.to_string()))
    }

    /// Validates the form, builds a song and puts it on top of the board.
    pub fn submit(
        &mut self,
        draft: SongDraft,
        preferences: &Preferences,
    ) -> Result<&Song, SuggestionError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(SuggestionError::BlankTitle);
        }
        let now = utils::now_millis();

        let mut comments = Vec::new();
        if !draft.comment.trim().is_empty() {
            comments.push(Comment {
                text: draft.comment.trim().to_string(),
                author: author_or_anonymous(&draft.author, preferences),
                timestamp_millis: now,
            });
        }

        let song = Song {
            id: self.unique_id(format!("song-{}", now)),
            title: title.to_string(),
            artist: draft.artist.trim().to_string(),
            thumbnail: placeholder_thumbnail(title)?,
            creator: creator_or_unknown(&draft.creator, preferences),
            source: Platform::from_input(&draft.platform).unwrap_or(Platform::Youtube),
            votes: Votes::default(),
            comments,
        };
        Ok(self.push_front(song))
    }

    /// Puts a picked search result on top of the board.
    pub fn submit_hit(
        &mut self,
        hit: SearchHit,
        creator: &str,
        preferences: &Preferences,
    ) -> &Song {
        let song = Song {
            id: self.unique_id(hit.id),
            title: hit.title,
            artist: hit.artist,
            thumbnail: hit.thumbnail,
            creator: creator_or_unknown(creator, preferences),
            source: hit.source,
            votes: Votes::default(),
            comments: Vec::new(),
        };
        self.push_front(song)
    }

    /// Casts or retracts the vote of `user_id` on a song.
    pub fn toggle_vote(
        &mut self,
        song_id: &str,
        direction: VoteDirection,
        user_id: &str,
    ) -> Result<&Votes, SuggestionError> {
        let song = self.get_mut(song_id)?;
        song.votes.toggle(direction, user_id);
        Ok(&song.votes)
    }

    /// Appends a comment. Blank text is ignored and yields `Ok(None)`.
    pub fn add_comment(
        &mut self,
        song_id: &str,
        text: &str,
        author: &str,
        preferences: &Preferences,
    ) -> Result<Option<&Comment>, SuggestionError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let song = self.get_mut(song_id)?;
        song.comments.push(Comment {
            text: text.to_string(),
            author: author_or_anonymous(author, preferences),
            timestamp_millis: utils::now_millis(),
        });
        Ok(song.comments.last())
    }

    fn push_front(&mut self, song: Song) -> &Song {
        self.songs.insert(0, song);
        &self.songs[0]
    }

    // Two submissions within the same millisecond would share an id.
    fn unique_id(&self, base: String) -> String {
        if self.get(&base).is_none() {
            return base;
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or(base)
    }
}

fn creator_or_unknown(creator: &str, preferences: &Preferences) -> String {
    match creator.trim() {
        "" => preferences.t(Text::UnknownCreator).to_string(),
        name => name.to_string(),
    }
}

fn author_or_anonymous(author: &str, preferences: &Preferences) -> String {
    match author.trim() {
        "" => preferences.t(Text::AnonymousUser).to_string(),
        name => name.to_string(),
    }
}
