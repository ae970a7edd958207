//! Line oriented front-end for the song board.
//!
//! One [`Session`] is one visitor: it owns the board, the visitor's
//! preferences and the results of their last search.
use crate::locale::{Preferences, Text};
use crate::suggestions::{
    SearchHit, SearchProvider, Song, SongBoard, SongDraft, SuggestionError, VoteDirection,
};

pub const HELP: &str = "\
commands:
  list                                  show suggested songs
  add <title>[; artist; creator; platform; comment]
  search <query>                        look up candidates
  pick <n>                              suggest search result n
  accept <song> | reject <song>         toggle your vote (song number or id)
  comment <song> <text>                 add a comment
  lang | theme                          switch language or theme
  help | quit";

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(Vec<String>),
    Quit,
}

pub struct Session<P> {
    board: SongBoard,
    preferences: Preferences,
    user_id: String,
    provider: P,
    last_hits: Vec<SearchHit>,
}

impl<P: SearchProvider> Session<P> {
    pub fn new(user_id: impl Into<String>, provider: P) -> Self {
        Session {
            board: SongBoard::new(),
            preferences: Preferences::default(),
            user_id: user_id.into(),
            provider,
            last_hits: Vec::new(),
        }
    }

    pub fn board(&self) -> &SongBoard {
        &self.board
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn execute(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let lines = match command {
            "" => Vec::new(),
            "quit" | "exit" => return Outcome::Quit,
            "help" => vec![HELP.to_string()],
            "list" => self.list(),
            "add" => self.add(rest),
            "search" => self.search(rest),
            "pick" => self.pick(rest),
            "accept" | "reject" => match command.parse::<VoteDirection>() {
                Ok(direction) => self.vote(rest, direction),
                Err(e) => vec![e],
            },
            "comment" => self.comment(rest),
            "lang" => {
                self.preferences.toggle_language();
                vec![format!("language: {}", self.preferences.language)]
            }
            "theme" => {
                self.preferences.toggle_theme();
                vec![format!("theme: {}", self.preferences.theme)]
            }
            other => vec![format!("unknown command: {} (try help)", other)],
        };
        Outcome::Continue(lines)
    }

    fn error_line(&self, err: &SuggestionError) -> Vec<String> {
        vec![err.user_message(self.preferences.language).to_string()]
    }

    /// Accepts a 1-based position on the board or a song id.
    fn resolve(&self, reference: &str) -> Result<String, SuggestionError> {
        let by_position = reference
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.board.songs().get(i));
        by_position
            .or_else(|| self.board.get(reference))
            .map(|song| song.id.clone())
            .ok_or_else(|| SuggestionError::UnknownSong(reference.to_string()))
    }

    fn list(&self) -> Vec<String> {
        self.board
            .songs()
            .iter()
            .enumerate()
            .flat_map(|(i, song)| describe(i + 1, song))
            .collect()
    }

    fn add(&mut self, rest: &str) -> Vec<String> {
        let mut fields = rest.split(';').map(str::trim);
        let mut next = || fields.next().unwrap_or_default().to_string();
        let draft = SongDraft {
            title: next(),
            artist: next(),
            creator: next(),
            platform: next(),
            comment: next(),
            author: self.user_id.clone(),
        };
        match self.board.submit(draft, &self.preferences) {
            Ok(song) => vec![format!(
                "{}: {} ({})",
                self.preferences.t(Text::SongAdded),
                song.title,
                song.id
            )],
            Err(e) => self.error_line(&e),
        }
    }

    fn search(&mut self, query: &str) -> Vec<String> {
        match self.provider.search(query) {
            Ok(hits) => {
                self.last_hits = hits;
                self.last_hits
                    .iter()
                    .enumerate()
                    .map(|(i, hit)| {
                        format!("{}. {} - {} [{}]", i + 1, hit.title, hit.artist, hit.source)
                    })
                    .collect()
            }
            Err(e) => vec![e.to_string()],
        }
    }

    fn pick(&mut self, rest: &str) -> Vec<String> {
        let hit = rest
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| self.last_hits.get(i))
            .cloned();
        let Some(hit) = hit else {
            return vec![format!("no search result {}", rest)];
        };
        let song = self.board.submit_hit(hit, &self.user_id, &self.preferences);
        vec![format!(
            "{}: {} ({})",
            self.preferences.t(Text::SongAdded),
            song.title,
            song.id
        )]
    }

    fn vote(&mut self, rest: &str, direction: VoteDirection) -> Vec<String> {
        let id = match self.resolve(rest) {
            Ok(id) => id,
            Err(e) => return self.error_line(&e),
        };
        match self.board.toggle_vote(&id, direction, &self.user_id) {
            Ok(votes) => {
                let status = match votes.ballot(&self.user_id) {
                    Some(VoteDirection::Accept) => self.preferences.t(Text::VoteAccepted),
                    Some(VoteDirection::Reject) => self.preferences.t(Text::VoteRejected),
                    None => "-",
                };
                vec![format!(
                    "{} ({} {} / {} {})",
                    status,
                    self.preferences.t(Text::AcceptedVotes),
                    votes.accepted().len(),
                    self.preferences.t(Text::RejectedVotes),
                    votes.rejected().len()
                )]
            }
            Err(e) => self.error_line(&e),
        }
    }

    fn comment(&mut self, rest: &str) -> Vec<String> {
        let (reference, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let id = match self.resolve(reference) {
            Ok(id) => id,
            Err(e) => return self.error_line(&e),
        };
        match self
            .board
            .add_comment(&id, text, &self.user_id, &self.preferences)
        {
            Ok(Some(_)) => vec![self.preferences.t(Text::CommentAdded).to_string()],
            Ok(None) => Vec::new(),
            Err(e) => self.error_line(&e),
        }
    }
}

fn describe(position: usize, song: &Song) -> Vec<String> {
    let mut lines = vec![format!(
        "{}. {} - {} [{}] by {}  +{} -{}  ({})",
        position,
        song.title,
        song.artist,
        song.source,
        song.creator,
        song.votes.accepted().len(),
        song.votes.rejected().len(),
        song.id
    )];
    lines.extend(
        song.comments
            .iter()
            .map(|c| format!("     {}: {}", c.author, c.text)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggestions::FabricatedSearch;

    fn lines(outcome: Outcome) -> Vec<String> {
        match outcome {
            Outcome::Continue(lines) => lines,
            Outcome::Quit => panic!("session ended"),
        }
    }

    #[test]
    fn test_add_vote_and_comment_flow() {
        let mut session = Session::new("marek", FabricatedSearch);

        let out = lines(session.execute("add Test Song; Queen"));
        assert!(out[0].starts_with("Píseň přidána: Test Song"));
        let song = &session.board().songs()[0];
        assert_eq!(song.artist, "Queen");
        assert_eq!(song.creator, "Neznámý tvůrce");

        let out = lines(session.execute("accept 1"));
        assert_eq!(out, ["Hlas přijat (Pro 1 / Proti 0)"]);
        let out = lines(session.execute("reject 1"));
        assert_eq!(out, ["Hlas odmítnut (Pro 0 / Proti 1)"]);
        let out = lines(session.execute("reject 1"));
        assert_eq!(out, ["- (Pro 0 / Proti 0)"]);

        let out = lines(session.execute("comment 1 super"));
        assert_eq!(out, ["Komentář přidán"]);
        assert!(lines(session.execute("comment 1")).is_empty());
        let comments = &session.board().songs()[0].comments;
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].author, "marek");
    }

    #[test]
    fn test_blank_title_and_unknown_song_messages() {
        let mut session = Session::new("marek", FabricatedSearch);
        assert_eq!(lines(session.execute("add ; Queen")), ["Zadejte název písně"]);
        assert!(session.board().is_empty());

        session.execute("lang");
        assert_eq!(lines(session.execute("accept 7")), ["Пісню не знайдено"]);
    }

    #[test]
    fn test_search_and_pick() {
        let mut session = Session::new("olena", FabricatedSearch);
        let out = lines(session.execute("search Kabát"));
        assert_eq!(out.len(), 8);
        assert_eq!(out[0], "1. Kabát - Official Video - Artist A [YouTube]");

        lines(session.execute("pick 6"));
        let song = &session.board().songs()[0];
        assert_eq!(song.title, "Kabát Radio");
        assert_eq!(song.creator, "olena");

        assert_eq!(lines(session.execute("pick 42")), ["no search result 42"]);
    }

    #[test]
    fn test_preferences_and_quit() {
        let mut session = Session::new("marek", FabricatedSearch);
        assert_eq!(lines(session.execute("theme")), ["theme: dark"]);
        assert_eq!(lines(session.execute("lang")), ["language: uk"]);
        assert_eq!(session.execute("quit"), Outcome::Quit);
        assert!(lines(session.execute("   ")).is_empty());
    }

    #[test]
    fn test_song_can_be_referenced_by_id() {
        let mut session = Session::new("marek", FabricatedSearch);
        session.execute("add Holky z naší školky");
        let id = session.board().songs()[0].id.clone();
        lines(session.execute(&format!("accept {}", id)));
        assert!(session.board().songs()[0].votes.accepted().contains("marek"));
        let listing = lines(session.execute("list"));
        assert!(listing[0].contains("+1 -0"));
    }
}
