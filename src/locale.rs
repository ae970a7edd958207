//! User-facing language and theme preferences.
//!
//! Preferences are a plain value handed to whatever needs localized text.
//! Only the messages produced outside the UI layer live here.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Cs,
    Uk,
}

impl Language {
    pub fn toggle(self) -> Self {
        match self {
            Language::Cs => Language::Uk,
            Language::Uk => Language::Cs,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::Cs => "cs",
            Language::Uk => "uk",
        }
    }

    pub fn text(self, key: Text) -> &'static str {
        let (cs, uk) = match key {
            Text::UnknownCreator => ("Neznámý tvůrce", "Невідомий творець"),
            Text::AnonymousUser => ("Anonymní uživatel", "Анонімний користувач"),
            Text::EnterSongTitle => ("Zadejte název písně", "Введіть назву пісні"),
            Text::SongAdded => ("Píseň přidána", "Пісня додана"),
            Text::CommentAdded => ("Komentář přidán", "Коментар додано"),
            Text::FileUploaded => ("Soubor nahrán", "Файл завантажено"),
            Text::FilesUploaded => ("Soubory nahrány", "Файли завантажено"),
            Text::FileUploadedSuccess => ("soubor byl nahrán úspěšně", "файл завантажено успішно"),
            Text::FilesUploadedSuccess => {
                ("soubory byly nahrány úspěšně", "файлів завантажено успішно")
            }
            Text::ErrorUploading => ("Chyba při nahrávání", "Помилка при завантаженні"),
            Text::ErrorUploadingFiles => (
                "Nastala chyba při nahrávání souborů.",
                "Сталася помилка під час завантаження файлів.",
            ),
            Text::SongNotFound => ("Píseň nenalezena", "Пісню не знайдено"),
            Text::InvalidThumbnail => (
                "Náhled písně nelze vytvořit",
                "Не вдалося створити мініатюру пісні",
            ),
            Text::VoteAccepted => ("Hlas přijat", "Голос прийнято"),
            Text::VoteRejected => ("Hlas odmítnut", "Голос відхилено"),
            Text::AcceptedVotes => ("Pro", "За"),
            Text::RejectedVotes => ("Proti", "Проти"),
        };
        match self {
            Language::Cs => cs,
            Language::Uk => uk,
        }
    }

    /// Toast title and description shown after a successful upload.
    pub fn upload_summary(self, count: usize) -> (&'static str, String) {
        if count == 1 {
            (
                self.text(Text::FileUploaded),
                format!("{} {}", count, self.text(Text::FileUploadedSuccess)),
            )
        } else {
            (
                self.text(Text::FilesUploaded),
                format!("{} {}", count, self.text(Text::FilesUploadedSuccess)),
            )
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cs" => Ok(Language::Cs),
            "uk" => Ok(Language::Uk),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Message keys with a translation in every [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    UnknownCreator,
    AnonymousUser,
    EnterSongTitle,
    SongAdded,
    CommentAdded,
    FileUploaded,
    FilesUploaded,
    FileUploadedSuccess,
    FilesUploadedSuccess,
    ErrorUploading,
    ErrorUploadingFiles,
    SongNotFound,
    InvalidThumbnail,
    VoteAccepted,
    VoteRejected,
    AcceptedVotes,
    RejectedVotes,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}

impl Preferences {
    pub fn toggle_language(&mut self) {
        self.language = self.language.toggle();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
    }

    pub fn t(&self, key: Text) -> &'static str {
        self.language.text(key)
    }
}
