use serde::{Deserialize, Serialize};

use crate::entities::movie;

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MovieRecord {
    pub slug: String,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub plot: String,
    pub poster: String,
    pub telegram_link: String,
    pub terabox_link: String,
}

impl From<movie::Model> for MovieRecord {
    fn from(m: movie::Model) -> Self {
        Self {
            slug: m.slug,
            title: m.title,
            year: m.year,
            genre: m.genre,
            plot: m.plot,
            poster: m.poster,
            telegram_link: m.telegram_link,
            terabox_link: m.terabox_link,
        }
    }
}

/// Normalized field set produced by the metadata lookup. Every field is
/// empty when the lookup found nothing or failed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MovieMetadata {
    pub year: String,
    pub plot: String,
    pub poster: String,
    pub genre: String,
}

impl MovieMetadata {
    pub fn is_empty(&self) -> bool {
        self.year.is_empty()
            && self.plot.is_empty()
            && self.poster.is_empty()
            && self.genre.is_empty()
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MovieSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub telegram_link: String,
    #[serde(default)]
    pub terabox_link: String,
}

impl MovieSubmission {
    /// Trims every field; form inputs often carry stray whitespace.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            year: self.year.trim().to_string(),
            genre: self.genre.trim().to_string(),
            plot: self.plot.trim().to_string(),
            poster: self.poster.trim().to_string(),
            telegram_link: self.telegram_link.trim().to_string(),
            terabox_link: self.terabox_link.trim().to_string(),
        }
    }

    pub fn into_record(self, slug: String) -> MovieRecord {
        MovieRecord {
            slug,
            title: self.title,
            year: self.year,
            genre: self.genre,
            plot: self.plot,
            poster: self.poster,
            telegram_link: self.telegram_link,
            terabox_link: self.terabox_link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FetchDetailsQuery {
    #[serde(default)]
    pub title: String,
}
