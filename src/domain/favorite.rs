use serde::{Deserialize, Serialize};

use crate::domain::movie::{CatalogMovie, MovieId};

/// A locally persisted favorite: a reduced projection of [`CatalogMovie`].
///
/// Only `id` is identity. Title and poster are a best-effort cache of
/// display data at favoriting time and may be stale relative to the live
/// catalog; they stay `Option` end to end so "field absent" is never
/// confused with "field present but empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: MovieId,
    pub title: Option<String>,
    pub poster_path: Option<String>,
}

impl FavoriteRecord {
    pub fn new(id: MovieId, title: Option<String>, poster_path: Option<String>) -> Self {
        Self {
            id,
            title,
            poster_path,
        }
    }
}

impl From<&CatalogMovie> for FavoriteRecord {
    fn from(movie: &CatalogMovie) -> Self {
        Self {
            id: movie.id,
            title: Some(movie.title.clone()),
            poster_path: movie.poster_path.clone(),
        }
    }
}

impl std::fmt::Display for FavoriteRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} (#{})", title, self.id),
            None => write!(f, "#{}", self.id),
        }
    }
}
