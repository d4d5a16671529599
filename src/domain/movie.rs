use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog movie identity. The remote catalog assigns integer ids and they
/// are the sole identity key throughout the system.
pub type MovieId = i64;

/// A movie as described by the remote catalog.
///
/// Read-only from the core's perspective: produced by the catalog API
/// client, never persisted as-is. Only id, title and poster_path matter
/// for favoriting; everything else is display data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    /// Catalog-assigned immutable identifier
    pub id: MovieId,

    /// Display title
    pub title: String,

    /// Title in the original language, when it differs
    pub original_title: Option<String>,

    /// ISO 639-1 language code
    pub original_language: Option<String>,

    /// Plot summary
    pub overview: Option<String>,

    /// Poster image reference (catalog-relative path)
    pub poster_path: Option<String>,

    /// Backdrop image reference (catalog-relative path)
    pub backdrop_path: Option<String>,

    /// First release date, when the catalog knows it
    pub release_date: Option<NaiveDate>,

    /// Catalog genre identifiers
    pub genre_ids: Vec<i64>,
}

impl std::fmt::Display for CatalogMovie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (#{})", self.title, self.id)
    }
}
