// src/repositories/favorite_repository.rs

use chrono::Utc;
use rusqlite::{params, Row};
use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::{FavoriteRecord, MovieId};
use crate::error::StoreError;

#[cfg(test)]
use mockall::automock;

/// Durable CRUD over favorite records, identity-keyed by movie id.
///
/// `insert` does no uniqueness pre-check: inserting a duplicate id is
/// undefined at this layer and must be prevented by the caller (the
/// coordinator's add is idempotent). `scan_all` may likewise return
/// duplicate ids; callers de-duplicate.
#[cfg_attr(test, automock)]
pub trait FavoriteRepository: Send + Sync {
    fn insert(&self, record: &FavoriteRecord) -> Result<(), StoreError>;
    fn remove(&self, id: MovieId) -> Result<bool, StoreError>;
    fn exists(&self, id: MovieId) -> Result<bool, StoreError>;
    fn scan_all(&self) -> Result<Vec<FavoriteRecord>, StoreError>;
}

pub struct SqliteFavoriteRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    fn row_to_record(row: &Row) -> Result<FavoriteRecord, rusqlite::Error> {
        Ok(FavoriteRecord {
            id: row.get("movie_id")?,
            title: row.get("title")?,
            poster_path: row.get("poster_path")?,
        })
    }
}

impl FavoriteRepository for SqliteFavoriteRepository {
    fn insert(&self, record: &FavoriteRecord) -> Result<(), StoreError> {
        let conn = self.pool.get().map_err(StoreError::write)?;

        conn.execute(
            "INSERT INTO favorite_movies (movie_id, title, poster_path, favorited_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.id,
                record.title,
                record.poster_path,
                Utc::now().to_rfc3339(),
            ],
        )
        .map_err(StoreError::write)?;

        Ok(())
    }

    fn remove(&self, id: MovieId) -> Result<bool, StoreError> {
        let conn = self.pool.get().map_err(StoreError::write)?;

        let deleted = conn
            .execute("DELETE FROM favorite_movies WHERE movie_id = ?1", params![id])
            .map_err(StoreError::write)?;

        Ok(deleted > 0)
    }

    fn exists(&self, id: MovieId) -> Result<bool, StoreError> {
        let conn = self.pool.get().map_err(StoreError::read)?;

        conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM favorite_movies WHERE movie_id = ?1)",
            params![id],
            |row| row.get(0),
        )
        .map_err(StoreError::read)
    }

    fn scan_all(&self) -> Result<Vec<FavoriteRecord>, StoreError> {
        let conn = self.pool.get().map_err(StoreError::read)?;

        let mut stmt = conn
            .prepare("SELECT movie_id, title, poster_path FROM favorite_movies")
            .map_err(StoreError::read)?;

        let records: Vec<FavoriteRecord> = stmt
            .query_map([], Self::row_to_record)
            .map_err(StoreError::read)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::read)?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool_at, create_test_pool, initialize_database};

    fn test_repository() -> SqliteFavoriteRepository {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteFavoriteRepository::new(pool)
    }

    #[test]
    fn test_insert_exists_remove_roundtrip() {
        let repo = test_repository();
        let record = FavoriteRecord::new(603, Some("The Matrix".to_string()), None);

        assert!(!repo.exists(603).unwrap());

        repo.insert(&record).unwrap();
        assert!(repo.exists(603).unwrap());

        assert!(repo.remove(603).unwrap());
        assert!(!repo.exists(603).unwrap());
    }

    #[test]
    fn test_remove_absent_is_not_an_error() {
        let repo = test_repository();
        assert!(!repo.remove(999).unwrap());
    }

    #[test]
    fn test_scan_preserves_absent_fields() {
        let repo = test_repository();
        repo.insert(&FavoriteRecord::new(1, None, None)).unwrap();

        let records = repo.scan_all().unwrap();
        assert_eq!(records.len(), 1);
        // Absent display fields must come back as None, not empty strings
        assert_eq!(records[0].title, None);
        assert_eq!(records[0].poster_path, None);
    }

    #[test]
    fn test_storage_does_not_deduplicate() {
        // The table has no UNIQUE constraint: a duplicate insert at this
        // layer lands as a second row. De-duplication is the
        // coordinator's job.
        let repo = test_repository();
        let record = FavoriteRecord::new(7, Some("Se7en".to_string()), None);

        repo.insert(&record).unwrap();
        repo.insert(&record).unwrap();

        let records = repo.scan_all().unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_records_survive_pool_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("favorites.db");

        {
            let pool = Arc::new(create_pool_at(&db_path).unwrap());
            {
                let conn = pool.get().unwrap();
                initialize_database(&conn).unwrap();
            }
            let repo = SqliteFavoriteRepository::new(pool);
            repo.insert(&FavoriteRecord::new(
                550,
                Some("Fight Club".to_string()),
                Some("/fc.jpg".to_string()),
            ))
            .unwrap();
        }

        // Fresh pool over the same file sees the committed record
        let pool = Arc::new(create_pool_at(&db_path).unwrap());
        let repo = SqliteFavoriteRepository::new(pool);
        let records = repo.scan_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, 550);
        assert_eq!(records[0].title.as_deref(), Some("Fight Club"));
    }
}
