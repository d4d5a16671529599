// src/services/favorites_service_tests.rs
//
// UNIT TESTS: Favorites coordination
//
// INVARIANTS TESTED:
// - add is idempotent: double-add leaves exactly one record per id
// - toggle returns the NEW membership state and round-trips
// - duplicate scan rows collapse deterministically (first-seen-wins)
// - every successful mutation broadcasts exactly once; failed writes never do
// - subscribers get exactly one initial snapshot; cancelled handles get nothing
// - post-mutation scan failure degrades to a logged skip, not an error

#[cfg(test)]
mod favorites_tests {
    use std::sync::{Arc, Mutex};

    use crate::db::{create_test_pool, initialize_database};
    use crate::domain::FavoriteRecord;
    use crate::error::{FavoriteError, StoreError};
    use crate::repositories::{
        FavoriteRepository, MockFavoriteRepository, SqliteFavoriteRepository,
    };
    use crate::services::FavoritesService;

    fn sqlite_service() -> (FavoritesService, Arc<SqliteFavoriteRepository>) {
        let pool = Arc::new(create_test_pool().unwrap());
        {
            let conn = pool.get().unwrap();
            initialize_database(&conn).unwrap();
        }
        let repo = Arc::new(SqliteFavoriteRepository::new(pool));
        let service = FavoritesService::new(repo.clone());
        (service, repo)
    }

    fn record(id: i64, title: &str) -> FavoriteRecord {
        FavoriteRecord::new(id, Some(title.to_string()), None)
    }

    /// Collects every delivered favorite set
    #[derive(Clone, Default)]
    struct Collector {
        deliveries: Arc<Mutex<Vec<Vec<FavoriteRecord>>>>,
    }

    impl Collector {
        fn handler(&self) -> impl Fn(&[FavoriteRecord]) + Send + Sync + 'static {
            let deliveries = Arc::clone(&self.deliveries);
            move |favorites| deliveries.lock().unwrap().push(favorites.to_vec())
        }

        fn count(&self) -> usize {
            self.deliveries.lock().unwrap().len()
        }

        fn last(&self) -> Vec<FavoriteRecord> {
            self.deliveries.lock().unwrap().last().cloned().unwrap()
        }
    }

    // ------------------------------------------------------------------
    // Membership semantics (sqlite-backed)
    // ------------------------------------------------------------------

    #[test]
    fn test_empty_store_scenario() {
        let (service, _) = sqlite_service();

        assert_eq!(service.current_favorites().unwrap(), vec![]);

        service.add(record(1, "A")).unwrap();
        assert_eq!(service.current_favorites().unwrap(), vec![record(1, "A")]);

        // Toggle off: returns the NEW state
        let now_favorite = service.toggle(record(1, "A")).unwrap();
        assert!(!now_favorite);
        assert_eq!(service.current_favorites().unwrap(), vec![]);

        // Removing from the now-empty store is an idempotent success
        service.remove(1).unwrap();
        assert_eq!(service.current_favorites().unwrap(), vec![]);
    }

    #[test]
    fn test_double_add_is_idempotent() {
        let (service, repo) = sqlite_service();
        let movie = record(603, "The Matrix");

        service.add(movie.clone()).unwrap();
        service.add(movie.clone()).unwrap();

        let favorites = service.current_favorites().unwrap();
        assert_eq!(favorites.iter().filter(|r| r.id == 603).count(), 1);

        // The second add never reached storage
        assert_eq!(repo.scan_all().unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_roundtrip() {
        let (service, _) = sqlite_service();
        let movie = record(550, "Fight Club");

        assert!(!service.is_favorite(550).unwrap());

        assert!(service.toggle(movie.clone()).unwrap());
        assert!(service.is_favorite(550).unwrap());

        assert!(!service.toggle(movie).unwrap());
        assert!(!service.is_favorite(550).unwrap());
    }

    #[test]
    fn test_duplicate_rows_collapse_first_seen() {
        let (service, repo) = sqlite_service();

        // Bypass the coordinator to plant duplicate rows, as a flawed or
        // differently-configured storage implementation might
        repo.insert(&record(7, "First")).unwrap();
        repo.insert(&record(7, "Second")).unwrap();

        let favorites = service.current_favorites().unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, 7);
        assert_eq!(favorites[0].title.as_deref(), Some("First"));

        // Stable across repeated calls with unchanged storage
        assert_eq!(service.current_favorites().unwrap(), favorites);
    }

    // ------------------------------------------------------------------
    // Broadcast semantics
    // ------------------------------------------------------------------

    #[test]
    fn test_subscribe_delivers_one_initial_snapshot() {
        let (service, _) = sqlite_service();
        service.add(record(1, "A")).unwrap();

        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());

        assert_eq!(collector.count(), 1);
        assert_eq!(collector.last(), vec![record(1, "A")]);
    }

    #[test]
    fn test_add_broadcasts_exactly_once() {
        let (service, _) = sqlite_service();
        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());
        assert_eq!(collector.count(), 1); // initial snapshot

        service.add(record(1, "A")).unwrap();

        assert_eq!(collector.count(), 2);
        assert_eq!(collector.last(), vec![record(1, "A")]);
    }

    #[test]
    fn test_noop_mutations_do_not_broadcast() {
        let (service, _) = sqlite_service();
        service.add(record(1, "A")).unwrap();

        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());
        assert_eq!(collector.count(), 1);

        // Idempotent no-ops: set unchanged, nothing pushed
        service.add(record(1, "A")).unwrap();
        service.remove(999).unwrap();

        assert_eq!(collector.count(), 1);
    }

    #[test]
    fn test_remove_broadcasts_updated_set() {
        let (service, _) = sqlite_service();
        service.add(record(1, "A")).unwrap();
        service.add(record(2, "B")).unwrap();

        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());

        service.remove(1).unwrap();

        assert_eq!(collector.count(), 2);
        assert_eq!(collector.last(), vec![record(2, "B")]);
    }

    #[test]
    fn test_cancelled_subscription_receives_nothing() {
        let (service, _) = sqlite_service();
        let collector = Collector::default();

        let mut sub = service.subscribe(collector.handler());
        assert_eq!(collector.count(), 1);

        sub.cancel();
        service.add(record(1, "A")).unwrap();

        assert_eq!(collector.count(), 1);
        assert_eq!(service.subscriber_count(), 0);
    }

    #[test]
    fn test_multiple_subscribers_all_notified() {
        let (service, _) = sqlite_service();
        let first = Collector::default();
        let second = Collector::default();

        let _sub1 = service.subscribe(first.handler());
        let _sub2 = service.subscribe(second.handler());

        service.add(record(1, "A")).unwrap();

        assert_eq!(first.count(), 2);
        assert_eq!(second.count(), 2);
        assert_eq!(first.last(), second.last());
    }

    // ------------------------------------------------------------------
    // Failure paths (mocked storage)
    // ------------------------------------------------------------------

    #[test]
    fn test_failed_write_surfaces_and_does_not_broadcast() {
        let mut mock = MockFavoriteRepository::new();
        mock.expect_scan_all().returning(|| Ok(vec![]));
        mock.expect_exists().returning(|_| Ok(false));
        mock.expect_insert()
            .returning(|_| Err(StoreError::WriteFailed("disk full".to_string())));

        let service = FavoritesService::new(Arc::new(mock));
        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());
        assert_eq!(collector.count(), 1);

        let result = service.add(record(1, "A"));
        assert!(matches!(result, Err(FavoriteError::PersistenceFailed(_))));

        // Subscribers never observe a state the store doesn't hold
        assert_eq!(collector.count(), 1);
    }

    #[test]
    fn test_failed_delete_surfaces_and_does_not_broadcast() {
        let mut mock = MockFavoriteRepository::new();
        mock.expect_scan_all().returning(|| Ok(vec![]));
        mock.expect_remove()
            .returning(|_| Err(StoreError::WriteFailed("io error".to_string())));

        let service = FavoritesService::new(Arc::new(mock));
        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());

        let result = service.remove(1);
        assert!(matches!(result, Err(FavoriteError::PersistenceFailed(_))));
        assert_eq!(collector.count(), 1);
    }

    #[test]
    fn test_recompute_failure_degrades_gracefully() {
        // Write succeeds, post-mutation scan fails: the mutation is still
        // reported successful and nothing is pushed
        let mut mock = MockFavoriteRepository::new();
        mock.expect_exists().returning(|_| Ok(false));
        mock.expect_insert().returning(|_| Ok(()));
        mock.expect_scan_all()
            .returning(|| Err(StoreError::ReadFailed("scan failed".to_string())));

        let service = FavoritesService::new(Arc::new(mock));
        let collector = Collector::default();
        let _sub = service.subscribe(collector.handler());
        assert_eq!(collector.count(), 0); // initial snapshot skipped too

        service.add(record(1, "A")).unwrap();
        assert_eq!(collector.count(), 0);
    }

    #[test]
    fn test_read_failure_surfaces_from_is_favorite() {
        let mut mock = MockFavoriteRepository::new();
        mock.expect_exists()
            .returning(|_| Err(StoreError::ReadFailed("locked".to_string())));

        let service = FavoritesService::new(Arc::new(mock));
        assert!(matches!(
            service.is_favorite(1),
            Err(StoreError::ReadFailed(_))
        ));
    }

    #[test]
    fn test_toggle_propagates_membership_read_failure() {
        let mut mock = MockFavoriteRepository::new();
        mock.expect_exists()
            .returning(|_| Err(StoreError::ReadFailed("locked".to_string())));

        let service = FavoritesService::new(Arc::new(mock));
        assert!(matches!(
            service.toggle(record(1, "A")),
            Err(FavoriteError::PersistenceFailed(_))
        ));
    }
}
