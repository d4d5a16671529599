// src/services/favorites_service.rs
//
// Single point of truth for favorite membership: toggle semantics,
// scan-result deduplication, change notification.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::domain::{FavoriteRecord, MovieId};
use crate::error::{FavoriteError, StoreError};
use crate::events::{DeliveryContext, FavoritesBroadcaster, Subscription};
use crate::repositories::FavoriteRepository;

/// Coordinates a locally persisted favorite set.
///
/// Every successful mutation recomputes the set from a full storage scan,
/// de-duplicates it by movie id, and pushes it to all subscribers. The
/// set itself is never stored; it exists only as the broadcast payload.
///
/// One instance is meant to be constructed at application startup and
/// handed to whichever screens need it. Mutations are serialized through
/// an internal lock, so concurrent toggles on the same id cannot race the
/// check-then-act sequence within a single instance.
pub struct FavoritesService {
    repo: Arc<dyn FavoriteRepository>,
    broadcaster: FavoritesBroadcaster,
    // Serializes mutations and snapshot reads. Held across the whole
    // check-then-act plus broadcast, so reads never observe a written-
    // but-not-yet-broadcast intermediate state.
    op_lock: Mutex<()>,
}

impl FavoritesService {
    pub fn new(repo: Arc<dyn FavoriteRepository>) -> Self {
        Self {
            repo,
            broadcaster: FavoritesBroadcaster::new(),
            op_lock: Mutex::new(()),
        }
    }

    /// Construct with a custom notification delivery context (e.g. a UI
    /// main-thread marshaller). Default is synchronous inline delivery.
    pub fn with_delivery(
        repo: Arc<dyn FavoriteRepository>,
        delivery: Arc<dyn DeliveryContext>,
    ) -> Self {
        Self {
            repo,
            broadcaster: FavoritesBroadcaster::with_delivery(delivery),
            op_lock: Mutex::new(()),
        }
    }

    /// Is this movie currently favorited?
    pub fn is_favorite(&self, id: MovieId) -> Result<bool, StoreError> {
        let _guard = self.op_lock.lock().unwrap();
        self.repo.exists(id)
    }

    /// Favorite a movie. Idempotent: adding an existing favorite is a
    /// no-op success. Broadcasts the updated set on actual insertion.
    pub fn add(&self, record: FavoriteRecord) -> Result<(), FavoriteError> {
        let _guard = self.op_lock.lock().unwrap();
        self.add_locked(record)
    }

    /// Unfavorite a movie. Idempotent: removing an absent favorite is a
    /// no-op success. Broadcasts the updated set on actual deletion.
    pub fn remove(&self, id: MovieId) -> Result<(), FavoriteError> {
        let _guard = self.op_lock.lock().unwrap();
        self.remove_locked(id)
    }

    /// Flip favorite membership and return the NEW state: `true` means
    /// the movie is now a favorite, `false` means it no longer is.
    ///
    /// Check-then-act, serialized by the instance lock. A failed toggle
    /// returns an error; an idempotent no-op does not.
    pub fn toggle(&self, record: FavoriteRecord) -> Result<bool, FavoriteError> {
        let _guard = self.op_lock.lock().unwrap();

        if self.repo.exists(record.id)? {
            self.remove_locked(record.id)?;
            Ok(false)
        } else {
            self.add_locked(record)?;
            Ok(true)
        }
    }

    /// The current favorite set: full scan, de-duplicated by id.
    /// Does not broadcast.
    pub fn current_favorites(&self) -> Result<Vec<FavoriteRecord>, StoreError> {
        let _guard = self.op_lock.lock().unwrap();
        self.compute_favorites()
    }

    /// Register a subscriber. It immediately receives the current
    /// snapshot, then the full set on every change, until the returned
    /// handle is cancelled or dropped.
    ///
    /// With the default inline delivery the handler runs while the
    /// service's lock is held, so it must not call back into mutation
    /// methods and should return quickly: a slow handler delays all
    /// later handlers and the triggering mutation's return.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&[FavoriteRecord]) + Send + Sync + 'static,
    {
        let _guard = self.op_lock.lock().unwrap();
        let subscription = self.broadcaster.subscribe(handler);

        match self.compute_favorites() {
            Ok(favorites) => self.broadcaster.emit_to(&subscription, &favorites),
            Err(e) => log::warn!("skipping initial favorites snapshot, scan failed: {}", e),
        }

        subscription
    }

    pub fn subscriber_count(&self) -> usize {
        self.broadcaster.subscriber_count()
    }

    fn add_locked(&self, record: FavoriteRecord) -> Result<(), FavoriteError> {
        // Pre-check keeps duplicate inserts away from the storage layer,
        // where they are undefined
        if self.repo.exists(record.id)? {
            log::debug!("movie {} already favorited, no-op", record.id);
            return Ok(());
        }

        self.repo.insert(&record)?;
        log::info!("added favorite: {}", record);

        self.recompute_and_broadcast();
        Ok(())
    }

    fn remove_locked(&self, id: MovieId) -> Result<(), FavoriteError> {
        let existed = self.repo.remove(id)?;

        if existed {
            log::info!("removed favorite: #{}", id);
            self.recompute_and_broadcast();
        } else {
            log::debug!("movie {} was not favorited, no-op", id);
        }

        Ok(())
    }

    /// Full scan plus first-seen-wins deduplication by id. Deterministic
    /// for a given scan result: repeated calls with unchanged storage
    /// return the same set.
    fn compute_favorites(&self) -> Result<Vec<FavoriteRecord>, StoreError> {
        let scanned = self.repo.scan_all()?;

        let mut seen: HashSet<MovieId> = HashSet::with_capacity(scanned.len());
        let mut unique = Vec::with_capacity(scanned.len());
        for record in scanned {
            if seen.insert(record.id) {
                unique.push(record);
            }
        }

        Ok(unique)
    }

    /// Post-mutation notification. A scan failure here is degraded, not
    /// fatal: the write already happened, so the mutation still reports
    /// success and subscribers catch up on the next successful change.
    fn recompute_and_broadcast(&self) {
        match self.compute_favorites() {
            Ok(favorites) => self.broadcaster.emit(&favorites),
            Err(e) => log::warn!("favorites changed but refresh scan failed: {}", e),
        }
    }
}
