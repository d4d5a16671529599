// src/lib.rs
// MovieList - Movie catalog browser with locally persisted favorites
//
// Architecture:
// - Domain-centric: the favorite set lives in services, storage in repositories
// - Push-based: subscribers receive the full favorite set on every change
// - Explicit: no implicit behavior, no global singletons
// - Local-first: favorites survive catalog unavailability

pub mod db;
pub mod domain;
pub mod error;
pub mod events;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain Model
// ============================================================================

pub use domain::{CatalogMovie, FavoriteRecord, MovieId};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{ApiError, AppError, AppResult, FavoriteError, StoreError};

// ============================================================================
// PUBLIC API - Favorites Core
// ============================================================================

pub use events::{DeliveryContext, FavoritesBroadcaster, InlineDelivery, Subscription};
pub use repositories::{FavoriteRepository, SqliteFavoriteRepository};
pub use services::FavoritesService;

// ============================================================================
// PUBLIC API - Catalog Client
// ============================================================================

pub use integrations::TmdbClient;
