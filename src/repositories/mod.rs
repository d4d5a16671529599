// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO event emission
// - NO cross-repository calls

pub mod favorite_repository;

pub use favorite_repository::{FavoriteRepository, SqliteFavoriteRepository};

#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
