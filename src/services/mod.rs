// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod favorites_service;

#[cfg(test)]
mod favorites_service_tests;

pub use favorites_service::FavoritesService;
