// src/integrations/tmdb/client.rs
//
// TMDB API Integration
//
// ARCHITECTURE:
// - REST client for The Movie Database API
// - Handles rate limiting and response mapping
// - Maps external data → internal domain model (NO favorites mutation)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never touches the favorites store
// - Handles all external API concerns

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::domain::{CatalogMovie, MovieId};
use crate::error::ApiError;

const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Paged list response (popular, search, ...)
#[derive(Debug, Deserialize)]
struct PageData {
    results: Vec<MovieData>,
}

/// Movie payload from TMDB
///
/// List endpoints carry `genre_ids`; the detail endpoint carries expanded
/// `genres` objects instead. Both are accepted and merged in mapping.
#[derive(Debug, Deserialize)]
struct MovieData {
    id: i64,
    title: String,
    original_title: Option<String>,
    original_language: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    release_date: Option<String>,
    #[serde(default)]
    genre_ids: Vec<i64>,
    #[serde(default)]
    genres: Vec<GenreData>,
}

#[derive(Debug, Deserialize)]
struct GenreData {
    id: i64,
}

/// Rate limiter state
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            last_request: Instant::now() - Duration::from_secs(60),
            min_interval: Duration::from_millis(250), // 4 requests per second
        }
    }

    /// How long the caller must wait before the next request, if at all.
    /// Marks the request as taken.
    fn reserve(&mut self) -> Option<Duration> {
        let elapsed = self.last_request.elapsed();
        let wait = if elapsed < self.min_interval {
            Some(self.min_interval - elapsed)
        } else {
            None
        };
        self.last_request = Instant::now();
        wait
    }
}

/// TMDB API Client
pub struct TmdbClient {
    base_url: String,
    http_client: Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new())),
            api_key: api_key.into(),
        }
    }

    /// Override the API base URL (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the current popular movies list (first page)
    pub async fn fetch_popular_movies(&self) -> Result<Vec<CatalogMovie>, ApiError> {
        self.throttle().await;

        let url = format!(
            "{}/movie/popular?api_key={}&page=1",
            self.base_url, self.api_key
        );

        let response = self.http_client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        let page: PageData = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(page.results.into_iter().map(map_movie).collect())
    }

    /// Fetch a single movie by its catalog id
    pub async fn fetch_movie_by_id(&self, id: MovieId) -> Result<CatalogMovie, ApiError> {
        self.throttle().await;

        let url = format!("{}/movie/{}?api_key={}", self.base_url, id, self.api_key);

        let response = self.http_client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id));
        }
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }

        let movie: MovieData = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(map_movie(movie))
    }

    /// Rate limiting: reserve a slot under the lock, sleep outside it
    async fn throttle(&self) {
        let wait = {
            let mut limiter = self.rate_limiter.lock().unwrap();
            limiter.reserve()
        };
        if let Some(wait) = wait {
            tokio::time::sleep(wait).await;
        }
    }
}

/// Map a TMDB payload to the domain model
fn map_movie(data: MovieData) -> CatalogMovie {
    // TMDB serves unknown release dates as "" rather than null
    let release_date = data
        .release_date
        .as_deref()
        .filter(|s| !s.is_empty())
        .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok());

    let genre_ids = if !data.genre_ids.is_empty() {
        data.genre_ids
    } else {
        data.genres.into_iter().map(|g| g.id).collect()
    };

    CatalogMovie {
        id: data.id,
        title: data.title,
        original_title: data.original_title,
        original_language: data.original_language,
        overview: data.overview,
        poster_path: data.poster_path,
        backdrop_path: data.backdrop_path,
        release_date,
        genre_ids,
    }
}
