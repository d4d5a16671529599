// src/main.rs
//
// Composition root. The favorites service is constructed once here and
// handed to whatever needs it; there is no global shared instance.

use std::sync::Arc;

use anyhow::Context;

use movielist::db::{create_connection_pool, initialize_database};
use movielist::{
    FavoriteRecord, FavoriteRepository, FavoritesService, SqliteFavoriteRepository, TmdbClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    // 1. INFRASTRUCTURE
    let pool = Arc::new(create_connection_pool()?);

    // Initialize schema (idempotent)
    {
        let conn = pool.get()?;
        initialize_database(&conn)?;
    }

    // 2. REPOSITORIES
    let favorite_repo: Arc<dyn FavoriteRepository> =
        Arc::new(SqliteFavoriteRepository::new(pool.clone()));

    // 3. SERVICES
    let favorites = Arc::new(FavoritesService::new(favorite_repo));

    // Screens would subscribe here; the CLI just logs each push
    let _subscription = favorites.subscribe(|set| {
        log::info!("favorites updated: {} movies", set.len());
    });

    // 4. COMMAND DISPATCH
    let mut args = std::env::args().skip(1);
    match args.next().as_deref() {
        None | Some("list") => {
            let set = favorites.current_favorites()?;
            if set.is_empty() {
                println!("No favorites yet.");
            }
            for record in set {
                println!("{}", record);
            }
        }
        Some("popular") => {
            let client = tmdb_client()?;
            let movies = client.fetch_popular_movies().await?;
            for movie in movies {
                println!("{}", movie);
            }
        }
        Some("toggle") => {
            let id: i64 = args
                .next()
                .context("usage: movielist toggle <movie-id>")?
                .parse()
                .context("movie id must be an integer")?;

            // Best-effort catalog lookup for display fields; a bare
            // record still favorites fine when the catalog is down
            let record = match tmdb_client() {
                Ok(client) => match client.fetch_movie_by_id(id).await {
                    Ok(movie) => FavoriteRecord::from(&movie),
                    Err(e) => {
                        log::warn!("catalog lookup for {} failed: {}", id, e);
                        FavoriteRecord::new(id, None, None)
                    }
                },
                Err(_) => FavoriteRecord::new(id, None, None),
            };

            let now_favorite = favorites.toggle(record)?;
            if now_favorite {
                println!("Added #{} to favorites.", id);
            } else {
                println!("Removed #{} from favorites.", id);
            }
        }
        Some(other) => {
            anyhow::bail!("unknown command {:?} (expected: list | popular | toggle <id>)", other);
        }
    }

    Ok(())
}

fn tmdb_client() -> anyhow::Result<TmdbClient> {
    let api_key =
        std::env::var("TMDB_API_KEY").context("TMDB_API_KEY is not set; catalog unavailable")?;
    Ok(TmdbClient::new(api_key))
}
