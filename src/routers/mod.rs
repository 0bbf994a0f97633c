use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::SongController;
use crate::db::SharedStore;

pub mod root;
pub mod song;

pub use root::health_check_route;
pub use song::{
    count_route, create_song_route, get_song_route, list_songs_route, update_song_route,
};

/// Builds the full HTTP surface around an already seeded store.
pub fn app(store: SharedStore) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_route))
        .route("/count", get(count_route))
        .route("/song", get(list_songs_route).post(create_song_route))
        .route("/song/{id}", get(get_song_route).put(update_song_route))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(SongController::new(store))
}
