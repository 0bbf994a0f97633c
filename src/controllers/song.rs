use axum::{
    extract::Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::Bson;
use serde_json::{Map, Value, json};
use tracing::{debug, error, info, warn};

use crate::{
    db::SharedStore,
    error::StoreError,
    models::song::{
        CountResponse, ID_FIELD, SongsResponse, bson_to_json, display_id, json_to_bson,
        json_to_song, song_to_json,
    },
};

/// Request handling for the song collection. Cloned into every request as router state.
#[derive(Clone)]
pub struct SongController {
    store: SharedStore,
}

fn message(status: StatusCode, key: &str, text: impl Into<String>) -> Response {
    let mut body = Map::new();
    body.insert(key.to_string(), Value::String(text.into()));
    (status, Json(Value::Object(body))).into_response()
}

fn error_response(status: StatusCode, text: &str) -> Response {
    message(status, "error", text)
}

/// Parses a request body that has to be a JSON object.
fn parse_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Some(fields),
        Ok(_) => None,
        Err(e) => {
            debug!("Rejecting request body: {}", e);
            None
        }
    }
}

impl SongController {
    pub fn new(store: SharedStore) -> Self {
        SongController { store }
    }

    pub async fn count(&self) -> Response {
        match self.store.count().await {
            Ok(count) => (StatusCode::OK, Json(CountResponse { count })).into_response(),
            Err(e) => {
                error!("Database error: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve count")
            }
        }
    }

    pub async fn list(&self) -> Response {
        match self.store.list().await {
            Ok(songs) => {
                let songs = songs.into_iter().map(song_to_json).collect();
                (StatusCode::OK, Json(SongsResponse { songs })).into_response()
            }
            Err(e) => {
                error!("Error retrieving songs: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to retrieve songs")
            }
        }
    }

    pub async fn get_song(&self, id: i64) -> Response {
        match self.store.find_by_id(&Bson::Int64(id)).await {
            Ok(Some(song)) => (StatusCode::OK, Json(song_to_json(song))).into_response(),
            Ok(None) => message(
                StatusCode::NOT_FOUND,
                "message",
                format!("song with id {} not found", id),
            ),
            Err(e) => {
                error!("Error retrieving song by ID {}: {}", id, e);
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred",
                )
            }
        }
    }

    /// Inserts a new song unless one with the same `id` exists.
    ///
    /// The existence check and the insert are separate store calls, so two
    /// concurrent creates with the same `id` can both succeed.
    pub async fn create_song(&self, body: &[u8]) -> Response {
        let fields = match parse_object(body) {
            Some(fields) if fields.contains_key(ID_FIELD) => fields,
            _ => {
                return error_response(StatusCode::BAD_REQUEST, "Invalid or missing song data");
            }
        };
        let song_id = fields[ID_FIELD].clone();

        let (song, id_filter) = match (json_to_song(&fields), json_to_bson(&song_id)) {
            (Ok(song), Ok(id_filter)) => (song, id_filter),
            (Err(e), _) | (_, Err(e)) => {
                warn!("Rejecting song that cannot be stored: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Invalid or missing song data");
            }
        };

        let creation_failed = |e: StoreError| {
            error!("Error creating song: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred during creation",
            )
        };

        match self.store.find_by_id(&id_filter).await {
            Ok(Some(_)) => {
                return message(
                    StatusCode::FOUND,
                    "Message",
                    format!("song with id {} already present", display_id(&song_id)),
                );
            }
            Ok(None) => {}
            Err(e) => return creation_failed(e),
        }

        match self.store.insert(song).await {
            Ok(inserted_id) => {
                info!("Created song with id {}", display_id(&song_id));
                (
                    StatusCode::CREATED,
                    Json(json!({ "inserted id": bson_to_json(inserted_id) })),
                )
                    .into_response()
            }
            Err(e) => creation_failed(e),
        }
    }

    /// Merges the body into the song with the path `id`. An `id` in the body is dropped.
    pub async fn update_song(&self, id: i64, body: &[u8]) -> Response {
        let Some(mut fields) = parse_object(body) else {
            return error_response(StatusCode::BAD_REQUEST, "Missing update data in request body");
        };
        fields.remove(ID_FIELD);

        let update = match json_to_song(&fields) {
            Ok(update) => update,
            Err(e) => {
                warn!("Rejecting update for song {}: {}", id, e);
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "Missing update data in request body",
                );
            }
        };

        let update_failed = |e: StoreError| {
            error!("Error updating song by ID {}: {}", id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred during update",
            )
        };
        let filter = Bson::Int64(id);

        // An empty `$set` is rejected by the server, so answer from a lookup instead
        let modified = if update.is_empty() {
            match self.store.find_by_id(&filter).await {
                Ok(Some(_)) => false,
                Ok(None) => return message(StatusCode::NOT_FOUND, "message", "song not found"),
                Err(e) => return update_failed(e),
            }
        } else {
            match self.store.update_fields(&filter, update).await {
                Ok(summary) if summary.matched == 0 => {
                    return message(StatusCode::NOT_FOUND, "message", "song not found");
                }
                Ok(summary) => summary.modified > 0,
                Err(e) => return update_failed(e),
            }
        };

        if !modified {
            return message(StatusCode::OK, "message", "song found, but nothing updated");
        }

        match self.store.find_by_id(&filter).await {
            Ok(Some(song)) => {
                info!("Updated song with id {}", id);
                (StatusCode::CREATED, Json(song_to_json(song))).into_response()
            }
            Ok(None) => message(StatusCode::NOT_FOUND, "message", "song not found"),
            Err(e) => update_failed(e),
        }
    }
}
