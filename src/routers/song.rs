use axum::{
    body::Bytes,
    extract::{Path, State},
    response::Response,
};

use crate::controllers::SongController;

pub async fn count_route(State(controller): State<SongController>) -> Response {
    controller.count().await
}

pub async fn list_songs_route(State(controller): State<SongController>) -> Response {
    controller.list().await
}

pub async fn get_song_route(
    State(controller): State<SongController>,
    Path(id): Path<i64>,
) -> Response {
    controller.get_song(id).await
}

pub async fn create_song_route(State(controller): State<SongController>, body: Bytes) -> Response {
    controller.create_song(&body).await
}

pub async fn update_song_route(
    State(controller): State<SongController>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    controller.update_song(id, &body).await
}
