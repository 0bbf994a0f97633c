use serde_json::Value;
use tracing::info;

use crate::db::SongStore;
use crate::error::{StoreError, StoreResult};
use crate::models::song::{ID_FIELD, Song, json_to_song};

/// Songs loaded into the collection on every startup.
pub const SEED_SONGS: &str = include_str!("../data/songs.json");

/// Parses a seed dataset: a JSON array of objects that each carry an `id`.
pub fn parse_seed(raw: &str) -> StoreResult<Vec<Song>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::Seed(e.to_string()))?;
    let Value::Array(entries) = value else {
        return Err(StoreError::Seed("expected a JSON array of songs".to_string()));
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(fields) if fields.contains_key(ID_FIELD) => json_to_song(fields),
            Value::Object(_) => Err(StoreError::Seed(format!("entry {} has no id", index))),
            _ => Err(StoreError::Seed(format!("entry {} is not an object", index))),
        })
        .collect()
}

/// Drops whatever the store holds and loads the bundled dataset.
pub async fn reseed(store: &dyn SongStore) -> StoreResult<usize> {
    let songs = parse_seed(SEED_SONGS)?;
    let inserted = store.replace_all(songs).await?;
    info!("Seeded {} songs", inserted);
    Ok(inserted)
}
