use async_trait::async_trait;
use mongodb::bson::{Bson, Document, oid::ObjectId};
use tokio::sync::RwLock;

use super::SongStore;
use crate::error::StoreResult;
use crate::models::song::{ID_FIELD, OBJECT_ID_FIELD, Song, UpdateSummary, ids_match};

/// In-process stand-in for the MongoDB collection, used by tests.
///
/// Records keep insertion order and get an `ObjectId` in `_id` unless they
/// already carry one.
#[derive(Default)]
pub struct MemoryStore {
    songs: RwLock<Vec<Song>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_object_id(mut song: Song) -> (Bson, Song) {
        let oid = match song.get(OBJECT_ID_FIELD) {
            Some(existing) => existing.clone(),
            None => Bson::ObjectId(ObjectId::new()),
        };
        // `_id` leads the document the way the server stores it
        song.remove(OBJECT_ID_FIELD);
        let mut stored = Document::new();
        stored.insert(OBJECT_ID_FIELD, oid.clone());
        for (key, value) in song {
            stored.insert(key, value);
        }
        (oid, stored)
    }

    fn matches(song: &Song, id: &Bson) -> bool {
        song.get(ID_FIELD).is_some_and(|stored| ids_match(stored, id))
    }
}

#[async_trait]
impl SongStore for MemoryStore {
    async fn count(&self) -> StoreResult<u64> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn list(&self) -> StoreResult<Vec<Song>> {
        Ok(self.songs.read().await.clone())
    }

    async fn find_by_id(&self, id: &Bson) -> StoreResult<Option<Song>> {
        let songs = self.songs.read().await;
        Ok(songs.iter().find(|song| Self::matches(song, id)).cloned())
    }

    async fn insert(&self, song: Song) -> StoreResult<Bson> {
        let (oid, stored) = Self::with_object_id(song);
        self.songs.write().await.push(stored);
        Ok(oid)
    }

    async fn update_fields(&self, id: &Bson, fields: Document) -> StoreResult<UpdateSummary> {
        let mut songs = self.songs.write().await;
        let Some(song) = songs.iter_mut().find(|song| Self::matches(song, id)) else {
            return Ok(UpdateSummary::default());
        };

        let mut changed = false;
        for (key, value) in fields {
            if song.get(&key) != Some(&value) {
                song.insert(key, value);
                changed = true;
            }
        }

        Ok(UpdateSummary {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn replace_all(&self, songs: Vec<Song>) -> StoreResult<usize> {
        let stored: Vec<Song> = songs
            .into_iter()
            .map(|song| Self::with_object_id(song).1)
            .collect();
        let inserted = stored.len();
        *self.songs.write().await = stored;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    async fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .replace_all(vec![
                doc! { "id": 1_i64, "title": "A", "artist": "X" },
                doc! { "id": 2_i64, "title": "B" },
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn replace_all_discards_previous_contents() {
        let store = seeded().await;
        store.insert(doc! { "id": 3_i64 }).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 3);

        let inserted = store.replace_all(vec![doc! { "id": 9_i64 }]).await.unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.find_by_id(&Bson::Int64(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_assigns_leading_object_id() {
        let store = MemoryStore::new();
        let oid = store.insert(doc! { "id": 5_i64, "title": "T" }).await.unwrap();
        assert!(matches!(oid, Bson::ObjectId(_)));

        let song = store.find_by_id(&Bson::Int64(5)).await.unwrap().unwrap();
        assert_eq!(song.keys().next().map(String::as_str), Some(OBJECT_ID_FIELD));
        assert_eq!(song.get(OBJECT_ID_FIELD), Some(&oid));
    }

    #[tokio::test]
    async fn find_matches_numbers_of_any_width() {
        let store = seeded().await;
        let song = store.find_by_id(&Bson::Int32(2)).await.unwrap().unwrap();
        assert_eq!(song.get_str("title").unwrap(), "B");
    }

    #[tokio::test]
    async fn update_merges_and_reports_changes() {
        let store = seeded().await;
        let summary = store
            .update_fields(&Bson::Int64(1), doc! { "title": "C" })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 1 });

        let song = store.find_by_id(&Bson::Int64(1)).await.unwrap().unwrap();
        assert_eq!(song.get_str("title").unwrap(), "C");
        assert_eq!(song.get_str("artist").unwrap(), "X");
    }

    #[tokio::test]
    async fn identical_update_modifies_nothing() {
        let store = seeded().await;
        let summary = store
            .update_fields(&Bson::Int64(1), doc! { "title": "A" })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary { matched: 1, modified: 0 });
    }

    #[tokio::test]
    async fn update_of_missing_song_matches_nothing() {
        let store = seeded().await;
        let summary = store
            .update_fields(&Bson::Int64(42), doc! { "title": "Z" })
            .await
            .unwrap();
        assert_eq!(summary, UpdateSummary::default());
    }
}
