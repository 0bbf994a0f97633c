use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection,
    bson::{Bson, Document, doc},
};
use tracing::debug;

use super::SongStore;
use crate::error::StoreResult;
use crate::models::song::{Song, UpdateSummary};

pub const DATABASE_NAME: &str = "songs";
pub const COLLECTION_NAME: &str = "songs";

#[derive(Clone)]
pub struct Database {
    client: Client,
    songs: Collection<Document>,
}

impl Database {
    pub async fn new(url: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(url).await?;
        let songs = client.database(DATABASE_NAME).collection(COLLECTION_NAME);
        Ok(Self { client, songs })
    }

    /// Round-trips a `ping` so bad hosts or credentials surface at startup.
    pub async fn ping(&self) -> StoreResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SongStore for Database {
    async fn count(&self) -> StoreResult<u64> {
        Ok(self.songs.count_documents(doc! {}).await?)
    }

    async fn list(&self) -> StoreResult<Vec<Song>> {
        let cursor = self.songs.find(doc! {}).await?;
        Ok(cursor.try_collect::<Vec<_>>().await?)
    }

    async fn find_by_id(&self, id: &Bson) -> StoreResult<Option<Song>> {
        Ok(self.songs.find_one(doc! { "id": id.clone() }).await?)
    }

    async fn insert(&self, song: Song) -> StoreResult<Bson> {
        let result = self.songs.insert_one(song).await?;
        Ok(result.inserted_id)
    }

    async fn update_fields(&self, id: &Bson, fields: Document) -> StoreResult<UpdateSummary> {
        let result = self
            .songs
            .update_one(doc! { "id": id.clone() }, doc! { "$set": fields })
            .await?;
        Ok(UpdateSummary {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn replace_all(&self, songs: Vec<Song>) -> StoreResult<usize> {
        self.songs.drop().await?;
        if songs.is_empty() {
            return Ok(0);
        }
        let result = self.songs.insert_many(songs).await?;
        debug!("inserted {} seed documents", result.inserted_ids.len());
        Ok(result.inserted_ids.len())
    }
}
