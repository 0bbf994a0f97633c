use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::{Bson, Document};

use crate::error::StoreResult;
use crate::models::song::{Song, UpdateSummary};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::Database;

/// Operations the song handlers need from the document store.
///
/// `id` arguments are matched against each record's `id` field, not `_id`.
#[async_trait]
pub trait SongStore: Send + Sync + 'static {
    async fn count(&self) -> StoreResult<u64>;

    /// Every record, in storage iteration order.
    async fn list(&self) -> StoreResult<Vec<Song>>;

    async fn find_by_id(&self, id: &Bson) -> StoreResult<Option<Song>>;

    /// Inserts `song` as given and returns the generated `_id`.
    async fn insert(&self, song: Song) -> StoreResult<Bson>;

    /// Merges `fields` into the record with the given `id`, like a `$set`.
    /// `fields` must not be empty.
    async fn update_fields(&self, id: &Bson, fields: Document) -> StoreResult<UpdateSummary>;

    /// Drops the collection and inserts `songs` in order. Returns how many were inserted.
    async fn replace_all(&self, songs: Vec<Song>) -> StoreResult<usize>;
}

pub type SharedStore = Arc<dyn SongStore>;
