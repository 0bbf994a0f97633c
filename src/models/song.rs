use mongodb::bson::{self, Bson, Document};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreResult;

/// A stored song: freeform fields plus `id` and the store's `_id`.
pub type Song = Document;

pub const ID_FIELD: &str = "id";
pub const OBJECT_ID_FIELD: &str = "_id";

/// Matched/modified counts reported by a `$set` merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateSummary {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: u64,
}

#[derive(Serialize)]
pub struct SongsResponse {
    pub songs: Vec<Value>,
}

/// Renders a song as relaxed extended JSON, so `_id` becomes `{"$oid": "..."}`.
pub fn song_to_json(song: Song) -> Value {
    Bson::Document(song).into_relaxed_extjson()
}

/// Same rendering for a single BSON value such as an inserted `_id`.
pub fn bson_to_json(value: Bson) -> Value {
    value.into_relaxed_extjson()
}

pub fn json_to_song(fields: &Map<String, Value>) -> StoreResult<Song> {
    Ok(bson::to_document(fields)?)
}

pub fn json_to_bson(value: &Value) -> StoreResult<Bson> {
    Ok(bson::to_bson(value)?)
}

/// Text used for an id inside response messages: strings bare, everything else as JSON.
pub fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Equality the way the store compares an `id` filter: numbers by value across
/// integer and floating point types, everything else structurally.
pub fn ids_match(stored: &Bson, wanted: &Bson) -> bool {
    match (as_number(stored), as_number(wanted)) {
        (Some(a), Some(b)) => a == b,
        _ => stored == wanted,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId};
    use serde_json::json;

    #[test]
    fn object_id_renders_as_oid() {
        let oid = ObjectId::new();
        let song = doc! { "_id": oid, "id": 7_i64, "title": "Blue" };
        assert_eq!(
            song_to_json(song),
            json!({ "_id": { "$oid": oid.to_hex() }, "id": 7, "title": "Blue" })
        );
    }

    #[test]
    fn json_integers_stay_integers() {
        let body = json!({ "id": 3, "rating": 4.5, "tags": ["a", "b"] });
        let song = json_to_song(body.as_object().unwrap()).unwrap();
        assert_eq!(song.get("id"), Some(&Bson::Int64(3)));
        assert_eq!(song_to_json(song), body);
    }

    #[test]
    fn oversized_unsigned_is_rejected() {
        let body = json!({ "id": u64::MAX });
        assert!(json_to_song(body.as_object().unwrap()).is_err());
    }

    #[test]
    fn numeric_ids_match_across_types() {
        assert!(ids_match(&Bson::Int32(5), &Bson::Int64(5)));
        assert!(ids_match(&Bson::Double(5.0), &Bson::Int64(5)));
        assert!(!ids_match(&Bson::Int64(5), &Bson::String("5".into())));
        assert!(ids_match(&Bson::String("x".into()), &Bson::String("x".into())));
    }

    #[test]
    fn display_id_strips_quotes() {
        assert_eq!(display_id(&json!(12)), "12");
        assert_eq!(display_id(&json!("abc")), "abc");
    }
}
