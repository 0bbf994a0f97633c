use thiserror::Error;

/// Failures raised by a [`crate::db::SongStore`] implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Driver, connection or server-side errors
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A JSON value could not be turned into a BSON document
    #[error("Document encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    /// The bundled seed dataset is malformed
    #[error("Invalid seed data: {0}")]
    Seed(String),
}

/// Startup configuration errors. Always fatal.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
