use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use thiserror::Error;

pub type MongoResult<T> = std::result::Result<T, MongoDaoError>;

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("failed to parse MongoDB connection URI `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: MongoError,
    },
    #[error("missing environment variable `{var}`")]
    MissingEnvVar { var: &'static str },
    #[error("failed to build MongoDB client from options")]
    ClientConstruction {
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping failed during initial connection after {attempts} attempt(s)")]
    InitialPing {
        attempts: u32,
        #[source]
        source: MongoError,
    },
    #[error("MongoDB ping health check failed")]
    HealthPing {
        #[source]
        source: MongoError,
    },
    #[error("failed to ensure index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to load `{id}` from `{collection}`")]
    Load {
        collection: &'static str,
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to list `{collection}`")]
    List {
        collection: &'static str,
        #[source]
        source: MongoError,
    },
    #[error("failed to save `{id}` into `{collection}`")]
    Save {
        collection: &'static str,
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("failed to delete `{id}` from `{collection}`")]
    Delete {
        collection: &'static str,
        id: String,
        #[source]
        source: MongoError,
    },
    #[error("duplicate key for `{id}` in `{collection}`")]
    Duplicate {
        collection: &'static str,
        id: String,
    },
    #[error("document `{id}` in `{collection}` holds an invalid identifier")]
    InvalidDocument {
        collection: &'static str,
        id: String,
        #[source]
        source: uuid::Error,
    },
}

impl MongoDaoError {
    /// Map an insert failure, turning duplicate key violations into [`MongoDaoError::Duplicate`].
    pub fn from_insert(collection: &'static str, id: String, source: MongoError) -> Self {
        match source.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                MongoDaoError::Duplicate { collection, id }
            }
            _ => MongoDaoError::Save {
                collection,
                id,
                source,
            },
        }
    }
}
