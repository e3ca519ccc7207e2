pub mod identity_repository;
pub mod record_repository;

use std::sync::Arc;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use rocket::{Build, Rocket};
use thiserror::Error;

use crate::models::bittaa::Bittaa;
use crate::models::buy::Buy;
use crate::models::identity::{Identity, Role};
use crate::models::profile::Profile;
use crate::models::record::Record;
use crate::models::sell::Sell;

pub use identity_repository::IdentityRepository;
pub use record_repository::RecordRepository;

const DUPLICATE_KEY: i32 = 11000;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: {message}")]
    Duplicate { message: String },

    #[error(transparent)]
    Other(mongodb::error::Error),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        let duplicate = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
            ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
            _ => false,
        };
        if duplicate {
            StoreError::Duplicate { message: err.to_string() }
        } else {
            StoreError::Other(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Narrows a record listing. Results are always newest first.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub owner: Option<ObjectId>,
    /// Case-insensitive literal substring of the title field.
    pub title: Option<String>,
}

impl RecordFilter {
    pub fn all() -> Self {
        RecordFilter::default()
    }

    pub fn owned_by(owner: ObjectId) -> Self {
        RecordFilter {
            owner: Some(owner),
            title: None,
        }
    }

    pub fn title_contains(query: &str) -> Self {
        RecordFilter {
            owner: None,
            title: Some(query.to_string()),
        }
    }
}

/// Single-document CRUD over one record collection.
#[rocket::async_trait]
pub trait RecordStore<T: Record>: Send + Sync {
    async fn insert(&self, record: &T) -> Result<()>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>>;
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<T>>;
    /// Returns false when no document has the record's id.
    async fn replace(&self, record: &T) -> Result<bool>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: ObjectId) -> Result<bool>;
}

#[rocket::async_trait]
pub trait IdentityStore: Send + Sync {
    async fn insert(&self, identity: &Identity) -> Result<()>;
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Identity>>;
    /// Identities among `ids`; unknown ids are skipped.
    async fn find_many(&self, ids: &[ObjectId]) -> Result<Vec<Identity>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<Identity>>;
}

pub type Records<T> = Arc<dyn RecordStore<T>>;
pub type Identities = Arc<dyn IdentityStore>;

/// Every store the routes need, handed to Rocket as managed state.
#[derive(Clone)]
pub struct Stores {
    pub buys: Records<Buy>,
    pub sells: Records<Sell>,
    pub bittaas: Records<Bittaa>,
    pub profiles: Records<Profile>,
    pub identities: Identities,
}

impl Stores {
    pub fn mongo(client: &mongodb::Client, database_name: &str) -> Self {
        Stores {
            buys: Arc::new(RecordRepository::<Buy>::new(client, database_name)),
            sells: Arc::new(RecordRepository::<Sell>::new(client, database_name)),
            bittaas: Arc::new(RecordRepository::<Bittaa>::new(client, database_name)),
            profiles: Arc::new(RecordRepository::<Profile>::new(client, database_name)),
            identities: Arc::new(IdentityRepository::new(client, database_name)),
        }
    }

    #[cfg(test)]
    pub fn memory() -> Self {
        Stores {
            buys: Arc::new(memory::MemoryRecords::<Buy>::default()),
            sells: Arc::new(memory::MemoryRecords::<Sell>::default()),
            bittaas: Arc::new(memory::MemoryRecords::<Bittaa>::default()),
            profiles: Arc::new(memory::MemoryRecords::<Profile>::default()),
            identities: Arc::new(memory::MemoryIdentities::default()),
        }
    }

    pub fn manage(self, rocket: Rocket<Build>) -> Rocket<Build> {
        rocket
            .manage(self.buys)
            .manage(self.sells)
            .manage(self.bittaas)
            .manage(self.profiles)
            .manage(self.identities)
    }
}
