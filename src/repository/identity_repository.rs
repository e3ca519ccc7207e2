// src/repository/identity_repository.rs
use futures::stream::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::{info, instrument};

use crate::models::identity::{Identity, Role};
use crate::repository::{IdentityStore, Result};

pub struct IdentityRepository {
    collection: Collection<Identity>,
}

impl IdentityRepository {
    pub fn new(client: &Client, database_name: &str) -> Self {
        let db = client.database(database_name);
        let collection = db.collection::<Identity>("users");
        IdentityRepository { collection }
    }

    /// Unique email index; a second registration surfaces as a duplicate.
    pub async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index, None).await?;
        info!("identity indexes ready");
        Ok(())
    }
}

#[rocket::async_trait]
impl IdentityStore for IdentityRepository {
    #[instrument(skip(self, identity), fields(email = %identity.email))]
    async fn insert(&self, identity: &Identity) -> Result<()> {
        self.collection.insert_one(identity, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Identity>> {
        let identity = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(identity)
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn find_many(&self, ids: &[ObjectId]) -> Result<Vec<Identity>> {
        let mut cursor = self.collection.find(doc! { "_id": { "$in": ids.to_vec() } }, None).await?;
        let mut identities = Vec::new();
        while let Some(identity) = cursor.try_next().await? {
            identities.push(identity);
        }
        Ok(identities)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Identity>> {
        let filter = doc! { "email": email.trim().to_lowercase() };
        let identity = self.collection.find_one(filter, None).await?;
        Ok(identity)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<Identity>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let mut cursor = self.collection.find(doc! { "role": role.as_str() }, options).await?;
        let mut identities = Vec::new();
        while let Some(identity) = cursor.try_next().await? {
            identities.push(identity);
        }
        Ok(identities)
    }
}
