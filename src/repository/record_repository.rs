use futures::stream::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use tracing::instrument;

use crate::models::record::Record;
use crate::repository::{RecordFilter, RecordStore, Result};

pub struct RecordRepository<T: Record> {
    collection: Collection<T>,
}

impl<T: Record> RecordRepository<T> {
    pub fn new(client: &Client, database_name: &str) -> Self {
        let db = client.database(database_name);
        let collection = db.collection::<T>(T::KIND.collection());
        RecordRepository { collection }
    }
}

/// Escapes regex metacharacters so a search query matches literally.
pub fn escape_regex(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if "\\^$.|?*+()[]{}-/".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn filter_document<T: Record>(filter: &RecordFilter) -> Document {
    let mut document = doc! {};
    if let Some(owner) = filter.owner {
        document.insert("user", owner);
    }
    if let Some(title) = &filter.title {
        document.insert(
            T::KIND.title_field(),
            doc! { "$regex": escape_regex(title), "$options": "i" },
        );
    }
    document
}

#[rocket::async_trait]
impl<T: Record> RecordStore<T> for RecordRepository<T> {
    #[instrument(skip(self, record), fields(kind = T::KIND.slug()))]
    async fn insert(&self, record: &T) -> Result<()> {
        self.collection.insert_one(record, None).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<T>> {
        let record = self.collection.find_one(doc! { "_id": id }, None).await?;
        Ok(record)
    }

    #[instrument(skip(self), fields(kind = T::KIND.slug()))]
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<T>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let mut cursor = self.collection.find(filter_document::<T>(filter), options).await?;
        let mut records = Vec::new();
        while let Some(record) = cursor.try_next().await? {
            records.push(record);
        }
        Ok(records)
    }

    #[instrument(skip(self, record), fields(kind = T::KIND.slug(), id = %record.id()))]
    async fn replace(&self, record: &T) -> Result<bool> {
        let result = self
            .collection
            .replace_one(doc! { "_id": record.id() }, record, None)
            .await?;
        Ok(result.matched_count > 0)
    }

    #[instrument(skip(self), fields(kind = T::KIND.slug()))]
    async fn delete(&self, id: ObjectId) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
