// services/records.rs
//
// The single-document operations shared by buy, sell, bittaa and profile.

use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;
use tracing::{info, warn};

use crate::error::Error;
use crate::models::image::Upload;
use crate::models::record::Record;
use crate::repository::{IdentityStore, RecordFilter, RecordStore};
use crate::services::access_guard::{Access, Operation};
use crate::services::auth_guard::SessionUser;
use crate::services::upload_reconciler::reconcile;

/// Result of a guarded operation that was not turned into a 404.
#[derive(Debug)]
pub enum Guarded<T> {
    Allowed(T),
    Redirect(&'static str),
}

fn not_found<T: Record>(id: &str) -> Error {
    Error::NotFound {
        resource: T::KIND.label(),
        id: id.to_string(),
    }
}

fn parse_id<T: Record>(id: &str) -> Result<ObjectId, Error> {
    ObjectId::parse_str(id).map_err(|_| not_found::<T>(id))
}

pub async fn list<T: Record>(store: &dyn RecordStore<T>, filter: &RecordFilter) -> Result<Vec<T>, Error> {
    Ok(store.find(filter).await?)
}

pub async fn list_by_owner<T: Record>(store: &dyn RecordStore<T>, user_id: &str) -> Result<Vec<T>, Error> {
    let owner = ObjectId::parse_str(user_id).map_err(|_| Error::NotFound {
        resource: "User",
        id: user_id.to_string(),
    })?;
    list(store, &RecordFilter::owned_by(owner)).await
}

/// Display names of the identities owning `records`, keyed by identity id.
/// Owners that no longer exist are left out.
pub async fn owner_names<T: Record>(
    identities: &dyn IdentityStore,
    records: &[T],
) -> Result<HashMap<ObjectId, String>, Error> {
    let mut ids: Vec<ObjectId> = records.iter().map(|r| r.owner()).collect();
    ids.sort();
    ids.dedup();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let owners = identities.find_many(&ids).await?;
    Ok(owners.into_iter().map(|i| (i.id, i.display_name)).collect())
}

/// Fetches a record and runs the access guard for `operation`.
pub async fn fetch_guarded<T: Record>(
    store: &dyn RecordStore<T>,
    actor: &SessionUser,
    id: &str,
    operation: Operation,
) -> Result<Guarded<T>, Error> {
    let record = store
        .find_by_id(parse_id::<T>(id)?)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;

    match T::KIND.policy().decide(actor.id, actor.role, record.owner(), operation) {
        Access::Allow => Ok(Guarded::Allowed(record)),
        Access::DenyNotFound => {
            warn!(kind = T::KIND.slug(), %id, actor = %actor.id, ?operation, "access denied");
            Err(not_found::<T>(id))
        }
        Access::DenyRedirect(target) => {
            warn!(kind = T::KIND.slug(), %id, actor = %actor.id, ?operation, "access denied");
            Ok(Guarded::Redirect(target))
        }
    }
}

pub async fn create<T: Record>(
    store: &dyn RecordStore<T>,
    actor: &SessionUser,
    fields: T::Fields,
    upload: Option<Upload>,
) -> Result<T, Error> {
    let file_name = upload.as_ref().map(|u| u.file_name.clone());
    let image = reconcile(None, upload)?;
    let record = T::create(fields, actor.id, image);

    store
        .insert(&record)
        .await
        .map_err(|e| Error::from_store(e, file_name.as_deref()))?;
    info!(kind = T::KIND.slug(), id = %record.id(), owner = %actor.id, "record created");
    Ok(record)
}

/// Writes `fields` and the reconciled image over `record`, which the caller
/// has already passed through `fetch_guarded` with `Operation::Update`.
pub async fn apply_update<T: Record>(
    store: &dyn RecordStore<T>,
    actor: &SessionUser,
    mut record: T,
    fields: T::Fields,
    upload: Option<Upload>,
) -> Result<T, Error> {
    let image = reconcile(Some(record.image().clone()), upload)?;
    record.apply(fields);
    record.set_image(image);

    let id = record.id();
    if !store.replace(&record).await? {
        return Err(not_found::<T>(&id.to_hex()));
    }
    info!(kind = T::KIND.slug(), %id, actor = %actor.id, "record updated");
    Ok(record)
}

pub async fn delete<T: Record>(store: &dyn RecordStore<T>, actor: &SessionUser, id: &str) -> Result<Guarded<()>, Error> {
    let record = match fetch_guarded(store, actor, id, Operation::Delete).await? {
        Guarded::Allowed(record) => record,
        Guarded::Redirect(target) => return Ok(Guarded::Redirect(target)),
    };

    if !store.delete(record.id()).await? {
        return Err(not_found::<T>(id));
    }
    info!(kind = T::KIND.slug(), %id, actor = %actor.id, "record deleted");
    Ok(Guarded::Allowed(()))
}
