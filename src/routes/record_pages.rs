// routes/record_pages.rs
//
// HTTP side of the record operations, shared by the four resource modules.

use rocket::form::{self, error::ErrorKind};
use rocket::fs::TempFile;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::Either;

use crate::config::AppConfig;
use crate::error::{Error, JsonError};
use crate::models::record::{clean, Record};
use crate::repository::{Identities, RecordFilter, Records};
use crate::services::access_guard::Operation;
use crate::services::auth_guard::SessionUser;
use crate::services::records::{self, Guarded};
use crate::services::upload_reconciler;
use crate::views::{render, RecordFormPage, RecordIndexPage, RecordShowPage};

pub type Page = Result<RawHtml<String>, Error>;
pub type GuardedPage = Result<Either<RawHtml<String>, Redirect>, Error>;

/// A trimmed, non-blank form value or a validation error naming the field.
pub fn required(value: Option<String>, label: &str) -> Result<String, Error> {
    clean(value).ok_or_else(|| Error::validation(format!("{label} is required")))
}

/// An optional form field that must parse when present. Only an absent field
/// is `None`; an oversized or malformed one is a validation error.
pub fn optional<T>(value: form::Result<'_, T>, label: &str) -> Result<Option<T>, Error> {
    let errors = match value {
        Ok(value) => return Ok(Some(value)),
        Err(errors) => errors,
    };
    if errors.iter().all(|e| matches!(e.kind, ErrorKind::Missing)) {
        return Ok(None);
    }
    if errors.iter().any(|e| matches!(e.kind, ErrorKind::InvalidLength { .. })) {
        return Err(Error::validation(format!("{label} is too large")));
    }
    Err(Error::validation(format!("Invalid {label}")))
}

fn plural<T: Record>() -> String {
    format!("{}s", T::KIND.label())
}

pub fn add_page<T: Record>() -> Page {
    render(&RecordFormPage::add::<T>())
}

async fn render_index<T: Record>(identities: &Identities, heading: String, found: &[T]) -> Page {
    let owners = records::owner_names(identities.as_ref(), found).await?;
    render(&RecordIndexPage::new(heading, found, &owners))
}

pub async fn index_page<T: Record>(
    store: &Records<T>,
    identities: &Identities,
    filter: RecordFilter,
    heading: String,
) -> Page {
    let found = records::list(store.as_ref(), &filter).await?;
    render_index(identities, heading, &found).await
}

pub async fn list_all_page<T: Record>(store: &Records<T>, identities: &Identities) -> Page {
    index_page(store, identities, RecordFilter::all(), format!("All {}", plural::<T>())).await
}

pub async fn list_own_page<T: Record>(store: &Records<T>, identities: &Identities, user: &SessionUser) -> Page {
    index_page(store, identities, RecordFilter::owned_by(user.id), format!("My {}", plural::<T>())).await
}

pub async fn search_page<T: Record>(store: &Records<T>, identities: &Identities, query: &str) -> Page {
    index_page(
        store,
        identities,
        RecordFilter::title_contains(query),
        format!("{} matching \"{query}\"", plural::<T>()),
    )
    .await
}

pub async fn by_owner_page<T: Record>(store: &Records<T>, identities: &Identities, user_id: &str) -> Page {
    let found = records::list_by_owner(store.as_ref(), user_id).await?;
    render_index(identities, plural::<T>(), &found).await
}

pub async fn show_page<T: Record>(
    store: &Records<T>,
    identities: &Identities,
    user: &SessionUser,
    id: &str,
) -> GuardedPage {
    match records::fetch_guarded(store.as_ref(), user, id, Operation::Show).await? {
        Guarded::Allowed(record) => {
            let owners = records::owner_names(identities.as_ref(), std::slice::from_ref(&record)).await?;
            Ok(Either::Left(render(&RecordShowPage::new(&record, &owners))?))
        }
        Guarded::Redirect(target) => Ok(Either::Right(Redirect::to(target))),
    }
}

pub async fn edit_page<T: Record>(store: &Records<T>, user: &SessionUser, id: &str) -> GuardedPage {
    match records::fetch_guarded(store.as_ref(), user, id, Operation::Edit).await? {
        Guarded::Allowed(record) => Ok(Either::Left(render(&RecordFormPage::edit(&record))?)),
        Guarded::Redirect(target) => Ok(Either::Right(Redirect::to(target))),
    }
}

pub async fn create<T: Record>(
    store: &Records<T>,
    user: &SessionUser,
    fields: T::Fields,
    mut image: Option<TempFile<'_>>,
    config: &AppConfig,
) -> Result<Redirect, JsonError> {
    let upload = upload_reconciler::stage(image.as_mut(), config).await?;
    records::create(store.as_ref(), user, fields, upload).await?;
    Ok(Redirect::to(T::KIND.listing()))
}

pub async fn update<T: Record>(
    store: &Records<T>,
    user: &SessionUser,
    id: &str,
    fields: T::Fields,
    mut image: Option<TempFile<'_>>,
    config: &AppConfig,
) -> Result<Redirect, Error> {
    let record = match records::fetch_guarded(store.as_ref(), user, id, Operation::Update).await? {
        Guarded::Allowed(record) => record,
        Guarded::Redirect(target) => return Ok(Redirect::to(target)),
    };

    let upload = upload_reconciler::stage(image.as_mut(), config).await?;
    records::apply_update(store.as_ref(), user, record, fields, upload).await?;
    Ok(Redirect::to(T::KIND.listing()))
}

pub async fn delete<T: Record>(store: &Records<T>, user: &SessionUser, id: &str) -> Result<Redirect, Error> {
    match records::delete(store.as_ref(), user, id).await? {
        Guarded::Allowed(()) => Ok(Redirect::to(T::KIND.listing())),
        Guarded::Redirect(target) => Ok(Redirect::to(target)),
    }
}
