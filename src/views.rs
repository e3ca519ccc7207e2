//! Askama page templates. Files live under `templates/`.

use std::collections::HashMap;

use askama::Template;
use mongodb::bson::oid::ObjectId;
use rocket::response::content::RawHtml;

use crate::error::Error;
use crate::models::identity::Identity;
use crate::models::record::{FormField, Record};

pub fn render<T: Template>(page: &T) -> Result<RawHtml<String>, Error> {
    Ok(RawHtml(page.render()?))
}

/// One record flattened for display.
#[derive(Debug, Clone)]
pub struct RecordRow {
    pub id: String,
    pub title: String,
    pub owner: String,
    pub owner_name: String,
    pub status: &'static str,
    pub created_at: String,
    pub image_src: String,
    pub details: Vec<(&'static str, String)>,
}

/// Owner display names, keyed by identity id.
pub type OwnerNames = HashMap<ObjectId, String>;

impl RecordRow {
    pub fn from_record<T: Record>(record: &T, owners: &OwnerNames) -> Self {
        RecordRow {
            id: record.id().to_hex(),
            title: record.title().to_string(),
            owner: record.owner().to_hex(),
            owner_name: owners
                .get(&record.owner())
                .cloned()
                .unwrap_or_else(|| "Unknown user".to_string()),
            status: record.status().as_str(),
            created_at: record.created_at().format("%Y-%m-%d %H:%M").to_string(),
            image_src: record.image().data_uri(),
            details: record.details(),
        }
    }
}

impl FormField {
    pub fn is_select(&self) -> bool {
        !self.options.is_empty()
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.value == option
    }
}

#[derive(Template)]
#[template(path = "records/index.html")]
pub struct RecordIndexPage {
    pub label: &'static str,
    pub slug: &'static str,
    pub heading: String,
    pub rows: Vec<RecordRow>,
}

impl RecordIndexPage {
    pub fn new<T: Record>(heading: String, records: &[T], owners: &OwnerNames) -> Self {
        RecordIndexPage {
            label: T::KIND.label(),
            slug: T::KIND.slug(),
            heading,
            rows: records.iter().map(|r| RecordRow::from_record(r, owners)).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "records/show.html")]
pub struct RecordShowPage {
    pub label: &'static str,
    pub slug: &'static str,
    pub row: RecordRow,
}

impl RecordShowPage {
    pub fn new<T: Record>(record: &T, owners: &OwnerNames) -> Self {
        RecordShowPage {
            label: T::KIND.label(),
            slug: T::KIND.slug(),
            row: RecordRow::from_record(record, owners),
        }
    }
}

/// Add and edit forms. Edit forms post back to `/<slug>/<id>` and show the
/// current image; the file input is only required on add.
#[derive(Template)]
#[template(path = "records/form.html")]
pub struct RecordFormPage {
    pub label: &'static str,
    pub action: String,
    pub fields: Vec<FormField>,
    pub image_src: String,
    pub image_required: bool,
}

impl RecordFormPage {
    pub fn add<T: Record>() -> Self {
        RecordFormPage {
            label: T::KIND.label(),
            action: format!("/{}", T::KIND.slug()),
            fields: T::form_fields(None),
            image_src: String::new(),
            image_required: true,
        }
    }

    pub fn edit<T: Record>(record: &T) -> Self {
        RecordFormPage {
            label: T::KIND.label(),
            action: format!("/{}/{}", T::KIND.slug(), record.id().to_hex()),
            fields: T::form_fields(Some(record)),
            image_src: record.image().data_uri(),
            image_required: false,
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub heading: &'static str,
    pub name: String,
    pub links: Vec<(&'static str, &'static str)>,
}

#[derive(Template)]
#[template(path = "accounts/login.html")]
pub struct LoginPage {
    pub error: String,
}

#[derive(Template)]
#[template(path = "accounts/register.html")]
pub struct RegisterPage {
    pub roles: &'static [&'static str],
}

#[derive(Debug, Clone)]
pub struct IdentityRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_src: String,
}

impl From<&Identity> for IdentityRow {
    fn from(identity: &Identity) -> Self {
        IdentityRow {
            id: identity.id.to_hex(),
            name: identity.display_name.clone(),
            email: identity.email.clone(),
            image_src: identity.image.as_ref().map(|i| i.data_uri()).unwrap_or_default(),
        }
    }
}

#[derive(Template)]
#[template(path = "accounts/workers.html")]
pub struct WorkersPage {
    pub workers: Vec<IdentityRow>,
}

#[derive(Template)]
#[template(path = "error/404.html")]
pub struct NotFoundPage;

#[derive(Template)]
#[template(path = "error/500.html")]
pub struct ServerErrorPage;

pub fn not_found_page() -> RawHtml<String> {
    render(&NotFoundPage).unwrap_or_else(|_| RawHtml("<h1>Not Found</h1>".to_string()))
}

pub fn server_error_page() -> RawHtml<String> {
    render(&ServerErrorPage).unwrap_or_else(|_| RawHtml("<h1>Something went wrong</h1>".to_string()))
}
