// models/identity.rs

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rocket::FromFormField;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;

#[derive(Serialize, Deserialize, FromFormField, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[field(value = "admin")]
    Admin,
    #[field(value = "worker")]
    Worker,
    #[default]
    #[field(value = "user")]
    User,
}

impl Role {
    pub const ALL: &'static [&'static str] = &["admin", "worker", "user"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Worker => "worker",
            Role::User => "user",
        }
    }

    /// Admins and workers pass the staff gate.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Worker)
    }

    /// Landing page after login.
    pub fn home(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Worker => "/homeworker",
            Role::User => "/home",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Identity {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String, // unique index, see IdentityRepository::ensure_indexes
    pub display_name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Role,
    pub password_hash: String,
    pub image: Option<StoredImage>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Identity {
    pub fn new(email: String, display_name: String, role: Role, password_hash: String) -> Self {
        Identity {
            id: ObjectId::new(),
            email: email.trim().to_lowercase(),
            display_name,
            first_name: None,
            last_name: None,
            role,
            password_hash,
            image: None,
            created_at: Utc::now(),
        }
    }

    pub fn first_name_or_display(&self) -> &str {
        self.first_name.as_deref().unwrap_or(&self.display_name)
    }
}
