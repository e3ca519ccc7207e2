// models/profile.rs

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;
use crate::models::record::{show, FormField, PaymentStatus, Record, ResourceKind};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub image: StoredImage,
    pub status: PaymentStatus,
    pub user: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProfileFields {
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
}

impl Record for Profile {
    type Fields = ProfileFields;

    const KIND: ResourceKind = ResourceKind::Profile;

    fn create(fields: ProfileFields, owner: ObjectId, image: StoredImage) -> Self {
        Profile {
            id: ObjectId::new(),
            full_name: fields.full_name,
            phone: fields.phone,
            address: fields.address,
            bio: fields.bio,
            image,
            status: PaymentStatus::default(),
            user: owner,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, fields: ProfileFields) {
        self.full_name = fields.full_name;
        self.phone = fields.phone;
        self.address = fields.address;
        self.bio = fields.bio;
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn owner(&self) -> ObjectId {
        self.user
    }

    fn title(&self) -> &str {
        &self.full_name
    }

    fn image(&self) -> &StoredImage {
        &self.image
    }

    fn set_image(&mut self, image: StoredImage) {
        self.image = image;
    }

    fn status(&self) -> PaymentStatus {
        self.status
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Phone", show(&self.phone)),
            ("Address", show(&self.address)),
            ("Bio", show(&self.bio)),
        ]
    }

    fn form_fields(existing: Option<&Self>) -> Vec<FormField> {
        vec![
            FormField::text("full_name", "Full name", existing.map(|p| p.full_name.as_str())).required(),
            FormField::text("phone", "Phone", existing.and_then(|p| p.phone.as_deref())),
            FormField::text("address", "Address", existing.and_then(|p| p.address.as_deref())),
            FormField::text("bio", "Bio", existing.and_then(|p| p.bio.as_deref())),
        ]
    }
}
