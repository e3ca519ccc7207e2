// models/buy.rs

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;
use crate::models::record::{show, FormField, PaymentStatus, Record, ResourceKind};

/// Produce bought from a farmer or trader.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Buy {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub seller: Option<String>,
    pub phone: Option<String>,
    pub kilogram: Option<String>, // free text, see DESIGN.md
    pub amount: String,
    pub note: Option<String>,
    pub image: StoredImage,
    pub status: PaymentStatus,
    pub user: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BuyFields {
    pub name: String,
    pub seller: Option<String>,
    pub phone: Option<String>,
    pub kilogram: Option<String>,
    pub amount: String,
    pub note: Option<String>,
    pub status: PaymentStatus,
}

impl Record for Buy {
    type Fields = BuyFields;

    const KIND: ResourceKind = ResourceKind::Buy;

    fn create(fields: BuyFields, owner: ObjectId, image: StoredImage) -> Self {
        Buy {
            id: ObjectId::new(),
            name: fields.name,
            seller: fields.seller,
            phone: fields.phone,
            kilogram: fields.kilogram,
            amount: fields.amount,
            note: fields.note,
            image,
            status: fields.status,
            user: owner,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, fields: BuyFields) {
        self.name = fields.name;
        self.seller = fields.seller;
        self.phone = fields.phone;
        self.kilogram = fields.kilogram;
        self.amount = fields.amount;
        self.note = fields.note;
        self.status = fields.status;
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn owner(&self) -> ObjectId {
        self.user
    }

    fn title(&self) -> &str {
        &self.name
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
            ("Seller", show(&self.seller)),
            ("Phone", show(&self.phone)),
            ("Kilogram", show(&self.kilogram)),
            ("Amount", self.amount.clone()),
            ("Note", show(&self.note)),
        ]
    }

    fn form_fields(existing: Option<&Self>) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|b| b.name.as_str())).required(),
            FormField::text("seller", "Seller", existing.and_then(|b| b.seller.as_deref())),
            FormField::text("phone", "Phone", existing.and_then(|b| b.phone.as_deref())),
            FormField::text("kilogram", "Kilogram", existing.and_then(|b| b.kilogram.as_deref())),
            FormField::text("amount", "Amount", existing.map(|b| b.amount.as_str())).required(),
            FormField::text("note", "Note", existing.and_then(|b| b.note.as_deref())),
            FormField::select(
                "status",
                "Status",
                existing.map(|b| b.status).unwrap_or_default().as_str(),
                PaymentStatus::ALL,
            ),
        ]
    }
}
