// models/sell.rs

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;
use crate::models::record::{show, FormField, PaymentStatus, Record, ResourceKind};

/// Produce sold to a buyer, optionally loaded onto a car.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Sell {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub seller: String,
    pub buyer_name: String,
    pub phone: Option<String>,
    pub kilogram: Option<String>,
    pub amount: String,
    pub note: Option<String>,
    pub car_id: Option<String>,
    pub image: StoredImage,
    pub status: PaymentStatus,
    pub user: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SellFields {
    pub seller: String,
    pub buyer_name: Option<String>,
    pub phone: Option<String>,
    pub kilogram: Option<String>,
    pub amount: String,
    pub note: Option<String>,
    pub car_id: Option<String>,
    pub status: PaymentStatus,
}

impl Record for Sell {
    type Fields = SellFields;

    const KIND: ResourceKind = ResourceKind::Sell;

    fn create(fields: SellFields, owner: ObjectId, image: StoredImage) -> Self {
        Sell {
            id: ObjectId::new(),
            seller: fields.seller,
            buyer_name: fields.buyer_name.unwrap_or_default(),
            phone: fields.phone,
            kilogram: fields.kilogram,
            amount: fields.amount,
            note: fields.note,
            car_id: fields.car_id,
            image,
            status: fields.status,
            user: owner,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, fields: SellFields) {
        self.seller = fields.seller;
        self.buyer_name = fields.buyer_name.unwrap_or_default();
        self.phone = fields.phone;
        self.kilogram = fields.kilogram;
        self.amount = fields.amount;
        self.note = fields.note;
        self.car_id = fields.car_id;
        self.status = fields.status;
    }

    fn id(&self) -> ObjectId {
        self.id
    }

    fn owner(&self) -> ObjectId {
        self.user
    }

    fn title(&self) -> &str {
        &self.buyer_name
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
            ("Seller", self.seller.clone()),
            ("Phone", show(&self.phone)),
            ("Kilogram", show(&self.kilogram)),
            ("Amount", self.amount.clone()),
            ("Car", show(&self.car_id)),
            ("Note", show(&self.note)),
        ]
    }

    fn form_fields(existing: Option<&Self>) -> Vec<FormField> {
        vec![
            FormField::text("seller", "Seller", existing.map(|s| s.seller.as_str())).required(),
            FormField::text("buyer_name", "Buyer name", existing.map(|s| s.buyer_name.as_str())),
            FormField::text("phone", "Phone", existing.and_then(|s| s.phone.as_deref())),
            FormField::text("kilogram", "Kilogram", existing.and_then(|s| s.kilogram.as_deref())),
            FormField::text("amount", "Amount", existing.map(|s| s.amount.as_str())).required(),
            FormField::text("car_id", "Car", existing.and_then(|s| s.car_id.as_deref())),
            FormField::text("note", "Note", existing.and_then(|s| s.note.as_deref())),
            FormField::select(
                "status",
                "Status",
                existing.map(|s| s.status).unwrap_or_default().as_str(),
                PaymentStatus::ALL,
            ),
        ]
    }
}
