// models/bittaa.rs

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use rocket::FromFormField;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;
use crate::models::record::{show, FormField, PaymentStatus, Record, ResourceKind};

#[derive(Serialize, Deserialize, FromFormField, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Material {
    #[default]
    Dinicha,
    Karot,
    Kurumba,
    Qayasir,
    Shunkurtaa,
    Shukaar,
    Timaatim,
    Luqqaa,
    Joniya,
    #[serde(rename = "Car Material")]
    #[field(value = "Car Material")]
    CarMaterial,
    #[serde(rename = "Building Material")]
    #[field(value = "Building Material")]
    BuildingMaterial,
    Other,
}

impl Material {
    pub const ALL: &'static [&'static str] = &[
        "Dinicha",
        "Karot",
        "Kurumba",
        "Qayasir",
        "Shunkurtaa",
        "Shukaar",
        "Timaatim",
        "Luqqaa",
        "Joniya",
        "Car Material",
        "Building Material",
        "Other",
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Material::Dinicha => "Dinicha",
            Material::Karot => "Karot",
            Material::Kurumba => "Kurumba",
            Material::Qayasir => "Qayasir",
            Material::Shunkurtaa => "Shunkurtaa",
            Material::Shukaar => "Shukaar",
            Material::Timaatim => "Timaatim",
            Material::Luqqaa => "Luqqaa",
            Material::Joniya => "Joniya",
            Material::CarMaterial => "Car Material",
            Material::BuildingMaterial => "Building Material",
            Material::Other => "Other",
        }
    }
}

/// Material bought through a broker (dallaala), paid in birr.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Bittaa {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub material: Material,
    pub from_seller: String,
    pub phone: Option<String>,
    pub dallaala: Option<String>,
    pub kilogram: Option<String>,
    pub birr: String,
    pub body: Option<String>,
    pub image: StoredImage,
    pub status: PaymentStatus,
    pub user: ObjectId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct BittaaFields {
    pub name: String,
    pub material: Material,
    pub from_seller: String,
    pub phone: Option<String>,
    pub dallaala: Option<String>,
    pub kilogram: Option<String>,
    pub birr: String,
    pub body: Option<String>,
    pub status: PaymentStatus,
}

impl Record for Bittaa {
    type Fields = BittaaFields;

    const KIND: ResourceKind = ResourceKind::Bittaa;

    fn create(fields: BittaaFields, owner: ObjectId, image: StoredImage) -> Self {
        Bittaa {
            id: ObjectId::new(),
            name: fields.name,
            material: fields.material,
            from_seller: fields.from_seller,
            phone: fields.phone,
            dallaala: fields.dallaala,
            kilogram: fields.kilogram,
            birr: fields.birr,
            body: fields.body,
            image,
            status: fields.status,
            user: owner,
            created_at: Utc::now(),
        }
    }

    fn apply(&mut self, fields: BittaaFields) {
        self.name = fields.name;
        self.material = fields.material;
        self.from_seller = fields.from_seller;
        self.phone = fields.phone;
        self.dallaala = fields.dallaala;
        self.kilogram = fields.kilogram;
        self.birr = fields.birr;
        self.body = fields.body;
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
            ("Material", self.material.as_str().to_string()),
            ("From", self.from_seller.clone()),
            ("Phone", show(&self.phone)),
            ("Dallaala", show(&self.dallaala)),
            ("Kilogram", show(&self.kilogram)),
            ("Birr", self.birr.clone()),
            ("Notes", show(&self.body)),
        ]
    }

    fn form_fields(existing: Option<&Self>) -> Vec<FormField> {
        vec![
            FormField::text("name", "Name", existing.map(|b| b.name.as_str())).required(),
            FormField::select(
                "material",
                "Material",
                existing.map(|b| b.material).unwrap_or_default().as_str(),
                Material::ALL,
            ),
            FormField::text("from_seller", "From seller", existing.map(|b| b.from_seller.as_str())).required(),
            FormField::text("phone", "Phone", existing.and_then(|b| b.phone.as_deref())),
            FormField::text("dallaala", "Dallaala", existing.and_then(|b| b.dallaala.as_deref())),
            FormField::text("kilogram", "Kilogram", existing.and_then(|b| b.kilogram.as_deref())),
            FormField::text("birr", "Birr", existing.map(|b| b.birr.as_str())).required(),
            FormField::text("body", "Notes", existing.and_then(|b| b.body.as_deref())),
            FormField::select(
                "status",
                "Status",
                existing.map(|b| b.status).unwrap_or_default().as_str(),
                PaymentStatus::ALL,
            ),
        ]
    }
}
