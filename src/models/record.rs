// models/record.rs
//
// Shared shape of the four record kinds (buy, sell, bittaa, profile).

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use rocket::FromFormField;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::image::StoredImage;
use crate::services::access_guard::AccessPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Buy,
    Sell,
    Bittaa,
    Profile,
}

impl ResourceKind {
    /// Path segment and template prefix.
    pub fn slug(&self) -> &'static str {
        match self {
            ResourceKind::Buy => "buy",
            ResourceKind::Sell => "sell",
            ResourceKind::Bittaa => "bittaa",
            ResourceKind::Profile => "profile",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Buy => "Buy",
            ResourceKind::Sell => "Sell",
            ResourceKind::Bittaa => "Bittaa",
            ResourceKind::Profile => "Profile",
        }
    }

    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Buy => "buys",
            ResourceKind::Sell => "sells",
            ResourceKind::Bittaa => "bittaas",
            ResourceKind::Profile => "profiles",
        }
    }

    /// Document field matched by search.
    pub fn title_field(&self) -> &'static str {
        match self {
            ResourceKind::Buy | ResourceKind::Bittaa => "name",
            ResourceKind::Sell => "buyer_name",
            ResourceKind::Profile => "full_name",
        }
    }

    /// Where a successful create/update/delete lands.
    pub fn listing(&self) -> &'static str {
        match self {
            ResourceKind::Buy => "/bought",
            ResourceKind::Sell => "/sells",
            ResourceKind::Bittaa => "/bittaa/mine",
            ResourceKind::Profile => "/profile/mine",
        }
    }

    pub fn policy(&self) -> &'static AccessPolicy {
        AccessPolicy::for_kind(*self)
    }
}

#[derive(Serialize, Deserialize, FromFormField, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    #[default]
    Paid,
    #[serde(rename = "Not-Paid")]
    #[field(value = "Not-Paid")]
    NotPaid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::NotPaid => "Not-Paid",
        }
    }

    pub const ALL: &'static [&'static str] = &["Paid", "Not-Paid"];
}

/// One input of a record form. A non-empty `options` renders a select.
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub options: &'static [&'static str],
}

impl FormField {
    pub fn text(name: &'static str, label: &'static str, value: Option<&str>) -> Self {
        FormField {
            name,
            label,
            value: value.unwrap_or_default().to_string(),
            required: false,
            options: &[],
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn select(name: &'static str, label: &'static str, value: &str, options: &'static [&'static str]) -> Self {
        FormField {
            name,
            label,
            value: value.to_string(),
            required: true,
            options,
        }
    }
}

/// A persisted buy/sell/bittaa/profile document.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Validated form values for create and update.
    type Fields: Send;

    const KIND: ResourceKind;

    fn create(fields: Self::Fields, owner: ObjectId, image: StoredImage) -> Self;

    /// Overwrites the editable fields; identity, owner, image and timestamp stay.
    fn apply(&mut self, fields: Self::Fields);

    fn id(&self) -> ObjectId;
    fn owner(&self) -> ObjectId;
    fn title(&self) -> &str;
    fn image(&self) -> &StoredImage;
    fn set_image(&mut self, image: StoredImage);
    fn status(&self) -> PaymentStatus;
    fn created_at(&self) -> DateTime<Utc>;

    /// Label/value pairs shown on list and detail pages.
    fn details(&self) -> Vec<(&'static str, String)>;

    /// Inputs of the add and edit forms, prefilled from `existing`.
    fn form_fields(existing: Option<&Self>) -> Vec<FormField>;
}

/// Trims an optional form value and drops it when blank.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn show(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
