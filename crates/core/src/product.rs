//! The product record and its wire shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::id::ProductId;

/// Calendar date format used on the wire and in form inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A catalog product, as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub logo: String,
    pub date_release: NaiveDate,
    pub date_revision: NaiveDate,
}

impl Product {
    /// Split off the identifier, producing the PUT body.
    pub fn to_update(&self) -> ProductUpdate {
        ProductUpdate {
            name: self.name.clone(),
            description: self.description.clone(),
            logo: self.logo.clone(),
            date_release: self.date_release,
            date_revision: self.date_revision,
        }
    }

    pub fn with_id(id: ProductId, update: ProductUpdate) -> Self {
        Self {
            id,
            name: update.name,
            description: update.description,
            logo: update.logo,
            date_release: update.date_release,
            date_revision: update.date_revision,
        }
    }
}

/// Update payload: every field except the (immutable) identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: NaiveDate,
    pub date_revision: NaiveDate,
}

/// Acknowledgment message returned by a successful create.
pub const PRODUCT_ADDED: &str = "Product added successfully";
/// Acknowledgment message returned by a successful update.
pub const PRODUCT_UPDATED: &str = "Product updated successfully";
/// Acknowledgment message returned by a successful delete.
pub const PRODUCT_REMOVED: &str = "Product removed successfully";

/// Backend acknowledgment for mutating calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ack<T = serde_json::Value> {
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

impl<T> Ack<T> {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn confirms(&self, expected: &str) -> bool {
        self.message == expected
    }
}

/// The editable fields of a product, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Id,
    Name,
    Description,
    Logo,
    DateRelease,
    DateRevision,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Id,
        Field::Name,
        Field::Description,
        Field::Logo,
        Field::DateRelease,
        Field::DateRevision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Name => "name",
            Field::Description => "description",
            Field::Logo => "logo",
            Field::DateRelease => "date_release",
            Field::DateRevision => "date_revision",
        }
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
