use chrono::NaiveDateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

use super::kind::ResourceKind;
use super::resource::{Resource, ResourceId};

/// Typed view over an opaque [`Resource`] of a known kind.
pub trait Entity: DeserializeOwned + Serialize {
    const KIND: ResourceKind;

    /// Decode from the record held in the state tree.
    fn from_resource(resource: &Resource) -> Result<Self, CoreError> {
        serde_json::from_value(resource.to_value()).map_err(|e| {
            CoreError::Deserialization(format!("{}: {e}", Self::KIND.resource_key()))
        })
    }

    /// Encode as a request payload / record.
    fn to_resource(&self) -> Result<Resource, CoreError> {
        let value = serde_json::to_value(self)
            .map_err(|e| CoreError::Serialization(format!("{}: {e}", Self::KIND.resource_key())))?;
        Resource::from_value(value)
    }
}

/// `created_on` as the server writes it, `31-12-2024 18:05:00`.
///
/// ISO 8601 (`2024-12-31T18:05:00`) is accepted on input as well; an empty
/// string or `null` reads as absent.
pub mod server_datetime {
    use super::*;
    use serde::de::Error as _;

    pub const FORMAT: &str = "%d-%m-%Y %H:%M:%S";

    pub fn parse(text: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        NaiveDateTime::parse_from_str(text, FORMAT).or_else(|_| text.parse::<NaiveDateTime>())
    }

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(at) => serializer.serialize_str(&at.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|text| !text.trim().is_empty())
            .map(|text| parse(text.trim()).map_err(D::Error::custom))
            .transpose()
    }
}

/// Amounts are decimal currency values, sent as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    /// Opening balance.
    #[serde(default)]
    pub original_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<f64>,
    #[serde(
        default,
        with = "server_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<ResourceId>,
}

impl Entity for Account {
    const KIND: ResourceKind = ResourceKind::Accounts;
}

/// Direction of money flow; tags categories and transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "income"),
            TransactionType::Expense => write!(f, "expense"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub category_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<ResourceId>,
}

impl Entity for Category {
    const KIND: ResourceKind = ResourceKind::Categories;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    /// Not every server build reports it.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<ResourceId>,
    #[serde(
        default,
        with = "server_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_on: Option<NaiveDateTime>,
}

impl Entity for Transaction {
    const KIND: ResourceKind = ResourceKind::Transactions;
}

/// One line item of a transaction.
///
/// The server omits `transaction_id`; the details service fills it in from
/// the parent the records were loaded under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ResourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<ResourceId>,
    pub name: String,
    #[serde(default)]
    pub price_per_unit: f64,
    #[serde(default)]
    pub count: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

impl Entity for Detail {
    const KIND: ResourceKind = ResourceKind::Details;
}
