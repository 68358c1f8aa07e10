use serde::{Deserialize, Serialize};

use crate::actions::transition::{Operation, Phase, Transition};
use crate::errors::CoreError;

use super::resource::{Resource, ResourceId};

/// The four resource collections the wallet manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Accounts,
    Categories,
    Transactions,
    /// Line items of a transaction; nested under `/api/transactions/{id}`.
    Details,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Accounts,
        ResourceKind::Categories,
        ResourceKind::Transactions,
        ResourceKind::Details,
    ];

    /// JSON key holding the array in a collection response, e.g. `{"accounts": [...]}`.
    #[must_use]
    pub fn collection_key(&self) -> &'static str {
        match self {
            ResourceKind::Accounts => "accounts",
            ResourceKind::Categories => "categories",
            ResourceKind::Transactions => "transactions",
            ResourceKind::Details => "details",
        }
    }

    /// JSON key holding the object in a single-resource response, e.g. `{"account": {...}}`.
    /// Also the action field naming the addressed resource.
    #[must_use]
    pub fn resource_key(&self) -> &'static str {
        match self {
            ResourceKind::Accounts => "account",
            ResourceKind::Categories => "category",
            ResourceKind::Transactions => "transaction",
            ResourceKind::Details => "detail",
        }
    }

    /// Whether records of this kind live under a parent transaction.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        matches!(self, ResourceKind::Details)
    }

    /// Field of a nested record pointing at its parent.
    #[must_use]
    pub fn parent_key(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Details => Some("transaction_id"),
            _ => None,
        }
    }

    /// Action-type tag for one transition, e.g. `GET_ACCOUNTS_REQUEST`,
    /// `EDIT_CATEGORY_RESPONSE`, `REMOVE_DETAIL_FAILED`.
    #[must_use]
    pub fn action_type(&self, transition: Transition) -> String {
        let plural = self.collection_key().to_uppercase();
        let singular = self.resource_key().to_uppercase();
        let stem = match transition.operation() {
            Operation::GetCollection => format!("GET_{plural}"),
            Operation::GetResource => format!("GET_{singular}"),
            Operation::CreateResource => format!("CREATE_{singular}"),
            Operation::EditResource => format!("EDIT_{singular}"),
            Operation::RemoveResource => format!("REMOVE_{singular}"),
        };
        let suffix = match transition.phase() {
            Phase::Request => "REQUEST",
            Phase::Response => "RESPONSE",
            Phase::Failed => "FAILED",
        };
        format!("{stem}_{suffix}")
    }

    /// REST path of the collection.
    pub fn collection_path(&self, parent: Option<ResourceId>) -> Result<String, CoreError> {
        match self {
            ResourceKind::Details => {
                let parent = parent.ok_or_else(|| CoreError::MissingParent(self.to_string()))?;
                Ok(format!("/api/transactions/{parent}/details"))
            }
            _ => Ok(format!("/api/{}", self.collection_key())),
        }
    }

    /// REST path of one record.
    pub fn resource_path(
        &self,
        parent: Option<ResourceId>,
        id: ResourceId,
    ) -> Result<String, CoreError> {
        Ok(format!("{}/{id}", self.collection_path(parent)?))
    }

    /// REST path of an existing record, reading `id` (and the parent id for
    /// nested kinds) from the record itself.
    pub fn path_of(&self, resource: &Resource) -> Result<String, CoreError> {
        let id = resource
            .id()
            .ok_or_else(|| CoreError::MissingId(self.resource_key().to_string()))?;
        self.resource_path(self.parent_of(resource), id)
    }

    /// Parent id stored on a nested record.
    #[must_use]
    pub fn parent_of(&self, resource: &Resource) -> Option<ResourceId> {
        self.parent_key()
            .and_then(|key| resource.get(key))
            .and_then(serde_json::Value::as_i64)
    }

    /// Client-side route listing this collection; where the app navigates
    /// after a successful create/edit/remove.
    pub fn list_route(&self, parent: Option<ResourceId>) -> Result<String, CoreError> {
        match self {
            ResourceKind::Details => {
                let parent = parent.ok_or_else(|| CoreError::MissingParent(self.to_string()))?;
                Ok(format!("/transactions/{parent}/details"))
            }
            _ => Ok(format!("/{}", self.collection_key())),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection_key())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.collection_key() == lower || kind.resource_key() == lower)
            .ok_or_else(|| CoreError::Config(format!("unknown resource kind: {s}")))
    }
}
