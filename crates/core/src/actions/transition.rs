use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The five request kinds a collection supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    GetCollection,
    GetResource,
    CreateResource,
    EditResource,
    RemoveResource,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::GetCollection,
        Operation::GetResource,
        Operation::CreateResource,
        Operation::EditResource,
        Operation::RemoveResource,
    ];
}

/// Where in its lifecycle a request is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Request,
    Response,
    Failed,
}

/// Every canonical collection transition.
///
/// A closed set: reducers match on it exhaustively, so adding a variant is
/// a compile error until every reducer handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    GetCollectionRequest,
    GetCollectionResponse,
    GetCollectionFailed,
    GetResourceRequest,
    GetResourceResponse,
    GetResourceFailed,
    CreateResourceRequest,
    CreateResourceResponse,
    CreateResourceFailed,
    EditResourceRequest,
    EditResourceResponse,
    EditResourceFailed,
    RemoveResourceRequest,
    RemoveResourceResponse,
    RemoveResourceFailed,
}

impl Transition {
    pub fn of(operation: Operation, phase: Phase) -> Self {
        use Operation::*;
        use Phase::*;
        match (operation, phase) {
            (GetCollection, Request) => Transition::GetCollectionRequest,
            (GetCollection, Response) => Transition::GetCollectionResponse,
            (GetCollection, Failed) => Transition::GetCollectionFailed,
            (GetResource, Request) => Transition::GetResourceRequest,
            (GetResource, Response) => Transition::GetResourceResponse,
            (GetResource, Failed) => Transition::GetResourceFailed,
            (CreateResource, Request) => Transition::CreateResourceRequest,
            (CreateResource, Response) => Transition::CreateResourceResponse,
            (CreateResource, Failed) => Transition::CreateResourceFailed,
            (EditResource, Request) => Transition::EditResourceRequest,
            (EditResource, Response) => Transition::EditResourceResponse,
            (EditResource, Failed) => Transition::EditResourceFailed,
            (RemoveResource, Request) => Transition::RemoveResourceRequest,
            (RemoveResource, Response) => Transition::RemoveResourceResponse,
            (RemoveResource, Failed) => Transition::RemoveResourceFailed,
        }
    }

    /// All fifteen transitions, grouped by operation.
    pub fn all() -> impl Iterator<Item = Transition> {
        Operation::ALL.into_iter().flat_map(|op| {
            [Phase::Request, Phase::Response, Phase::Failed]
                .into_iter()
                .map(move |phase| Transition::of(op, phase))
        })
    }

    #[must_use]
    pub fn operation(&self) -> Operation {
        match self {
            Transition::GetCollectionRequest
            | Transition::GetCollectionResponse
            | Transition::GetCollectionFailed => Operation::GetCollection,
            Transition::GetResourceRequest
            | Transition::GetResourceResponse
            | Transition::GetResourceFailed => Operation::GetResource,
            Transition::CreateResourceRequest
            | Transition::CreateResourceResponse
            | Transition::CreateResourceFailed => Operation::CreateResource,
            Transition::EditResourceRequest
            | Transition::EditResourceResponse
            | Transition::EditResourceFailed => Operation::EditResource,
            Transition::RemoveResourceRequest
            | Transition::RemoveResourceResponse
            | Transition::RemoveResourceFailed => Operation::RemoveResource,
        }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match self {
            Transition::GetCollectionRequest
            | Transition::GetResourceRequest
            | Transition::CreateResourceRequest
            | Transition::EditResourceRequest
            | Transition::RemoveResourceRequest => Phase::Request,
            Transition::GetCollectionResponse
            | Transition::GetResourceResponse
            | Transition::CreateResourceResponse
            | Transition::EditResourceResponse
            | Transition::RemoveResourceResponse => Phase::Response,
            Transition::GetCollectionFailed
            | Transition::GetResourceFailed
            | Transition::CreateResourceFailed
            | Transition::EditResourceFailed
            | Transition::RemoveResourceFailed => Phase::Failed,
        }
    }

    /// Canonical camelCase name, e.g. `getCollectionRequest`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Transition::GetCollectionRequest => "getCollectionRequest",
            Transition::GetCollectionResponse => "getCollectionResponse",
            Transition::GetCollectionFailed => "getCollectionFailed",
            Transition::GetResourceRequest => "getResourceRequest",
            Transition::GetResourceResponse => "getResourceResponse",
            Transition::GetResourceFailed => "getResourceFailed",
            Transition::CreateResourceRequest => "createResourceRequest",
            Transition::CreateResourceResponse => "createResourceResponse",
            Transition::CreateResourceFailed => "createResourceFailed",
            Transition::EditResourceRequest => "editResourceRequest",
            Transition::EditResourceResponse => "editResourceResponse",
            Transition::EditResourceFailed => "editResourceFailed",
            Transition::RemoveResourceRequest => "removeResourceRequest",
            Transition::RemoveResourceResponse => "removeResourceResponse",
            Transition::RemoveResourceFailed => "removeResourceFailed",
        }
    }
}

impl std::fmt::Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete action-type tag → canonical transition.
pub type TransitionMap = HashMap<String, Transition>;
