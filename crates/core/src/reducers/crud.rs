use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::actions::{Action, ResourceActions, Transition, TransitionMap};
use crate::models::collection::CollectionState;
use crate::models::kind::ResourceKind;
use crate::models::resource::{errors_from_value, Resource};
use crate::models::status::Status;

/// Custom transition. Returning `None` leaves the state untouched.
pub type TransitionHandler =
    Arc<dyn Fn(&CollectionState, &Action) -> Option<CollectionState> + Send + Sync>;

/// Where the built-in transitions find records inside an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadKeys {
    /// `json[collection]` holds the fetched array.
    pub collection: String,
    /// `json[resource]` holds a fetched/created/edited record, and
    /// `action[resource]` names the record being removed.
    pub resource: String,
}

impl Default for PayloadKeys {
    fn default() -> Self {
        Self {
            collection: "collection".to_string(),
            resource: "resource".to_string(),
        }
    }
}

impl PayloadKeys {
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self {
            collection: kind.collection_key().to_string(),
            resource: kind.resource_key().to_string(),
        }
    }
}

/// Pure `(state, action) -> state` function over one collection.
///
/// Built from an initial state, a tag → [`Transition`] table and optional
/// per-transition overrides. Unknown tags return the very same `Arc`, so
/// change detection can use `Arc::ptr_eq`.
#[derive(Clone)]
pub struct CrudReducer {
    initial: Arc<CollectionState>,
    actions: TransitionMap,
    keys: PayloadKeys,
    overrides: HashMap<Transition, TransitionHandler>,
}

impl std::fmt::Debug for CrudReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudReducer")
            .field("actions", &self.actions.len())
            .field("keys", &self.keys)
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl CrudReducer {
    pub fn new(initial: CollectionState, actions: TransitionMap) -> Self {
        Self {
            initial: Arc::new(initial),
            actions,
            keys: PayloadKeys::default(),
            overrides: HashMap::new(),
        }
    }

    /// Reducer wired to the action tags and JSON keys of `kind`.
    pub fn for_kind(kind: ResourceKind) -> Self {
        Self::new(
            CollectionState::initial(),
            ResourceActions::for_kind(kind).transition_map(),
        )
        .with_payload_keys(PayloadKeys::for_kind(kind))
    }

    #[must_use]
    pub fn with_payload_keys(mut self, keys: PayloadKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the built-in behavior of one transition.
    #[must_use]
    pub fn with_override<F>(mut self, transition: Transition, handler: F) -> Self
    where
        F: Fn(&CollectionState, &Action) -> Option<CollectionState> + Send + Sync + 'static,
    {
        self.overrides.insert(transition, Arc::new(handler));
        self
    }

    #[must_use]
    pub fn initial_state(&self) -> Arc<CollectionState> {
        Arc::clone(&self.initial)
    }

    /// Transition this reducer maps `action` to, if any.
    #[must_use]
    pub fn transition_for(&self, action: &Action) -> Option<Transition> {
        self.actions.get(action.action_type()).copied()
    }

    /// Apply `action`. `None` as state means "not initialized yet".
    pub fn reduce(
        &self,
        state: Option<&Arc<CollectionState>>,
        action: &Action,
    ) -> Arc<CollectionState> {
        let state = state.unwrap_or(&self.initial);

        let Some(transition) = self.transition_for(action) else {
            return Arc::clone(state);
        };

        let next = match self.overrides.get(&transition) {
            Some(handler) => handler(state, action),
            None => self.apply(transition, state, action),
        };

        match next {
            Some(next) => Arc::new(next),
            None => Arc::clone(state),
        }
    }

    fn apply(
        &self,
        transition: Transition,
        state: &CollectionState,
        action: &Action,
    ) -> Option<CollectionState> {
        match transition {
            Transition::GetCollectionRequest | Transition::GetResourceRequest => {
                Some(with_status(state, Status::Fetching))
            }
            Transition::CreateResourceRequest => Some(with_status(state, Status::Creating)),
            Transition::EditResourceRequest => Some(with_status(state, Status::Editing)),
            Transition::RemoveResourceRequest => Some(with_status(state, Status::Removing)),

            Transition::GetCollectionFailed
            | Transition::GetResourceFailed
            | Transition::CreateResourceFailed
            | Transition::EditResourceFailed
            | Transition::RemoveResourceFailed => Some(failed(state, action)),

            Transition::GetCollectionResponse => {
                let items = self.fetched_items(action)?;
                Some(done(Status::FetchDone, items))
            }
            Transition::GetResourceResponse => {
                let resource = self.response_resource(action)?;
                Some(done(Status::FetchDone, upsert(&state.items, resource)))
            }
            Transition::CreateResourceResponse => {
                let resource = self.response_resource(action)?;
                let mut items = state.items.clone();
                items.push(resource);
                Some(done(Status::CreateDone, items))
            }
            Transition::EditResourceResponse => {
                let edited = self.response_resource(action)?;
                if !edited.id().is_some_and(|id| state.contains(id)) {
                    tracing::warn!(
                        action = action.action_type(),
                        id = ?edited.id(),
                        "edited record is not in the collection"
                    );
                }
                let items = state
                    .items
                    .iter()
                    .map(|item| {
                        if edited.id().is_some() && item.id() == edited.id() {
                            item.merged(&edited)
                        } else {
                            item.clone()
                        }
                    })
                    .collect();
                Some(done(Status::EditDone, items))
            }
            Transition::RemoveResourceResponse => {
                let removed = action
                    .field(&self.keys.resource)
                    .and_then(|v| Resource::from_value(v.clone()).ok());
                let Some(removed_id) = removed.as_ref().and_then(Resource::id) else {
                    tracing::warn!(
                        action = action.action_type(),
                        "remove response without a resource id, ignoring"
                    );
                    return None;
                };
                let items = state
                    .items
                    .iter()
                    .filter(|item| item.id() != Some(removed_id))
                    .cloned()
                    .collect();
                Some(done(Status::RemoveDone, items))
            }
        }
    }

    fn fetched_items(&self, action: &Action) -> Option<Vec<Resource>> {
        let items = action
            .path(&["json", self.keys.collection.as_str()])
            .and_then(Value::as_array)
            .and_then(|items| {
                items
                    .iter()
                    .map(|item| Resource::from_value(item.clone()).ok())
                    .collect::<Option<Vec<_>>>()
            });
        if items.is_none() {
            tracing::warn!(
                action = action.action_type(),
                key = %self.keys.collection,
                "collection response without an array of records, ignoring"
            );
        }
        items
    }

    fn response_resource(&self, action: &Action) -> Option<Resource> {
        let resource = action
            .path(&["json", self.keys.resource.as_str()])
            .and_then(|v| Resource::from_value(v.clone()).ok());
        if resource.is_none() {
            tracing::warn!(
                action = action.action_type(),
                key = %self.keys.resource,
                "resource response without a record, ignoring"
            );
        }
        resource
    }
}

fn with_status(state: &CollectionState, status: Status) -> CollectionState {
    CollectionState {
        status,
        items: state.items.clone(),
        errors: state.errors.clone(),
    }
}

fn failed(state: &CollectionState, action: &Action) -> CollectionState {
    CollectionState {
        status: Status::Failed,
        items: state.items.clone(),
        errors: action.field("errors").map(errors_from_value).unwrap_or_default(),
    }
}

fn done(status: Status, items: Vec<Resource>) -> CollectionState {
    CollectionState {
        status,
        items,
        errors: Default::default(),
    }
}

/// Replace the record with the same id in place, or append it.
fn upsert(items: &[Resource], resource: Resource) -> Vec<Resource> {
    let mut items = items.to_vec();
    let position = resource
        .id()
        .and_then(|id| items.iter().position(|item| item.id() == Some(id)));
    match position {
        Some(index) => items[index] = resource,
        None => items.push(resource),
    }
    items
}
