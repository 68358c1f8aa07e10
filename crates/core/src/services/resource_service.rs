use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::actions::{router, Action, Operation, ResourceActions, Transition};
use crate::client::schema::{validate_collection, validate_resource};
use crate::client::ResourceClient;
use crate::errors::CoreError;
use crate::models::collection::CollectionState;
use crate::models::kind::ResourceKind;
use crate::models::resource::{errors_to_value, ErrorMap, Resource, ResourceId};
use crate::store::Store;

use super::guard::{auth_required, ErrorReporter, GuardOutcome};
use super::request_gate::RequestGate;

/// Request → call → response/failure flows for one resource kind.
///
/// Every method dispatches the `*_REQUEST` action, performs the HTTP call
/// through [`auth_required`], and dispatches `*_RESPONSE` or `*_FAILED`.
/// Successful create/edit/remove navigate back to the kind's list route
/// after the configured delay.
pub struct ResourceService {
    kind: ResourceKind,
    actions: ResourceActions,
    store: Arc<Store>,
    client: Arc<dyn ResourceClient>,
    reporter: Arc<dyn ErrorReporter>,
    gate: Arc<RequestGate>,
    redirect_delay: Duration,
}

impl std::fmt::Debug for ResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceService")
            .field("kind", &self.kind)
            .field("redirect_delay", &self.redirect_delay)
            .finish()
    }
}

impl ResourceService {
    pub fn new(
        kind: ResourceKind,
        store: Arc<Store>,
        client: Arc<dyn ResourceClient>,
        reporter: Arc<dyn ErrorReporter>,
        gate: Arc<RequestGate>,
    ) -> Self {
        Self {
            kind,
            actions: ResourceActions::for_kind(kind),
            store,
            client,
            reporter,
            gate,
            redirect_delay: Duration::ZERO,
        }
    }

    /// Pause before navigating back to the list after a mutation.
    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Current slice of this kind.
    #[must_use]
    pub fn state(&self) -> Arc<CollectionState> {
        Arc::clone(self.store.state().collection(self.kind))
    }

    // ── Fetch ───────────────────────────────────────────────────────

    /// Fetch the whole collection. Nested kinds need `parent`.
    pub async fn fetch_all(&self, parent: Option<&Resource>) -> Result<GuardOutcome, CoreError> {
        let parent_id = parent.and_then(Resource::id);
        let url = self.kind.collection_path(parent_id)?;
        let url = url.as_str();
        let _slot = self.gate.acquire(self.kind, Operation::GetCollection).await;

        let fail = |errors: ErrorMap| {
            self.actions.create(
                Transition::GetCollectionFailed,
                self.leading(parent, [errors_to_value(&errors)]),
            )
        };

        self.store.dispatch(
            self.actions
                .create(Transition::GetCollectionRequest, self.leading(parent, [])),
        );

        let result = auth_required(
            &self.store,
            self.reporter.as_ref(),
            move |token| async move {
                let response = self.client.get_collection(&token, url).await?;
                validate_collection(self.kind, &response.data)?;
                let data = self.with_parent(response.data, parent_id);
                self.store.dispatch(self.actions.create(
                    Transition::GetCollectionResponse,
                    self.leading(parent, [data]),
                ));
                Ok::<(), CoreError>(())
            },
            &fail,
        )
        .await;

        self.settle(result, &fail)
    }

    /// Fetch only when nothing is loaded (for nested kinds: nothing loaded
    /// for this parent) and no fetch is already running.
    pub async fn fetch_all_if_needed(
        &self,
        parent: Option<&Resource>,
    ) -> Result<Option<GuardOutcome>, CoreError> {
        if !self.needs_fetch(parent.and_then(Resource::id)) {
            return Ok(None);
        }
        self.fetch_all(parent).await.map(Some)
    }

    /// Fetch one record and insert it, replacing any stale copy.
    pub async fn fetch_one(&self, resource: &Resource) -> Result<GuardOutcome, CoreError> {
        let url = self.kind.path_of(resource)?;
        let url = url.as_str();
        let _slot = self.gate.acquire(self.kind, Operation::GetResource).await;
        let target = resource.to_value();
        let target = &target;

        let fail = |errors: ErrorMap| {
            self.actions.create(
                Transition::GetResourceFailed,
                [target.clone(), errors_to_value(&errors)],
            )
        };

        self.store
            .dispatch(self.actions.create(Transition::GetResourceRequest, [target.clone()]));

        let result = auth_required(
            &self.store,
            self.reporter.as_ref(),
            move |token| async move {
                let response = self.client.get_resource(&token, url).await?;
                validate_resource(self.kind, &response.data)?;
                let data = self.with_parent(response.data, self.kind.parent_of(resource));
                self.store.dispatch(self.actions.create(
                    Transition::GetResourceResponse,
                    [target.clone(), data],
                ));
                Ok::<(), CoreError>(())
            },
            &fail,
        )
        .await;

        self.settle(result, &fail)
    }

    // ── Mutations ───────────────────────────────────────────────────

    /// Create a record from `payload`. Nested kinds need `parent`.
    pub async fn create(
        &self,
        parent: Option<&Resource>,
        payload: Value,
    ) -> Result<GuardOutcome, CoreError> {
        let parent_id = parent.and_then(Resource::id);
        let url = self.kind.collection_path(parent_id)?;
        let url = url.as_str();
        let payload = &payload;
        let _slot = self.gate.acquire(self.kind, Operation::CreateResource).await;

        let fail = |errors: ErrorMap| {
            self.actions.create(
                Transition::CreateResourceFailed,
                [payload.clone(), errors_to_value(&errors)],
            )
        };

        self.store
            .dispatch(self.actions.create(Transition::CreateResourceRequest, [payload.clone()]));

        let result = auth_required(
            &self.store,
            self.reporter.as_ref(),
            move |token| async move {
                let response = self.client.create_resource(&token, url, payload).await?;
                validate_resource(self.kind, &response.data)?;
                let data = self.with_parent(response.data, parent_id);
                self.store.dispatch(
                    self.actions
                        .create(Transition::CreateResourceResponse, [data]),
                );
                Ok::<(), CoreError>(())
            },
            &fail,
        )
        .await;

        let outcome = self.settle(result, &fail)?;
        self.after_mutation(outcome, parent_id).await
    }

    /// Apply `payload` to an existing record (shallow update).
    pub async fn edit(&self, resource: &Resource, payload: Value) -> Result<GuardOutcome, CoreError> {
        let url = self.kind.path_of(resource)?;
        let url = url.as_str();
        let payload = &payload;
        let _slot = self.gate.acquire(self.kind, Operation::EditResource).await;
        let target = resource.to_value();
        let target = &target;

        let fail = |errors: ErrorMap| {
            self.actions.create(
                Transition::EditResourceFailed,
                [target.clone(), payload.clone(), errors_to_value(&errors)],
            )
        };

        self.store.dispatch(
            self.actions
                .create(Transition::EditResourceRequest, [target.clone(), payload.clone()]),
        );

        let result = auth_required(
            &self.store,
            self.reporter.as_ref(),
            move |token| async move {
                let response = self.client.edit_resource(&token, url, payload).await?;
                validate_resource(self.kind, &response.data)?;
                let data = self.with_parent(response.data, self.kind.parent_of(resource));
                self.store.dispatch(self.actions.create(
                    Transition::EditResourceResponse,
                    [target.clone(), data],
                ));
                Ok::<(), CoreError>(())
            },
            &fail,
        )
        .await;

        let outcome = self.settle(result, &fail)?;
        self.after_mutation(outcome, self.kind.parent_of(resource)).await
    }

    pub async fn remove(&self, resource: &Resource) -> Result<GuardOutcome, CoreError> {
        let url = self.kind.path_of(resource)?;
        let url = url.as_str();
        let _slot = self.gate.acquire(self.kind, Operation::RemoveResource).await;
        let target = resource.to_value();
        let target = &target;

        let fail = |errors: ErrorMap| {
            self.actions.create(
                Transition::RemoveResourceFailed,
                [target.clone(), errors_to_value(&errors)],
            )
        };

        self.store
            .dispatch(self.actions.create(Transition::RemoveResourceRequest, [target.clone()]));

        let result = auth_required(
            &self.store,
            self.reporter.as_ref(),
            move |token| async move {
                self.client.remove_resource(&token, url).await?;
                self.store.dispatch(
                    self.actions
                        .create(Transition::RemoveResourceResponse, [target.clone()]),
                );
                Ok::<(), CoreError>(())
            },
            &fail,
        )
        .await;

        let outcome = self.settle(result, &fail)?;
        self.after_mutation(outcome, self.kind.parent_of(resource)).await
    }

    // ── Internal ────────────────────────────────────────────────────

    fn needs_fetch(&self, parent_id: Option<ResourceId>) -> bool {
        let state = self.state();
        // An in-flight status left behind by a login redirect does not block.
        let in_flight = self.gate.is_busy(self.kind, Operation::GetCollection)
            || self.gate.is_busy(self.kind, Operation::GetResource);
        if state.status.is_in_flight() && in_flight {
            return false;
        }
        if state.items.is_empty() {
            return true;
        }
        match (self.kind.is_nested(), parent_id) {
            (true, Some(parent_id)) => state
                .items
                .iter()
                .any(|item| self.kind.parent_of(item) != Some(parent_id)),
            _ => false,
        }
    }

    /// Nested records come back without their parent id; stamp it on so they
    /// can be addressed (and compared by parent) later.
    fn with_parent(&self, mut data: Value, parent_id: Option<ResourceId>) -> Value {
        let (Some(field), Some(parent_id)) = (self.kind.parent_key(), parent_id) else {
            return data;
        };
        let stamp = |record: &mut Value| {
            if let Some(object) = record.as_object_mut() {
                object.entry(field).or_insert(Value::from(parent_id));
            }
        };
        if let Some(items) = data
            .get_mut(self.kind.collection_key())
            .and_then(Value::as_array_mut)
        {
            for item in items.iter_mut() {
                stamp(item);
            }
        }
        if let Some(record) = data.get_mut(self.kind.resource_key()) {
            stamp(record);
        }
        data
    }

    /// Nested kinds carry their parent as the first collection-action field.
    fn leading<I>(&self, parent: Option<&Resource>, rest: I) -> Vec<Value>
    where
        I: IntoIterator<Item = Value>,
    {
        let mut values = Vec::new();
        if self.kind.is_nested() {
            values.push(parent.map(Resource::to_value).unwrap_or(Value::Null));
        }
        values.extend(rest);
        values
    }

    /// A response that failed envelope validation still ends the request:
    /// record it as a failure before handing the error back.
    fn settle<F>(
        &self,
        result: Result<GuardOutcome, CoreError>,
        fail: F,
    ) -> Result<GuardOutcome, CoreError>
    where
        F: Fn(ErrorMap) -> Action,
    {
        if let Err(CoreError::Payload(message)) = &result {
            tracing::warn!(kind = %self.kind, %message, "rejecting malformed response");
            let mut errors = ErrorMap::new();
            errors.insert("payload".to_string(), message.clone());
            self.store.dispatch(fail(errors));
        }
        result
    }

    async fn after_mutation(
        &self,
        outcome: GuardOutcome,
        parent_id: Option<ResourceId>,
    ) -> Result<GuardOutcome, CoreError> {
        if outcome != GuardOutcome::Completed {
            return Ok(outcome);
        }
        if !self.redirect_delay.is_zero() {
            tokio::time::sleep(self.redirect_delay).await;
        }
        let route = self.kind.list_route(parent_id)?;
        self.store.dispatch(router::push(&route, None));
        Ok(outcome)
    }
}
