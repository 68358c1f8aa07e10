pub mod crud;
pub mod router;
pub mod session;

use std::sync::Arc;

use crate::actions::Action;
use crate::models::collection::CollectionState;
use crate::models::kind::ResourceKind;
use crate::models::router::RouterState;
use crate::models::session::SessionState;

pub use crud::{CrudReducer, PayloadKeys, TransitionHandler};

/// The whole state tree. Every slice sits behind an `Arc`; a dispatch only
/// allocates new slices for the ones it changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: Arc<SessionState>,
    pub router: Arc<RouterState>,
    pub accounts: Arc<CollectionState>,
    pub categories: Arc<CollectionState>,
    pub transactions: Arc<CollectionState>,
    pub details: Arc<CollectionState>,
}

impl AppState {
    pub fn with_session(session: SessionState) -> Self {
        Self {
            session: Arc::new(session),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn collection(&self, kind: ResourceKind) -> &Arc<CollectionState> {
        match kind {
            ResourceKind::Accounts => &self.accounts,
            ResourceKind::Categories => &self.categories,
            ResourceKind::Transactions => &self.transactions,
            ResourceKind::Details => &self.details,
        }
    }
}

/// Combines the slice reducers into one.
#[derive(Debug, Clone)]
pub struct RootReducer {
    accounts: CrudReducer,
    categories: CrudReducer,
    transactions: CrudReducer,
    details: CrudReducer,
}

impl Default for RootReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl RootReducer {
    pub fn new() -> Self {
        Self {
            accounts: CrudReducer::for_kind(ResourceKind::Accounts),
            categories: CrudReducer::for_kind(ResourceKind::Categories),
            transactions: CrudReducer::for_kind(ResourceKind::Transactions),
            details: CrudReducer::for_kind(ResourceKind::Details),
        }
    }

    /// Swap the reducer of one collection, e.g. one built with overrides.
    #[must_use]
    pub fn with_collection_reducer(mut self, kind: ResourceKind, reducer: CrudReducer) -> Self {
        match kind {
            ResourceKind::Accounts => self.accounts = reducer,
            ResourceKind::Categories => self.categories = reducer,
            ResourceKind::Transactions => self.transactions = reducer,
            ResourceKind::Details => self.details = reducer,
        }
        self
    }

    #[must_use]
    pub fn collection_reducer(&self, kind: ResourceKind) -> &CrudReducer {
        match kind {
            ResourceKind::Accounts => &self.accounts,
            ResourceKind::Categories => &self.categories,
            ResourceKind::Transactions => &self.transactions,
            ResourceKind::Details => &self.details,
        }
    }

    pub fn reduce(&self, state: &AppState, action: &Action) -> AppState {
        AppState {
            session: session::reduce(&state.session, action),
            router: router::reduce(&state.router, action),
            accounts: self.accounts.reduce(Some(&state.accounts), action),
            categories: self.categories.reduce(Some(&state.categories), action),
            transactions: self.transactions.reduce(Some(&state.transactions), action),
            details: self.details.reduce(Some(&state.details), action),
        }
    }
}
