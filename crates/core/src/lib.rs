pub mod actions;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod reducers;
pub mod services;
pub mod storage;
pub mod store;

use std::sync::Arc;

use actions::router;
use client::{AuthClient, HttpApiClient, ResourceClient};
use config::ClientConfig;
use errors::CoreError;
use models::entities::Entity;
use models::kind::ResourceKind;
use reducers::AppState;
use services::{ErrorReporter, RequestGate, ResourceService, SessionService, TracingReporter};
use storage::{FilePersistStore, PersistStore, SessionStore};
use store::Store;

/// Main entry point for the wallet client library.
///
/// Owns the state container, the hydrated session and one service per
/// resource kind, all sharing one REST client and one request gate.
#[must_use]
pub struct Wallet {
    store: Arc<Store>,
    session_store: Arc<SessionStore>,
    session: SessionService,
    accounts: ResourceService,
    categories: ResourceService,
    transactions: ResourceService,
    details: ResourceService,
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.store.state();
        f.debug_struct("Wallet")
            .field("authenticated", &state.session.is_authenticated())
            .field("location", &state.router.location.pathname)
            .field("accounts", &state.accounts.items.len())
            .field("categories", &state.categories.items.len())
            .field("transactions", &state.transactions.items.len())
            .field("details", &state.details.items.len())
            .finish()
    }
}

impl Wallet {
    /// Production wiring: HTTP client and a file-backed session at
    /// `config.session_path()`.
    pub fn new(config: &ClientConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let client = Arc::new(HttpApiClient::new(config.base_url.clone(), config.timeout()));
        let persist = Box::new(FilePersistStore::new(config.session_path()));
        Self::with_parts(
            client.clone(),
            client,
            persist,
            Arc::new(TracingReporter),
            config,
        )
    }

    /// Assemble from explicit collaborators. Hydrates the session from
    /// `persist` before building the store.
    pub fn with_parts(
        resources: Arc<dyn ResourceClient>,
        auth: Arc<dyn AuthClient>,
        persist: Box<dyn PersistStore>,
        reporter: Arc<dyn ErrorReporter>,
        config: &ClientConfig,
    ) -> Result<Self, CoreError> {
        let session_store = Arc::new(SessionStore::new(persist));
        session_store.init()?;

        let store = Arc::new(Store::new(Arc::clone(&session_store)));
        let gate = Arc::new(RequestGate::new());

        let service = |kind: ResourceKind| {
            ResourceService::new(
                kind,
                Arc::clone(&store),
                Arc::clone(&resources),
                Arc::clone(&reporter),
                Arc::clone(&gate),
            )
            .with_redirect_delay(config.redirect_delay())
        };

        Ok(Self {
            accounts: service(ResourceKind::Accounts),
            categories: service(ResourceKind::Categories),
            transactions: service(ResourceKind::Transactions),
            details: service(ResourceKind::Details),
            session: SessionService::new(Arc::clone(&store), auth),
            session_store,
            store,
        })
    }

    // ── Services ────────────────────────────────────────────────────

    pub fn session(&self) -> &SessionService {
        &self.session
    }

    pub fn accounts(&self) -> &ResourceService {
        &self.accounts
    }

    pub fn categories(&self) -> &ResourceService {
        &self.categories
    }

    pub fn transactions(&self) -> &ResourceService {
        &self.transactions
    }

    /// Transaction line items; every call needs the parent transaction.
    pub fn details(&self) -> &ResourceService {
        &self.details
    }

    pub fn resources(&self, kind: ResourceKind) -> &ResourceService {
        match kind {
            ResourceKind::Accounts => &self.accounts,
            ResourceKind::Categories => &self.categories,
            ResourceKind::Transactions => &self.transactions,
            ResourceKind::Details => &self.details,
        }
    }

    // ── State ───────────────────────────────────────────────────────

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub fn session_store(&self) -> &Arc<SessionStore> {
        &self.session_store
    }

    /// Snapshot of the whole state tree.
    pub fn state(&self) -> AppState {
        self.store.state()
    }

    /// Decoded items of `T`'s collection.
    pub fn items<T: Entity>(&self) -> Result<Vec<T>, CoreError> {
        self.store
            .state()
            .collection(T::KIND)
            .items
            .iter()
            .map(T::from_resource)
            .collect()
    }

    /// Navigate, e.g. to the page whose data is about to be loaded, so a
    /// login redirect knows where to come back to.
    pub fn navigate(&self, pathname: &str) {
        self.store.dispatch(router::push(pathname, None));
    }
}
