pub mod middleware;

use parking_lot::{ReentrantMutex, RwLock};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::actions::Action;
use crate::reducers::{AppState, RootReducer};
use crate::storage::SessionStore;

pub use middleware::{LoggingMiddleware, LoginRedirectMiddleware, Middleware, PersistenceMiddleware};

type Listener = Arc<dyn Fn(&AppState) + Send + Sync>;

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The state container.
///
/// Dispatches are serialized: each action runs through the root reducer,
/// then every middleware (whose follow-up actions are queued behind it),
/// then every subscriber. A subscriber or middleware may dispatch again
/// from the same thread; that nested dispatch runs to completion first.
pub struct Store {
    reducer: RootReducer,
    state: RwLock<AppState>,
    dispatching: ReentrantMutex<()>,
    middleware: Vec<Box<dyn Middleware>>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("middleware", &self.middleware.len())
            .field("listeners", &self.listeners.read().len())
            .finish()
    }
}

impl Store {
    /// Store seeded from a hydrated session, with the standard middleware
    /// (logging, session persistence, post-login redirect).
    pub fn new(session: Arc<SessionStore>) -> Self {
        let initial = AppState::with_session(session.snapshot());
        Self::with_reducer(RootReducer::new(), initial)
            .with_middleware(LoggingMiddleware)
            .with_middleware(PersistenceMiddleware::new(session))
            .with_middleware(LoginRedirectMiddleware)
    }

    /// Bare store without middleware.
    pub fn with_reducer(reducer: RootReducer, initial: AppState) -> Self {
        Self {
            reducer,
            state: RwLock::new(initial),
            dispatching: ReentrantMutex::new(()),
            middleware: Vec::new(),
            listeners: RwLock::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn with_middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware.push(Box::new(middleware));
        self
    }

    /// Snapshot of the current state tree (cheap: slices are shared).
    #[must_use]
    pub fn state(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn dispatch(&self, action: Action) {
        let _serialized = self.dispatching.lock();
        let mut queue = VecDeque::from([action]);

        while let Some(action) = queue.pop_front() {
            let previous = self.state();
            let next = self.reducer.reduce(&previous, &action);
            *self.state.write() = next.clone();

            for middleware in &self.middleware {
                queue.extend(middleware.after(&action, &previous, &next));
            }

            let listeners: Vec<Listener> = self
                .listeners
                .read()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            for listener in listeners {
                listener(&next);
            }
        }
    }

    /// Call `listener` with the new state after every dispatched action.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&AppState) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }
}
