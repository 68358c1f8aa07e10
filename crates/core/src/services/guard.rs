use std::future::Future;

use crate::actions::{router, session, Action};
use crate::errors::{CoreError, HttpFailure};
use crate::models::resource::{errors_from_value, ErrorMap};
use crate::store::Store;

/// Side channel for failures the UI has no specific handling for.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, failure: &HttpFailure);
}

/// Reports through `tracing` at error level.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, failure: &HttpFailure) {
        tracing::error!(
            status = failure.status,
            status_text = %failure.status_text,
            body = %failure.data,
            "unexpected API failure"
        );
    }
}

/// How a guarded call ended, when it did not end in a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// The operation ran and succeeded.
    Completed,
    /// No valid token; redirected to `/login` without calling the operation.
    LoginRequired,
    /// The server answered 401; session dropped and redirected to `/login`.
    Unauthorized,
    /// The server answered 400; the failure action carries its validation errors.
    Rejected,
    /// Any other HTTP status; failure action dispatched with no errors and reported.
    Failed(u16),
}

/// Run `operation` with the current access token, mapping its failures:
///
/// - no valid token → redirect to login, `operation` and `on_failure` not called
/// - 400 → `on_failure(validation errors)` dispatched
/// - 401 → `UNAUTHORIZED`, then redirect to login; `on_failure` not called
/// - other status → `on_failure({})` dispatched and the failure reported
/// - no structured status (network etc.) → returned as `Err`
pub async fn auth_required<Op, Fut, OnFail>(
    store: &Store,
    reporter: &dyn ErrorReporter,
    operation: Op,
    on_failure: OnFail,
) -> Result<GuardOutcome, CoreError>
where
    Op: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<(), CoreError>>,
    OnFail: FnOnce(ErrorMap) -> Action,
{
    let state = store.state();
    let Some(token) = state.session.valid_token().map(|t| t.value.clone()) else {
        let resume = state.router.location.pathname.clone();
        tracing::info!(%resume, "no valid access token, redirecting to login");
        store.dispatch(router::to_login(&resume));
        return Ok(GuardOutcome::LoginRequired);
    };

    match operation(token).await {
        Ok(()) => Ok(GuardOutcome::Completed),
        Err(CoreError::Http(failure)) => match failure.status {
            400 => {
                store.dispatch(on_failure(errors_from_value(&failure.data)));
                Ok(GuardOutcome::Rejected)
            }
            401 => {
                let resume = store.state().router.location.pathname.clone();
                tracing::info!(%resume, "access token rejected, redirecting to login");
                store.dispatch(session::unauthorized());
                store.dispatch(router::to_login(&resume));
                Ok(GuardOutcome::Unauthorized)
            }
            status => {
                store.dispatch(on_failure(ErrorMap::new()));
                reporter.report(&failure);
                Ok(GuardOutcome::Failed(status))
            }
        },
        Err(e) => Err(e),
    }
}
