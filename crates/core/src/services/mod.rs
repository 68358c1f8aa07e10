pub mod guard;
pub mod request_gate;
pub mod resource_service;
pub mod session_service;

pub use guard::{auth_required, ErrorReporter, GuardOutcome, TracingReporter};
pub use request_gate::RequestGate;
pub use resource_service::ResourceService;
pub use session_service::SessionService;
