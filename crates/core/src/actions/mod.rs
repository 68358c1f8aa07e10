pub mod creator;
pub mod resource;
pub mod router;
pub mod session;
pub mod transition;

pub use creator::{Action, ActionCreator};
pub use resource::ResourceActions;
pub use transition::{Operation, Phase, Transition, TransitionMap};
