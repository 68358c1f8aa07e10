pub mod collection;
pub mod entities;
pub mod kind;
pub mod resource;
pub mod router;
pub mod session;
pub mod status;
