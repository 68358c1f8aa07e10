pub mod http;
pub mod schema;
pub mod traits;

pub use http::HttpApiClient;
pub use traits::{ApiResponse, AuthClient, LoginResponse, ResourceClient};
