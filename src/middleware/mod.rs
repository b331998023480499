pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{jwt_auth_middleware, require_instructor_middleware};
pub use extract::{ApiJson, ApiQuery};
pub use response::{ApiResponse, ApiResult};
