// handlers/instructor/mod.rs - Instructor-only handlers
//
// Layered behind both `jwt_auth_middleware` and
// `require_instructor_middleware`; a plain user gets 403 ROLE_REQUIRED.

pub mod draft;
pub mod photo_put;
pub mod profile_get;
pub mod profile_put;

pub use draft::{draft_delete, draft_get, draft_put};
pub use photo_put::photo_put;
pub use profile_get::profile_get;
pub use profile_put::profile_put;
