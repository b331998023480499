// handlers/mod.rs - tiered handlers
//
// Public (no auth) -> Protected (Bearer JWT, /api/*) -> Instructor
// (Bearer JWT plus instructor role, /api/instructor/*)

pub mod instructor;
pub mod protected;
pub mod public;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids are taken as strings so a malformed id gets the JSON error body
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(format!("Invalid {} id: {}", what, raw)))
}
