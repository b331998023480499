// handlers/protected/mod.rs - Protected handlers (Bearer JWT required)
//
// Every handler here receives the caller's `Session` as a request
// extension inserted by `jwt_auth_middleware`.

pub mod auth;
pub mod reviews;
