// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Sign-up/sign-in plus the read-only directory: everything a visitor can
// browse before logging in.

pub mod auth;
pub mod instructors;
pub mod root;
