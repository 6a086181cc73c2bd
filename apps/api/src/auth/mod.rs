//! Authentication and session handling.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed session tokens carrying the user's id, name, and role.
//! - [`session`] -- Axum extractors that turn a bearer token into a principal.
//! - [`handlers`] -- register / login / session routes.

pub mod handlers;
pub mod jwt;
pub mod password;
pub mod session;
