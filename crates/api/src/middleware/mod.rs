//! Request middleware and extractors.

pub mod auth;

pub use auth::{AuthActor, auth_middleware, request_meta};
