//! Companies, users and team management.

pub mod service;
pub mod types;

pub use service::TeamService;
pub use types::{Company, User, VerificationUpdate};
