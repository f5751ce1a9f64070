//! Shared types, errors, and configuration for Ledgerly.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service
//! - Outbound email seam

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;
pub mod types;

pub use config::AppConfig;
pub use email::{EmailSender, OutboundEmail};
pub use error::{AppError, AppResult};
