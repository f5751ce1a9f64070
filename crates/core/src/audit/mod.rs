//! Append-only audit trail.

pub mod recorder;
pub mod service;
pub mod types;

pub use recorder::AuditRecorder;
pub use service::AuditService;
pub use types::{AuditAction, AuditEntity, AuditLog};
