//! Reading the audit trail.

use ledgerly_shared::AppResult;
use ledgerly_shared::types::{PageRequest, PageResponse};

use crate::audit::types::AuditLog;
use crate::auth::{Actor, can_generate_reports};
use crate::context::ServiceContext;

/// Paged access to a company's audit trail.
#[derive(Debug, Clone)]
pub struct AuditService {
    ctx: ServiceContext,
}

impl AuditService {
    /// Creates the service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Newest entries first. Page size is clamped to `1..=100`.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below accountant; `Internal` on store failure.
    pub async fn list(&self, actor: &Actor, page: PageRequest) -> AppResult<PageResponse<AuditLog>> {
        actor.require(can_generate_reports, "view audit logs")?;
        let page = page.normalized();
        let (entries, total) = self.ctx.store.list_audit(actor.company_id, page).await?;
        Ok(PageResponse::new(entries, page.page, page.per_page, total))
    }
}
