//! Best-effort audit trail writes.

use ledgerly_shared::types::AuditLogId;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::audit::types::{AuditAction, AuditEntity, AuditLog};
use crate::auth::Actor;
use crate::context::ServiceContext;

/// Appends audit entries on behalf of an actor.
///
/// A failed append is logged and swallowed: the operation being audited has
/// already happened and its result stands.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    ctx: ServiceContext,
}

impl AuditRecorder {
    /// Creates a recorder.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Builds the entry that [`record`](Self::record) would append.
    #[must_use]
    pub fn entry(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Option<Uuid>,
        actor: &Actor,
        changes: Option<Value>,
    ) -> AuditLog {
        AuditLog {
            id: self.ctx.next_id::<AuditLogId>(),
            company_id: actor.company_id,
            action,
            entity,
            entity_id,
            user_id: actor.user_id,
            user_name: actor.name.clone(),
            user_email: actor.email.clone(),
            changes,
            ip_address: actor.ip_address.clone(),
            user_agent: actor.user_agent.clone(),
            created_at: self.ctx.now(),
        }
    }

    /// Appends one entry. Never fails.
    pub async fn record(
        &self,
        action: AuditAction,
        entity: AuditEntity,
        entity_id: Option<Uuid>,
        actor: &Actor,
        changes: Option<Value>,
    ) {
        let entry = self.entry(action, entity, entity_id, actor, changes);
        match self.ctx.store.append_audit(&entry).await {
            Ok(()) => debug!(
                company_id = %entry.company_id,
                action = %action,
                entity = %entity,
                "Audit entry recorded"
            ),
            Err(e) => warn!(
                error = %e,
                company_id = %entry.company_id,
                user_id = %entry.user_id,
                action = %action,
                entity = %entity,
                entity_id = ?entity_id,
                "Failed to record audit entry"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};
    use ledgerly_shared::types::{CompanyId, PageRequest, UserId};
    use serde_json::json;

    use crate::auth::Role;
    use crate::clock::{FixedClock, UuidV7Generator};
    use crate::store::{EntityStore, MemoryStore};

    fn actor() -> Actor {
        Actor {
            user_id: UserId::new(),
            company_id: CompanyId::new(),
            role: Role::Admin,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            ip_address: Some("192.0.2.7".into()),
            user_agent: Some("test-agent".into()),
        }
    }

    fn recorder(store: &MemoryStore) -> AuditRecorder {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let ctx = ServiceContext::new(
            Arc::new(store.clone()),
            Arc::new(FixedClock::new(now)),
            Arc::new(UuidV7Generator),
        );
        AuditRecorder::new(ctx)
    }

    #[tokio::test]
    async fn test_record_copies_actor_fields() {
        let store = MemoryStore::new();
        let actor = actor();
        let entity_id = Uuid::now_v7();

        recorder(&store)
            .record(
                AuditAction::Create,
                AuditEntity::Account,
                Some(entity_id),
                &actor,
                Some(json!({"name": "Cash"})),
            )
            .await;

        let (entries, total) = store
            .list_audit(actor.company_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        let entry = &entries[0];
        assert_eq!(entry.user_id, actor.user_id);
        assert_eq!(entry.user_name, "Ada");
        assert_eq!(entry.user_email, "ada@example.com");
        assert_eq!(entry.ip_address.as_deref(), Some("192.0.2.7"));
        assert_eq!(entry.user_agent.as_deref(), Some("test-agent"));
        assert_eq!(entry.entity_id, Some(entity_id));
        assert_eq!(entry.changes, Some(json!({"name": "Cash"})));
        assert_eq!(
            entry.created_at,
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
        );
    }

    #[tokio::test]
    async fn test_record_swallows_store_failure() {
        let store = MemoryStore::new();
        store.fail_audit_writes(true);
        let actor = actor();

        recorder(&store)
            .record(AuditAction::Delete, AuditEntity::Budget, None, &actor, None)
            .await;

        assert_eq!(store.audit_attempts(), 1);
        let (_, total) = store
            .list_audit(actor.company_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 0);
    }
}
