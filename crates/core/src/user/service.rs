//! Team management.

use ledgerly_shared::types::UserId;
use ledgerly_shared::{AppError, AppResult};
use serde_json::json;
use tracing::info;

use crate::audit::{AuditAction, AuditEntity};
use crate::auth::{Actor, Role, is_super_admin};
use crate::context::ServiceContext;

/// Role changes within a company.
#[derive(Debug, Clone)]
pub struct TeamService {
    ctx: ServiceContext,
}

impl TeamService {
    /// Creates the service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Gives `user_id` the role named by `new_role`.
    ///
    /// Only a super admin may do this, and only within their own company.
    ///
    /// # Errors
    ///
    /// * `Unauthorized` unless the actor is exactly `super_admin`
    /// * `Validation` when `new_role` names no role
    /// * `NotFound` when the user is not in the actor's company
    pub async fn update_user_role(
        &self,
        actor: &Actor,
        user_id: UserId,
        new_role: &str,
    ) -> AppResult<()> {
        actor.require(is_super_admin, "change user roles")?;
        let role = Role::parse(new_role)
            .ok_or_else(|| AppError::Validation(format!("Invalid role: {new_role}")))?;

        let updated = self
            .ctx
            .store
            .update_user_role(actor.company_id, user_id, role, self.ctx.now())
            .await?;
        if !updated {
            return Err(AppError::not_found("User"));
        }

        info!(
            company_id = %actor.company_id,
            user_id = %user_id,
            role = %role,
            "User role updated"
        );
        self.ctx
            .audit()
            .record(
                AuditAction::Update,
                AuditEntity::User,
                Some(user_id.into_inner()),
                actor,
                Some(json!({ "new_role": role.as_str() })),
            )
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use ledgerly_shared::types::{CompanyId, PageRequest};
    use rstest::rstest;

    use crate::store::{EntityStore, MemoryStore};
    use crate::user::User;

    async fn seed_user(store: &MemoryStore, company_id: CompanyId, role: Role) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            company_id,
            email: format!("{}@example.com", UserId::new()),
            name: "Sam".into(),
            role,
            email_verified: true,
            verify_code: None,
            verify_expires_at: None,
            last_email_sent_at: None,
            created_at: now,
            updated_at: now,
        };
        store.insert_user(&user).await.unwrap();
        user
    }

    fn actor_for(user: User) -> Actor {
        Actor::from_user(user, crate::auth::RequestMeta::default())
    }

    #[tokio::test]
    async fn test_super_admin_changes_role_and_audits() {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let boss = actor_for(seed_user(&store, company, Role::SuperAdmin).await);
        let target = seed_user(&store, company, Role::Employee).await;
        let service = TeamService::new(ServiceContext::system(Arc::new(store.clone())));

        service
            .update_user_role(&boss, target.id, "manager")
            .await
            .unwrap();

        let stored = store.find_user(target.id).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::Manager);

        let (entries, _) = store.list_audit(company, PageRequest::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].entity, AuditEntity::User);
        assert_eq!(entries[0].changes, Some(json!({"new_role": "manager"})));
    }

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Developer)]
    #[tokio::test]
    async fn test_only_super_admin_may_change_roles(#[case] role: Role) {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let actor = actor_for(seed_user(&store, company, role).await);
        let target = seed_user(&store, company, Role::Employee).await;
        let service = TeamService::new(ServiceContext::system(Arc::new(store)));

        let err = service
            .update_user_role(&actor, target.id, "admin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_invalid_role_and_foreign_user() {
        let store = MemoryStore::new();
        let company = CompanyId::new();
        let boss = actor_for(seed_user(&store, company, Role::SuperAdmin).await);
        let local = seed_user(&store, company, Role::Employee).await;
        let foreign = seed_user(&store, CompanyId::new(), Role::Employee).await;
        let service = TeamService::new(ServiceContext::system(Arc::new(store.clone())));

        let err = service
            .update_user_role(&boss, local.id, "overlord")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = service
            .update_user_role(&boss, foreign.id, "admin")
            .await
            .unwrap_err();
        assert_eq!(err, AppError::NotFound("User not found".into()));
        let untouched = store.find_user(foreign.id).await.unwrap().unwrap();
        assert_eq!(untouched.role, Role::Employee);
    }
}
