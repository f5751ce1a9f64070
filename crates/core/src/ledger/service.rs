//! Account management.

use ledgerly_shared::types::AccountId;
use ledgerly_shared::{AppError, AppResult};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::info;

use crate::audit::{AuditAction, AuditEntity};
use crate::auth::{Actor, Role, can_manage_accounts};
use crate::context::ServiceContext;
use crate::ledger::account::{Account, AccountPatch, NewAccount};
use crate::validate::{non_empty, non_empty_opt};

/// Create, list, edit and deactivate company accounts.
#[derive(Debug, Clone)]
pub struct AccountService {
    ctx: ServiceContext,
}

impl AccountService {
    /// Creates the service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates an account with a zero balance.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for a blank name or currency.
    pub async fn create(&self, actor: &Actor, input: NewAccount) -> AppResult<Account> {
        actor.require(can_manage_accounts, "manage accounts")?;
        let name = non_empty(&input.name, "Name")?;
        let currency = non_empty(&input.currency, "Currency")?.to_uppercase();

        let now = self.ctx.now();
        let account = Account {
            id: self.ctx.next_id(),
            company_id: actor.company_id,
            name,
            account_type: input.account_type,
            currency,
            description: input.description,
            account_number: input.account_number,
            balance: Decimal::ZERO,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.ctx.store.insert_account(&account).await?;

        info!(company_id = %account.company_id, account_id = %account.id, "Account created");
        self.ctx
            .audit()
            .record(
                AuditAction::Create,
                AuditEntity::Account,
                Some(account.id.into_inner()),
                actor,
                Some(json!({
                    "name": account.name,
                    "type": account.account_type.as_str(),
                    "currency": account.currency,
                })),
            )
            .await;
        Ok(account)
    }

    /// Active accounts of the actor's company, by name.
    ///
    /// # Errors
    ///
    /// `Internal` on store failure.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Account>> {
        actor.require_level(Role::Employee.level(), "view accounts")?;
        Ok(self.ctx.store.list_accounts(actor.company_id).await?)
    }

    /// Edits name, type, currency, description or account number.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for blank replacements;
    /// `NotFound` outside the company.
    pub async fn update(
        &self,
        actor: &Actor,
        id: AccountId,
        mut patch: AccountPatch,
    ) -> AppResult<Account> {
        actor.require(can_manage_accounts, "manage accounts")?;
        patch.name = non_empty_opt(patch.name.as_ref(), "Name")?;
        patch.currency =
            non_empty_opt(patch.currency.as_ref(), "Currency")?.map(|c| c.to_uppercase());
        patch.is_active = None;

        let account = self.write(actor, id, &patch).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Update,
                AuditEntity::Account,
                Some(id.into_inner()),
                actor,
                Some(json!({ "name": account.name })),
            )
            .await;
        Ok(account)
    }

    /// Soft-deletes an account. Its balance and history are kept.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `NotFound` outside the company.
    pub async fn delete(&self, actor: &Actor, id: AccountId) -> AppResult<()> {
        actor.require(can_manage_accounts, "manage accounts")?;
        self.write(actor, id, &AccountPatch::deactivate()).await?;
        info!(company_id = %actor.company_id, account_id = %id, "Account deactivated");
        self.ctx
            .audit()
            .record(
                AuditAction::Delete,
                AuditEntity::Account,
                Some(id.into_inner()),
                actor,
                None,
            )
            .await;
        Ok(())
    }

    async fn write(&self, actor: &Actor, id: AccountId, patch: &AccountPatch) -> AppResult<Account> {
        let store = &self.ctx.store;
        if !store
            .update_account(actor.company_id, id, patch, self.ctx.now())
            .await?
        {
            return Err(AppError::not_found("Account"));
        }
        store
            .find_account(actor.company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Account"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ledgerly_shared::types::{CompanyId, PageRequest, UserId};
    use rstest::rstest;
    use serde_json::Value;

    use crate::ledger::AccountType;
    use crate::store::{EntityStore, MemoryStore};

    fn actor(company_id: CompanyId, role: Role) -> Actor {
        Actor {
            user_id: UserId::new(),
            company_id,
            role,
            name: "Ada".into(),
            email: "ada@example.com".into(),
            ip_address: None,
            user_agent: None,
        }
    }

    fn new_account(name: &str) -> NewAccount {
        NewAccount {
            name: name.into(),
            account_type: AccountType::Bank,
            currency: "usd".into(),
            description: None,
            account_number: Some("0042".into()),
        }
    }

    fn service(store: &MemoryStore) -> AccountService {
        AccountService::new(ServiceContext::system(Arc::new(store.clone())))
    }

    #[tokio::test]
    async fn test_create_starts_at_zero_and_audits() {
        let store = MemoryStore::new();
        let admin = actor(CompanyId::new(), Role::Admin);

        let account = service(&store)
            .create(&admin, new_account(" Operating "))
            .await
            .unwrap();

        assert_eq!(account.name, "Operating");
        assert_eq!(account.currency, "USD");
        assert_eq!(account.balance, Decimal::ZERO);
        assert!(account.is_active);

        let (entries, _) = store
            .list_audit(admin.company_id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(entries[0].action, AuditAction::Create);
        let changes = entries[0].changes.clone().unwrap();
        assert_eq!(changes["type"], Value::from("bank"));
        assert_eq!(changes["currency"], Value::from("USD"));
    }

    #[rstest]
    #[case(Role::Employee)]
    #[case(Role::Holder)]
    #[case(Role::Accountant)]
    #[case(Role::Manager)]
    #[tokio::test]
    async fn test_create_requires_admin(#[case] role: Role) {
        let store = MemoryStore::new();
        let err = service(&store)
            .create(&actor(CompanyId::new(), role), new_account("Petty cash"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = MemoryStore::new();
        let err = service(&store)
            .create(&actor(CompanyId::new(), Role::Admin), new_account("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_and_delete_stay_in_company() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let admin = actor(CompanyId::new(), Role::Admin);
        let outsider = actor(CompanyId::new(), Role::Admin);
        let account = svc.create(&admin, new_account("Cash")).await.unwrap();

        let patch = AccountPatch {
            name: Some("Main cash".into()),
            ..AccountPatch::default()
        };
        let err = svc
            .update(&outsider, account.id, patch.clone())
            .await
            .unwrap_err();
        assert_eq!(err, AppError::NotFound("Account not found".into()));

        let updated = svc.update(&admin, account.id, patch).await.unwrap();
        assert_eq!(updated.name, "Main cash");
        assert_eq!(updated.account_number.as_deref(), Some("0042"));

        svc.delete(&admin, account.id).await.unwrap();
        assert!(svc.list(&admin).await.unwrap().is_empty());
        let kept = store
            .find_account(admin.company_id, account.id)
            .await
            .unwrap()
            .unwrap();
        assert!(!kept.is_active);
    }

    #[tokio::test]
    async fn test_list_sorted_by_name() {
        let store = MemoryStore::new();
        let svc = service(&store);
        let admin = actor(CompanyId::new(), Role::Admin);
        for name in ["Savings", "Card", "Payroll"] {
            svc.create(&admin, new_account(name)).await.unwrap();
        }
        let employee = actor(admin.company_id, Role::Employee);
        let names: Vec<String> = svc
            .list(&employee)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, ["Card", "Payroll", "Savings"]);
    }
}
