//! Category management.

use ledgerly_shared::types::CategoryId;
use ledgerly_shared::{AppError, AppResult};
use serde_json::json;
use tracing::info;

use crate::audit::{AuditAction, AuditEntity};
use crate::auth::{Actor, Role, can_manage_categories};
use crate::category::types::{
    Category, CategoryPatch, DEFAULT_CATEGORIES, DEFAULT_CATEGORY_COLOR, NewCategory,
};
use crate::context::ServiceContext;
use crate::validate::{non_empty, non_empty_opt};

/// Create, list, edit and deactivate categories.
#[derive(Debug, Clone)]
pub struct CategoryService {
    ctx: ServiceContext,
}

impl CategoryService {
    /// Creates the service.
    #[must_use]
    pub const fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Creates a category.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for a blank name.
    pub async fn create(&self, actor: &Actor, input: NewCategory) -> AppResult<Category> {
        actor.require(can_manage_categories, "manage categories")?;
        let name = non_empty(&input.name, "Name")?;
        let color = input
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());

        let now = self.ctx.now();
        let category = Category {
            id: self.ctx.next_id(),
            company_id: actor.company_id,
            name,
            category_type: input.category_type,
            color,
            icon: input.icon,
            description: input.description,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.insert(actor, &category).await?;
        Ok(category)
    }

    /// Seeds the standard income and expense categories into the actor's company.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Internal` on store failure.
    pub async fn seed_defaults(&self, actor: &Actor) -> AppResult<Vec<Category>> {
        actor.require(can_manage_categories, "manage categories")?;
        let now = self.ctx.now();
        let mut created = Vec::with_capacity(DEFAULT_CATEGORIES.len());
        for template in &DEFAULT_CATEGORIES {
            let category = template.build(self.ctx.next_id(), actor.company_id, now);
            self.insert(actor, &category).await?;
            created.push(category);
        }
        info!(company_id = %actor.company_id, count = created.len(), "Default categories seeded");
        Ok(created)
    }

    /// Active categories of the actor's company, by name.
    ///
    /// # Errors
    ///
    /// `Internal` on store failure.
    pub async fn list(&self, actor: &Actor) -> AppResult<Vec<Category>> {
        actor.require_level(Role::Employee.level(), "view categories")?;
        Ok(self.ctx.store.list_categories(actor.company_id).await?)
    }

    /// Edits display attributes. The type never changes.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `Validation` for a blank name; `NotFound`
    /// outside the company.
    pub async fn update(
        &self,
        actor: &Actor,
        id: CategoryId,
        mut patch: CategoryPatch,
    ) -> AppResult<Category> {
        actor.require(can_manage_categories, "manage categories")?;
        patch.name = non_empty_opt(patch.name.as_ref(), "Name")?;
        patch.is_active = None;

        let category = self.write(actor, id, &patch).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Update,
                AuditEntity::Category,
                Some(id.into_inner()),
                actor,
                Some(json!({ "name": category.name })),
            )
            .await;
        Ok(category)
    }

    /// Soft-deletes a category.
    ///
    /// # Errors
    ///
    /// `Unauthorized` below admin; `NotFound` outside the company.
    pub async fn delete(&self, actor: &Actor, id: CategoryId) -> AppResult<()> {
        actor.require(can_manage_categories, "manage categories")?;
        self.write(actor, id, &CategoryPatch::deactivate()).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Delete,
                AuditEntity::Category,
                Some(id.into_inner()),
                actor,
                None,
            )
            .await;
        Ok(())
    }

    async fn insert(&self, actor: &Actor, category: &Category) -> AppResult<()> {
        self.ctx.store.insert_category(category).await?;
        self.ctx
            .audit()
            .record(
                AuditAction::Create,
                AuditEntity::Category,
                Some(category.id.into_inner()),
                actor,
                Some(json!({
                    "name": category.name,
                    "type": category.category_type.as_str(),
                })),
            )
            .await;
        Ok(())
    }

    async fn write(
        &self,
        actor: &Actor,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> AppResult<Category> {
        let store = &self.ctx.store;
        if !store
            .update_category(actor.company_id, id, patch, self.ctx.now())
            .await?
        {
            return Err(AppError::not_found("Category"));
        }
        store
            .find_category(actor.company_id, id)
            .await?
            .ok_or_else(|| AppError::not_found("Category"))
    }
}
