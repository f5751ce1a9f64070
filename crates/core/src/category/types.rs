//! Category data types and the default category set.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{CategoryId, CompanyId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Color given to categories created without one.
pub const DEFAULT_CATEGORY_COLOR: &str = "#6366f1";

/// Whether a category classifies income or expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Income category.
    Income,
    /// Expense category.
    Expense,
}

impl CategoryType {
    /// Returns the string representation of the category type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Parses a category type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Income or expense. Fixed after creation.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Hex color.
    pub color: String,
    /// Icon name.
    pub icon: Option<String>,
    /// Free text.
    pub description: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Caller input for a new category.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Income or expense.
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    /// Defaults to [`DEFAULT_CATEGORY_COLOR`].
    #[serde(default)]
    pub color: Option<String>,
    /// Icon name.
    #[serde(default)]
    pub icon: Option<String>,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
}

/// Display attributes that may change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CategoryPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New color.
    #[serde(default)]
    pub color: Option<String>,
    /// New icon.
    #[serde(default)]
    pub icon: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// Activation flag; only set by deactivation.
    #[serde(skip)]
    pub is_active: Option<bool>,
}

impl CategoryPatch {
    /// Patch that soft-deletes the category.
    #[must_use]
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    /// Applies the patch to an in-memory category.
    pub fn apply_to(&self, category: &mut Category, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            category.name.clone_from(name);
        }
        if let Some(color) = &self.color {
            category.color.clone_from(color);
        }
        if let Some(icon) = &self.icon {
            category.icon = Some(icon.clone());
        }
        if let Some(description) = &self.description {
            category.description = Some(description.clone());
        }
        if let Some(active) = self.is_active {
            category.is_active = active;
        }
        category.updated_at = now;
    }
}

/// Template for one of the categories every company starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultCategory {
    /// Display name.
    pub name: &'static str,
    /// Income or expense.
    pub category_type: CategoryType,
    /// Hex color.
    pub color: &'static str,
    /// Icon name.
    pub icon: &'static str,
}

const fn default_category(
    name: &'static str,
    category_type: CategoryType,
    color: &'static str,
    icon: &'static str,
) -> DefaultCategory {
    DefaultCategory {
        name,
        category_type,
        color,
        icon,
    }
}

/// Categories seeded for a new company: 4 income, 8 expense.
pub const DEFAULT_CATEGORIES: [DefaultCategory; 12] = [
    default_category("Sales", CategoryType::Income, "#22c55e", "dollar-sign"),
    default_category("Services", CategoryType::Income, "#3b82f6", "briefcase"),
    default_category("Investment", CategoryType::Income, "#8b5cf6", "trending-up"),
    default_category("Other Income", CategoryType::Income, "#06b6d4", "plus-circle"),
    default_category("Payroll", CategoryType::Expense, "#ef4444", "users"),
    default_category("Office Supplies", CategoryType::Expense, "#f97316", "package"),
    default_category("Utilities", CategoryType::Expense, "#eab308", "zap"),
    default_category("Rent", CategoryType::Expense, "#84cc16", "home"),
    default_category("Marketing", CategoryType::Expense, "#ec4899", "megaphone"),
    default_category("Travel", CategoryType::Expense, "#14b8a6", "plane"),
    default_category("Software", CategoryType::Expense, "#6366f1", "code"),
    default_category("Other Expense", CategoryType::Expense, "#64748b", "minus-circle"),
];

impl DefaultCategory {
    /// Materializes the template for a company.
    #[must_use]
    pub fn build(&self, id: CategoryId, company_id: CompanyId, now: DateTime<Utc>) -> Category {
        Category {
            id,
            company_id,
            name: self.name.to_string(),
            category_type: self.category_type,
            color: self.color.to_string(),
            icon: Some(self.icon.to_string()),
            description: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}
