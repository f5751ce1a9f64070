//! Budget data types.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use ledgerly_shared::types::{BudgetId, CategoryId, CompanyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Budget period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// Calendar month.
    Monthly,
    /// Calendar quarter.
    Quarterly,
    /// Calendar year.
    Yearly,
}

impl BudgetPeriod {
    /// Returns the string representation of the period.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a period from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }

    const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Quarterly => 3,
            Self::Yearly => 12,
        }
    }

    /// First and last day (inclusive) of the period containing `reference`.
    ///
    /// Returns `None` only at the edge of the representable calendar.
    #[must_use]
    pub fn bounds(self, reference: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start_month = match self {
            Self::Monthly => reference.month(),
            Self::Quarterly => (reference.month0() / 3) * 3 + 1,
            Self::Yearly => 1,
        };
        let start = NaiveDate::from_ymd_opt(reference.year(), start_month, 1)?;
        let end = start
            .checked_add_months(Months::new(self.months()))?
            .pred_opt()?;
        Some((start, end))
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A spending limit for one category.
///
/// `spent` only ever changes through approvals of expense transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Tracked category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// The limit.
    pub amount: Decimal,
    /// Running total of approved spending.
    pub spent: Decimal,
    /// Currency code.
    pub currency: String,
    /// Period kind.
    pub period: BudgetPeriod,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Amount left before the limit, never negative.
    #[must_use]
    pub fn remaining(&self) -> Decimal {
        (self.amount - self.spent).max(Decimal::ZERO)
    }

    /// `spent / amount * 100` rounded to 2 places; zero when the limit is zero.
    #[must_use]
    pub fn utilization(&self) -> Decimal {
        if self.amount.is_zero() {
            Decimal::ZERO
        } else {
            (self.spent / self.amount * Decimal::ONE_HUNDRED).round_dp(2)
        }
    }

    /// Spending strictly above the limit.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.amount
    }

    /// `true` when spending `amount` more stays within the limit.
    #[must_use]
    pub fn can_spend(&self, amount: Decimal) -> bool {
        self.spent + amount <= self.amount
    }
}

/// A budget together with its derived figures, as returned by listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetStatus {
    /// The budget row.
    #[serde(flatten)]
    pub budget: Budget,
    /// See [`Budget::remaining`].
    pub remaining: Decimal,
    /// See [`Budget::utilization`].
    pub utilization: Decimal,
    /// See [`Budget::is_over_budget`].
    pub is_over_budget: bool,
}

impl From<Budget> for BudgetStatus {
    fn from(budget: Budget) -> Self {
        Self {
            remaining: budget.remaining(),
            utilization: budget.utilization(),
            is_over_budget: budget.is_over_budget(),
            budget,
        }
    }
}

/// Caller input for a new budget.
#[derive(Debug, Clone, Deserialize)]
pub struct NewBudget {
    /// Tracked category.
    pub category_id: CategoryId,
    /// Display name.
    pub name: String,
    /// Must be positive.
    pub amount: Decimal,
    /// Defaults to USD.
    #[serde(default)]
    pub currency: Option<String>,
    /// Period kind.
    pub period: BudgetPeriod,
}

/// Editable budget fields. `spent` is not one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BudgetPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New limit, must be positive.
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// Activation flag; only set by deactivation.
    #[serde(skip)]
    pub is_active: Option<bool>,
}

impl BudgetPatch {
    /// Patch that soft-deletes the budget.
    #[must_use]
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    /// Applies the patch to an in-memory budget.
    pub fn apply_to(&self, budget: &mut Budget, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            budget.name.clone_from(name);
        }
        if let Some(amount) = self.amount {
            budget.amount = amount;
        }
        if let Some(active) = self.is_active {
            budget.is_active = active;
        }
        budget.updated_at = now;
    }
}
