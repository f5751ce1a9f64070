//! Money accounts.

use chrono::{DateTime, Utc};
use ledgerly_shared::types::{AccountId, CompanyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::error::LedgerError;

/// Kind of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Bank account.
    Bank,
    /// Petty cash.
    Cash,
    /// Credit card.
    Credit,
    /// Digital wallet.
    Wallet,
    /// Anything else.
    Other,
}

/// All account types.
pub const ACCOUNT_TYPES: [AccountType; 5] = [
    AccountType::Bank,
    AccountType::Cash,
    AccountType::Credit,
    AccountType::Wallet,
    AccountType::Other,
];

impl AccountType {
    /// Returns the string representation of the account type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Cash => "cash",
            Self::Credit => "credit",
            Self::Wallet => "wallet",
            Self::Other => "other",
        }
    }

    /// Parses an account type from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bank" => Some(Self::Bank),
            "cash" => Some(Self::Cash),
            "credit" => Some(Self::Credit),
            "wallet" => Some(Self::Wallet),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bank => "Bank Account",
            Self::Cash => "Cash",
            Self::Credit => "Credit Card",
            Self::Wallet => "Digital Wallet",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A company money account.
///
/// `balance` is only ever changed by approving transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Display name.
    pub name: String,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Currency code.
    pub currency: String,
    /// Free text.
    pub description: Option<String>,
    /// External account number.
    pub account_number: Option<String>,
    /// Signed running balance.
    pub balance: Decimal,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Adds money to the account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::NonPositiveAmount` for zero or negative amounts.
    pub fn credit(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        self.balance += amount;
        self.updated_at = now;
        Ok(())
    }

    /// Removes money from the account, refusing to go below zero.
    ///
    /// The approval path does not go through here; it applies additive
    /// deltas in the store and lets balances go negative.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::InsufficientBalance` when `amount` exceeds the balance.
    pub fn debit(&mut self, amount: Decimal, now: DateTime<Utc>) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount(amount));
        }
        if self.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                balance: self.balance,
                amount,
            });
        }
        self.balance -= amount;
        self.updated_at = now;
        Ok(())
    }
}

/// Caller input for a new account. Opening balance is always zero.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Kind of account.
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Currency code.
    pub currency: String,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// External account number.
    #[serde(default)]
    pub account_number: Option<String>,
}

/// Editable account fields. The balance is not one of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AccountPatch {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New kind.
    #[serde(default, rename = "type")]
    pub account_type: Option<AccountType>,
    /// New currency.
    #[serde(default)]
    pub currency: Option<String>,
    /// New description.
    #[serde(default)]
    pub description: Option<String>,
    /// New account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Activation flag; only set by deactivation.
    #[serde(skip)]
    pub is_active: Option<bool>,
}

impl AccountPatch {
    /// Patch that soft-deletes the account.
    #[must_use]
    pub fn deactivate() -> Self {
        Self {
            is_active: Some(false),
            ..Self::default()
        }
    }

    /// Applies the patch to an in-memory account.
    pub fn apply_to(&self, account: &mut Account, now: DateTime<Utc>) {
        if let Some(name) = &self.name {
            account.name.clone_from(name);
        }
        if let Some(account_type) = self.account_type {
            account.account_type = account_type;
        }
        if let Some(currency) = &self.currency {
            account.currency.clone_from(currency);
        }
        if let Some(description) = &self.description {
            account.description = Some(description.clone());
        }
        if let Some(number) = &self.account_number {
            account.account_number = Some(number.clone());
        }
        if let Some(active) = self.is_active {
            account.is_active = active;
        }
        account.updated_at = now;
    }
}
