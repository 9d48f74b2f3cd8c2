//! Storage interfaces consumed by the ledger.
//!
//! These traits are implemented by the db crate. Services hold them as
//! `Arc<dyn _>` handles so tests can substitute in-memory fakes.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::NaiveDate;
use jam3ya_shared::AppError;
use jam3ya_shared::types::{MemberId, SubjectId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::{Member, Subject, Transaction};

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Row not found.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Kind of row.
        entity: &'static str,
        /// Key that was looked up.
        key: String,
    },

    /// Unique key already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Input rejected before reaching the database.
    #[error("validation error: {0}")]
    Validation(String),

    /// Database failure.
    #[error("database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Validation(msg) => Self::Validation(msg),
            StoreError::Database(msg) => Self::Database(msg),
        }
    }
}

/// Direction of an admin posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Money into the fund.
    Income,
    /// Money out of the fund.
    Expense,
}

impl EntryType {
    /// Applies this type's sign to the magnitude of `amount`.
    #[must_use]
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Self::Income => amount.abs(),
            Self::Expense => -amount.abs(),
        }
    }
}

impl FromStr for EntryType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(StoreError::Validation(format!("unknown entry type: {other}"))),
        }
    }
}

/// Writable columns of a transaction row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionFields {
    /// Value date.
    pub date: Option<NaiveDate>,
    /// Subject label.
    pub subject: String,
    /// Member code or payee/payer.
    pub item: String,
    /// Free-text details.
    pub details: String,
    /// Amount text as it will be stored.
    pub amount: String,
    /// Counted toward balances once true.
    pub approved: bool,
    /// Submitted by a member.
    pub created_by_member: bool,
}

impl TransactionFields {
    /// An approved admin posting; the stored sign follows `entry_type`.
    #[must_use]
    pub fn admin_posting(
        date: NaiveDate,
        subject: impl Into<String>,
        item: impl Into<String>,
        details: impl Into<String>,
        entry_type: EntryType,
        amount: Decimal,
    ) -> Self {
        Self {
            date: Some(date),
            subject: subject.into(),
            item: item.into(),
            details: details.into(),
            amount: entry_type.signed(amount).normalize().to_string(),
            approved: true,
            created_by_member: false,
        }
    }

    /// A member's own contribution, pending until an admin approves it.
    #[must_use]
    pub fn member_submission(
        date: NaiveDate,
        contribution_subject: impl Into<String>,
        member_code: &str,
        year: Option<i32>,
        amount: Decimal,
    ) -> Self {
        Self {
            date: Some(date),
            subject: contribution_subject.into(),
            item: member_code.trim().to_string(),
            details: year.map(|y| y.to_string()).unwrap_or_default(),
            amount: amount.abs().normalize().to_string(),
            approved: false,
            created_by_member: true,
        }
    }
}

/// Writable columns of a member row.
///
/// `id` selects the row to update; `None` inserts. A blank `code` on insert
/// is assigned automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct MemberFields {
    pub id: Option<MemberId>,
    pub code: Option<String>,
    pub name: String,
    pub nickname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub is_admin: bool,
    pub notes: Option<String>,
}

impl MemberFields {
    /// An active, non-admin member with only a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            active: true,
            ..Self::default()
        }
    }

    /// Requested code with whitespace removed, `None` when blank.
    #[must_use]
    pub fn requested_code(&self) -> Option<&str> {
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Transaction persistence.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions ordered by date then id, ascending.
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Transactions whose trimmed item equals `item`, same order.
    async fn list_transactions_for_item(&self, item: &str)
    -> Result<Vec<Transaction>, StoreError>;

    /// Inserts a row and returns its id.
    async fn insert_transaction(
        &self,
        fields: TransactionFields,
    ) -> Result<TransactionId, StoreError>;

    /// Overwrites date, subject, item, details and amount of a row.
    async fn update_transaction(
        &self,
        id: TransactionId,
        fields: TransactionFields,
    ) -> Result<(), StoreError>;

    /// Removes a row.
    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError>;

    /// Marks a pending row approved.
    async fn set_approved(&self, id: TransactionId) -> Result<(), StoreError>;

    /// Relabels every transaction posted under `old` to `new`.
    /// Returns the number of rows changed.
    async fn rename_subject(&self, old: &str, new: &str) -> Result<u64, StoreError>;

    /// Inserts `rows` as one unit, first removing every existing row when
    /// `replace` is set. On failure the ledger is left as it was.
    /// Returns the number of rows inserted.
    async fn import_transactions(
        &self,
        rows: Vec<TransactionFields>,
        replace: bool,
    ) -> Result<u64, StoreError>;
}

/// Member persistence.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// All members ordered by name.
    async fn list_members(&self) -> Result<Vec<Member>, StoreError>;

    /// Looks a member up by trimmed code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, StoreError>;

    /// Inserts or updates a member and returns the stored row.
    async fn upsert_member(&self, fields: MemberFields) -> Result<Member, StoreError>;

    /// Upserts every row as one unit; nothing is saved if any row fails.
    async fn import_members(&self, rows: Vec<MemberFields>) -> Result<Vec<Member>, StoreError>;

    /// Activates or deactivates the member with `code`.
    async fn set_active(&self, code: &str, active: bool) -> Result<(), StoreError>;

    /// Removes a member. Their transactions are kept.
    async fn delete_member(&self, id: MemberId) -> Result<(), StoreError>;
}

/// Subject catalogue persistence.
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// All subjects ordered by name.
    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError>;

    /// Adds a subject. Duplicate names are a conflict.
    async fn add_subject(&self, name: &str) -> Result<Subject, StoreError>;

    /// Renames a subject and every transaction posted under the old name.
    /// Returns the number of transactions relabelled.
    async fn rename_subject(&self, id: SubjectId, new_name: &str) -> Result<u64, StoreError>;

    /// Removes a subject from the catalogue. Transactions keep their label.
    async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError>;
}
