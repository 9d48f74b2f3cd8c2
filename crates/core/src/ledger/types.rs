//! Ledger domain types.

use chrono::NaiveDate;
use jam3ya_shared::types::{MemberId, SubjectId, TransactionId, parse_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A fund transaction as supplied by the store.
///
/// `amount` is the stored text. Positive values are income or contributions,
/// negative values are expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Row key; breaks ties between same-date transactions.
    pub id: TransactionId,
    /// Value date. `None` when missing or unparseable in storage.
    pub date: Option<NaiveDate>,
    /// Free-text category label.
    pub subject: String,
    /// Member code or free-text payee/payer.
    pub item: String,
    /// Free-text details, may cite the years a contribution covers.
    pub details: String,
    /// Signed amount exactly as stored.
    pub amount: String,
    /// Pending transactions (`false`) do not move the balance.
    pub approved: bool,
    /// Submitted by a member rather than an admin.
    pub created_by_member: bool,
}

impl Transaction {
    /// Parses the stored amount, `None` when it is not a number.
    #[must_use]
    pub fn parsed_amount(&self) -> Option<Decimal> {
        parse_amount(&self.amount)
    }

    /// Amount counted toward balances: zero when pending or unparseable.
    #[must_use]
    pub fn effective_amount(&self) -> Decimal {
        if self.approved {
            self.parsed_amount().unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        }
    }

    /// Item with surrounding whitespace removed, as matched against member codes.
    #[must_use]
    pub fn item_key(&self) -> &str {
        self.item.trim()
    }
}

/// A fund member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Row key.
    pub id: MemberId,
    /// Unique code matched against `Transaction::item`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Optional nickname used in name search.
    pub nickname: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
    /// Address for reminders.
    pub email: Option<String>,
    /// Inactive members are left out of unpaid lists and statistics.
    pub active: bool,
    /// Member may also act as an administrator.
    pub is_admin: bool,
    /// Free-text notes.
    pub notes: Option<String>,
}

impl Member {
    /// Code with surrounding whitespace removed.
    #[must_use]
    pub fn code_key(&self) -> &str {
        self.code.trim()
    }

    /// Trimmed e-mail address, `None` when absent or blank.
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// A subject label from the subject catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Row key.
    pub id: SubjectId,
    /// Unique label.
    pub name: String,
}
