//! Running-balance projection of the fund ledger.
//!
//! The projector replays transactions in the order the store returns them
//! (date ascending, id ascending) and never re-sorts. Balances accumulate at
//! full decimal precision; rounding happens only in the display helpers.

use std::collections::HashMap;

use chrono::NaiveDate;
use jam3ya_shared::types::{amount::round_for_display, format_amount};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::types::Transaction;

/// A transaction annotated with its running balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedTransaction {
    /// The source transaction, unchanged.
    pub transaction: Transaction,
    /// Parsed amount, zero when the stored text is not a number.
    pub amount: Decimal,
    /// Whether the stored amount parsed.
    pub amount_valid: bool,
    /// Amount counted toward balances and totals.
    pub effective_amount: Decimal,
    /// Balance after this transaction, full precision.
    pub balance: Decimal,
}

impl ProjectedTransaction {
    /// True while the transaction awaits approval.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        !self.transaction.approved
    }

    /// Balance rounded to the display scale.
    #[must_use]
    pub fn rounded_balance(&self) -> Decimal {
        round_for_display(self.balance)
    }

    /// Balance formatted with three decimal places.
    #[must_use]
    pub fn display_balance(&self) -> String {
        format_amount(self.balance)
    }

    /// Amount formatted with three decimals, or the raw text when it did not parse.
    #[must_use]
    pub fn display_amount(&self) -> String {
        if self.amount_valid {
            format_amount(self.amount)
        } else {
            self.transaction.amount.clone()
        }
    }
}

/// Transactions sharing one subject label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectGroup {
    /// Subject label; empty for transactions without one.
    pub name: String,
    /// Sum of effective amounts.
    pub total: Decimal,
    /// Most recent first.
    pub transactions: Vec<ProjectedTransaction>,
    /// Latest date seen in the group.
    pub last_date: Option<NaiveDate>,
}

/// Result of a ledger projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerResult {
    /// All transactions, most recent first.
    pub transactions: Vec<ProjectedTransaction>,
    /// Subject groups, most recently active first.
    pub subjects: Vec<SubjectGroup>,
    /// Sum of positive effective amounts.
    pub total_income: Decimal,
    /// Sum of the magnitudes of negative effective amounts.
    pub total_expense: Decimal,
    /// Balance before the first transaction.
    pub opening_balance: Decimal,
    /// Balance after the last transaction.
    pub closing_balance: Decimal,
}

impl LedgerResult {
    /// Transactions in replay order (oldest first).
    pub fn chronological(&self) -> impl DoubleEndedIterator<Item = &ProjectedTransaction> {
        self.transactions.iter().rev()
    }

    /// Transactions awaiting approval, most recent first.
    pub fn pending(&self) -> impl Iterator<Item = &ProjectedTransaction> {
        self.transactions.iter().filter(|t| t.is_pending())
    }

    /// Transactions whose stored amount did not parse.
    pub fn malformed(&self) -> impl Iterator<Item = &ProjectedTransaction> {
        self.transactions.iter().filter(|t| !t.amount_valid)
    }

    /// Net movement over the projected range.
    #[must_use]
    pub fn net_change(&self) -> Decimal {
        self.total_income - self.total_expense
    }
}

#[derive(Debug, Clone, Copy)]
struct RunningTotals {
    balance: Decimal,
    income: Decimal,
    expense: Decimal,
}

impl RunningTotals {
    /// Totals after counting `amount`, or `None` if any of them overflows.
    fn add(self, amount: Decimal) -> Option<Self> {
        let balance = self.balance.checked_add(amount)?;
        let (mut income, mut expense) = (self.income, self.expense);
        if amount > Decimal::ZERO {
            income = income.checked_add(amount)?;
        } else if amount < Decimal::ZERO {
            expense = expense.checked_add(amount.abs())?;
        }
        Some(Self {
            balance,
            income,
            expense,
        })
    }
}

/// Stateless projector over an ordered transaction list.
pub struct LedgerProjector;

impl LedgerProjector {
    /// Replays `transactions` from `opening_balance`.
    ///
    /// The input must already be ordered by (date, id); the output is not
    /// meaningful otherwise.
    #[must_use]
    pub fn project(transactions: &[Transaction], opening_balance: Decimal) -> LedgerResult {
        let mut totals = RunningTotals {
            balance: opening_balance,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        };
        let mut projected = Vec::with_capacity(transactions.len());
        let mut subjects: Vec<SubjectGroup> = Vec::new();
        let mut subject_index: HashMap<&str, usize> = HashMap::new();

        for transaction in transactions {
            let index = *subject_index
                .entry(transaction.subject.as_str())
                .or_insert_with(|| {
                    subjects.push(SubjectGroup {
                        name: transaction.subject.clone(),
                        total: Decimal::ZERO,
                        transactions: Vec::new(),
                        last_date: None,
                    });
                    subjects.len() - 1
                });
            let group = &mut subjects[index];

            let parsed = transaction.parsed_amount();
            let counted = match parsed {
                Some(amount) if transaction.approved => amount,
                _ => Decimal::ZERO,
            };

            // A row that would overflow any sum is treated like an unreadable one.
            let (amount, amount_valid, effective_amount) =
                match totals.add(counted).zip(group.total.checked_add(counted)) {
                    Some((next, group_total)) => {
                        totals = next;
                        group.total = group_total;
                        (parsed.unwrap_or(Decimal::ZERO), parsed.is_some(), counted)
                    }
                    None => {
                        warn!(
                            id = %transaction.id,
                            amount = %transaction.amount,
                            "amount overflows the ledger totals, counting it as zero"
                        );
                        (Decimal::ZERO, false, Decimal::ZERO)
                    }
                };

            let row = ProjectedTransaction {
                transaction: transaction.clone(),
                amount,
                amount_valid,
                effective_amount,
                balance: totals.balance,
            };

            group.last_date = group.last_date.max(transaction.date);
            group.transactions.push(row.clone());
            projected.push(row);
        }

        // Stable: subjects with the same last date keep first-seen order.
        subjects.sort_by(|a, b| b.last_date.cmp(&a.last_date));
        for group in &mut subjects {
            group.transactions.reverse();
        }
        projected.reverse();

        LedgerResult {
            transactions: projected,
            subjects,
            total_income: totals.income,
            total_expense: totals.expense,
            opening_balance,
            closing_balance: totals.balance,
        }
    }

    /// The `limit` most frequently used subjects, ties in first-seen order.
    #[must_use]
    pub fn most_used_subjects(transactions: &[Transaction], limit: usize) -> Vec<String> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for transaction in transactions {
            let subject = transaction.subject.as_str();
            match index.get(subject) {
                Some(&i) => counts[i].1 += 1,
                None => {
                    index.insert(subject, counts.len());
                    counts.push((subject, 1));
                }
            }
        }

        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
            .into_iter()
            .take(limit)
            .map(|(subject, _)| subject.to_string())
            .collect()
    }
}
