//! Member contribution standing and the payment report by year.

use std::collections::{BTreeMap, BTreeSet};

use jam3ya_shared::config::LedgerConfig;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use super::types::{Member, Transaction};
use super::years::classify_payment;

/// Which transactions count as member contributions and how they are attributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionPolicy {
    /// Subject label of contribution transactions.
    pub subject: String,
    /// Years before this one are left out of the payment report.
    pub since_year: i32,
    /// Divide an amount evenly across the years it covers. When false, every
    /// covered year is credited the full amount.
    pub split_multi_year: bool,
}

impl ContributionPolicy {
    /// Creates a policy for `subject` with the default report settings.
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        let defaults = LedgerConfig::default();
        Self {
            subject: subject.into(),
            since_year: defaults.report_since_year,
            split_multi_year: defaults.split_multi_year,
        }
    }

    /// True when `transaction` is posted under the contribution subject.
    #[must_use]
    pub fn is_contribution(&self, transaction: &Transaction) -> bool {
        transaction.subject.trim() == self.subject.trim()
    }
}

impl From<&LedgerConfig> for ContributionPolicy {
    fn from(config: &LedgerConfig) -> Self {
        Self {
            subject: config.contribution_subject.clone(),
            since_year: config.report_since_year,
            split_multi_year: config.split_multi_year,
        }
    }
}

/// Member codes with an approved contribution covering `year`.
#[must_use]
pub fn paid_member_codes(
    transactions: &[Transaction],
    policy: &ContributionPolicy,
    year: i32,
) -> BTreeSet<String> {
    transactions
        .iter()
        .filter(|t| t.approved && policy.is_contribution(t))
        .filter(|t| classify_payment(t, year).paid_for_target_year)
        .map(|t| t.item_key().to_string())
        .collect()
}

/// Active members whose code is not in `paid`, in roster order.
#[must_use]
pub fn unpaid_members<'a>(roster: &'a [Member], paid: &BTreeSet<String>) -> Vec<&'a Member> {
    roster
        .iter()
        .filter(|m| m.active && !paid.contains(m.code_key()))
        .collect()
}

/// Contributions attributed per member code and year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaymentReport {
    /// Member code -> year -> amount.
    pub by_member: BTreeMap<String, BTreeMap<i32, Decimal>>,
    /// Report columns, ascending.
    pub years: Vec<i32>,
    /// Year -> total across all members except inactive ones.
    pub yearly_totals: BTreeMap<i32, Decimal>,
}

impl PaymentReport {
    /// Amount attributed to `code` for `year`, zero when none.
    #[must_use]
    pub fn amount_for(&self, code: &str, year: i32) -> Decimal {
        self.by_member
            .get(code.trim())
            .and_then(|years| years.get(&year))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Total for `year`, zero when the year is not a report column.
    #[must_use]
    pub fn total_for(&self, year: i32) -> Decimal {
        self.yearly_totals.get(&year).copied().unwrap_or(Decimal::ZERO)
    }
}

/// Builds the payment report of contributions up to and including `target_year`.
///
/// The year axis spans `policy.since_year..=target_year` plus any later year
/// a contribution covers.
#[must_use]
pub fn payment_report(
    transactions: &[Transaction],
    roster: &[Member],
    policy: &ContributionPolicy,
    target_year: i32,
) -> PaymentReport {
    let mut years: BTreeSet<i32> = (policy.since_year..=target_year).collect();
    let mut by_member: BTreeMap<String, BTreeMap<i32, Decimal>> = BTreeMap::new();

    for transaction in transactions.iter().filter(|t| policy.is_contribution(t)) {
        let classification = classify_payment(transaction, target_year);
        let covered = &classification.covered_years;
        let member_years = by_member
            .entry(transaction.item_key().to_string())
            .or_default();

        let amount = transaction.effective_amount();
        let share = if policy.split_multi_year && covered.len() > 1 {
            amount / Decimal::from(covered.len())
        } else {
            amount
        };

        for &year in covered.iter().filter(|&&y| y >= policy.since_year) {
            years.insert(year);
            let paid = member_years.entry(year).or_default();
            match paid.checked_add(share) {
                Some(sum) => *paid = sum,
                None => warn!(id = %transaction.id, year, "contribution overflows the yearly sum"),
            }
        }
    }

    let inactive: BTreeSet<&str> = roster
        .iter()
        .filter(|m| !m.active)
        .map(Member::code_key)
        .collect();

    let mut yearly_totals: BTreeMap<i32, Decimal> =
        years.iter().map(|&y| (y, Decimal::ZERO)).collect();
    for (code, member_years) in &by_member {
        if inactive.contains(code.as_str()) {
            continue;
        }
        for (year, amount) in member_years {
            if let Some(total) = yearly_totals.get_mut(year) {
                *total = total.checked_add(*amount).unwrap_or_else(|| {
                    warn!(year, "yearly total overflows, keeping the partial sum");
                    *total
                });
            }
        }
    }

    PaymentReport {
        by_member,
        years: years.into_iter().collect(),
        yearly_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use jam3ya_shared::types::{MemberId, TransactionId};
    use rust_decimal_macros::dec;

    const SUBJECT: &str = "contributions";

    fn member(code: &str, active: bool) -> Member {
        Member {
            id: MemberId::new(code.parse().unwrap_or(0)),
            code: code.into(),
            name: format!("Member {code}"),
            nickname: None,
            phone: None,
            email: None,
            active,
            is_admin: false,
            notes: None,
        }
    }

    fn contribution(id: i64, item: &str, date: &str, details: &str, amount: &str) -> Transaction {
        Transaction {
            id: TransactionId::new(id),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            subject: SUBJECT.into(),
            item: item.into(),
            details: details.into(),
            amount: amount.into(),
            approved: true,
            created_by_member: false,
        }
    }

    fn policy() -> ContributionPolicy {
        ContributionPolicy::new(SUBJECT)
    }

    #[test]
    fn test_paid_and_unpaid_scenario() {
        let roster = vec![member("101", true), member("102", true)];
        let transactions = vec![contribution(1, "101", "2024-05-01", "2024", "10")];

        let paid = paid_member_codes(&transactions, &policy(), 2024);
        assert!(paid.contains("101"));

        let unpaid = unpaid_members(&roster, &paid);
        let codes: Vec<&str> = unpaid.iter().map(|m| m.code.as_str()).collect();
        assert_eq!(codes, vec!["102"]);
    }

    #[test]
    fn test_pending_contribution_does_not_mark_paid() {
        let mut pending = contribution(1, "101", "2024-05-01", "2024", "10");
        pending.approved = false;

        let paid = paid_member_codes(&[pending], &policy(), 2024);
        assert!(paid.is_empty());
    }

    #[test]
    fn test_other_subjects_are_ignored() {
        let mut donation = contribution(1, "101", "2024-05-01", "2024", "10");
        donation.subject = "donations".into();
        assert!(paid_member_codes(&[donation], &policy(), 2024).is_empty());
    }

    #[test]
    fn test_codes_are_trimmed() {
        let roster = vec![member(" 101 ", true)];
        let transactions = vec![contribution(1, "101 ", "2024-05-01", "", "10")];
        let paid = paid_member_codes(&transactions, &policy(), 2024);
        assert!(unpaid_members(&roster, &paid).is_empty());
    }

    #[test]
    fn test_inactive_members_never_unpaid() {
        let roster = vec![member("101", false)];
        assert!(unpaid_members(&roster, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_multi_year_split() {
        let transactions = vec![contribution(1, "101", "2024-01-05", "2024 2025", "24")];
        let report = payment_report(&transactions, &[member("101", true)], &policy(), 2025);

        assert_eq!(report.amount_for("101", 2024), dec!(12));
        assert_eq!(report.amount_for("101", 2025), dec!(12));
        assert_eq!(report.total_for(2024), dec!(12));
        assert_eq!(report.total_for(2025), dec!(12));
    }

    #[test]
    fn test_multi_year_without_split_credits_full_amount() {
        let transactions = vec![contribution(1, "101", "2024-01-05", "2024 2025", "24")];
        let policy = ContributionPolicy {
            split_multi_year: false,
            ..policy()
        };
        let report = payment_report(&transactions, &[member("101", true)], &policy, 2025);

        assert_eq!(report.amount_for("101", 2024), dec!(24));
        assert_eq!(report.amount_for("101", 2025), dec!(24));
    }

    #[test]
    fn test_year_axis() {
        let transactions = vec![
            contribution(1, "101", "2021-01-05", "", "12"),
            contribution(2, "101", "2024-01-05", "2027", "12"),
        ];
        let report = payment_report(&transactions, &[], &policy(), 2025);

        assert_eq!(report.years, vec![2023, 2024, 2025, 2027]);
        assert_eq!(report.amount_for("101", 2021), Decimal::ZERO);
        assert_eq!(report.amount_for("101", 2027), dec!(12));
    }

    #[test]
    fn test_inactive_members_excluded_from_totals() {
        let roster = vec![member("101", true), member("102", false)];
        let transactions = vec![
            contribution(1, "101", "2024-01-05", "", "12"),
            contribution(2, "102", "2024-01-06", "", "12"),
            contribution(3, "guest", "2024-01-07", "", "5"),
        ];
        let report = payment_report(&transactions, &roster, &policy(), 2024);

        assert_eq!(report.amount_for("102", 2024), dec!(12));
        assert_eq!(report.total_for(2024), dec!(17));
    }

    #[test]
    fn test_pending_contribution_counts_zero() {
        let mut pending = contribution(1, "101", "2024-01-05", "2024", "12");
        pending.approved = false;
        let report = payment_report(&[pending], &[], &policy(), 2024);
        assert_eq!(report.amount_for("101", 2024), Decimal::ZERO);
        assert!(report.by_member.contains_key("101"));
    }

    #[test]
    fn test_overflowing_contributions_keep_partial_sums() {
        let max = "79228162514264337593543950335";
        let transactions = vec![
            contribution(1, "101", "2024-01-05", "2024", max),
            contribution(2, "101", "2024-01-06", "2024", max),
            contribution(3, "102", "2024-01-07", "2024", max),
        ];
        let report = payment_report(&transactions, &[], &policy(), 2024);

        assert_eq!(report.amount_for("101", 2024), Decimal::MAX);
        assert_eq!(report.amount_for("102", 2024), Decimal::MAX);
        assert_eq!(report.total_for(2024), Decimal::MAX);
    }
}
