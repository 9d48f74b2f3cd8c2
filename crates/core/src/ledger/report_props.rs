//! Property-based tests for contribution standing and the payment report.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use jam3ya_shared::types::{MemberId, TransactionId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::report::{ContributionPolicy, paid_member_codes, payment_report, unpaid_members};
use super::types::{Member, Transaction};

const SUBJECT: &str = "contributions";
const CODES: [&str; 4] = ["101", "102", "103", "104"];

fn roster() -> impl Strategy<Value = Vec<Member>> {
    prop::collection::vec(any::<bool>(), CODES.len()).prop_map(|flags| {
        CODES
            .iter()
            .zip(flags)
            .enumerate()
            .map(|(i, (code, active))| Member {
                id: MemberId::new(i64::try_from(i).unwrap_or_default()),
                code: (*code).to_string(),
                name: format!("Member {code}"),
                nickname: None,
                phone: None,
                email: None,
                active,
                is_admin: false,
                notes: None,
            })
            .collect()
    })
}

/// Details citing zero, one or two years in 2023..=2026.
fn details() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        (2023i32..=2026).prop_map(|y| y.to_string()),
        (2023i32..=2025).prop_map(|y| format!("{y} {}", y + 1)),
    ]
}

/// Whole-fils amounts that halve exactly.
fn contributions() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(
        (
            prop::sample::select(CODES.to_vec()),
            2023i32..=2026,
            details(),
            (1i64..100_000).prop_map(|v| Decimal::new(v * 2, 3)),
            any::<bool>(),
        ),
        0..30,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (code, year, details, amount, approved))| Transaction {
                id: TransactionId::new(i64::try_from(i).unwrap_or_default() + 1),
                date: NaiveDate::from_ymd_opt(year, 6, 1),
                subject: SUBJECT.into(),
                item: code.to_string(),
                details,
                amount: amount.to_string(),
                approved,
                created_by_member: false,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_paid_and_unpaid_partition_active_members(
        members in roster(),
        transactions in contributions(),
        year in 2023i32..=2026,
    ) {
        let policy = ContributionPolicy::new(SUBJECT);
        let paid = paid_member_codes(&transactions, &policy, year);
        let unpaid: BTreeSet<&str> =
            unpaid_members(&members, &paid).iter().map(|m| m.code_key()).collect();

        for member in &members {
            let is_paid = paid.contains(member.code_key());
            let is_unpaid = unpaid.contains(member.code_key());
            if member.active {
                prop_assert!(is_paid != is_unpaid);
            } else {
                prop_assert!(!is_unpaid);
            }
        }
    }

    #[test]
    fn prop_split_conserves_contributions(
        members in roster(),
        transactions in contributions(),
    ) {
        let policy = ContributionPolicy::new(SUBJECT);
        let report = payment_report(&transactions, &members, &policy, 2026);

        let attributed: Decimal = report
            .by_member
            .values()
            .flat_map(|years| years.values())
            .sum();
        let contributed: Decimal = transactions.iter().map(Transaction::effective_amount).sum();
        prop_assert_eq!(attributed, contributed);
    }

    #[test]
    fn prop_yearly_totals_skip_inactive_members(
        members in roster(),
        transactions in contributions(),
    ) {
        let policy = ContributionPolicy::new(SUBJECT);
        let report = payment_report(&transactions, &members, &policy, 2026);

        for &year in &report.years {
            let expected: Decimal = members
                .iter()
                .filter(|m| m.active)
                .map(|m| report.amount_for(m.code_key(), year))
                .sum();
            prop_assert_eq!(report.total_for(year), expected);
        }
    }

    #[test]
    fn prop_year_axis_is_sorted_and_complete(
        transactions in contributions(),
        target in 2023i32..=2026,
    ) {
        let policy = ContributionPolicy::new(SUBJECT);
        let report = payment_report(&transactions, &[], &policy, target);

        prop_assert!(report.years.windows(2).all(|w| w[0] < w[1]));
        for year in policy.since_year..=target {
            prop_assert!(report.years.contains(&year));
        }
    }
}
