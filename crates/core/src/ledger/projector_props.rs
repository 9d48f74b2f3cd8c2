//! Property-based tests for the ledger projector.
//!
//! - Replaying effective amounts reproduces every running balance
//! - Projection is deterministic
//! - Income minus expense equals the net change and the sum of subject totals
//! - Pending transactions never move the balance
//! - Approving a row shifts its own and later balances by its amount only

use chrono::NaiveDate;
use jam3ya_shared::types::TransactionId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::projector::LedgerProjector;
use super::types::Transaction;

/// Signed amounts with three decimals (-5,000.000 to 5,000.000).
fn amount() -> impl Strategy<Value = Decimal> {
    (-5_000_000i64..5_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

/// Stored text for an amount: mostly numbers, sometimes locale-formatted or garbage.
fn stored_amount() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => amount().prop_map(|d| d.to_string()),
        1 => amount().prop_map(|d| d.to_string().replace('.', "٫")),
        1 => Just("n/a".to_string()),
    ]
}

fn subject() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("contributions".to_string()),
        Just("rent".to_string()),
        Just("donations".to_string()),
        Just(String::new()),
    ]
}

/// Transactions already in (date, id) order.
fn ledger() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec((0u32..60, subject(), stored_amount(), any::<bool>()), 0..40).prop_map(
        |rows| {
            let mut rows: Vec<_> = rows.into_iter().enumerate().collect();
            rows.sort_by_key(|(i, (day, ..))| (*day, *i));
            rows.into_iter()
                .map(|(i, (day, subject, amount, approved))| Transaction {
                    id: TransactionId::new(i64::try_from(i).unwrap_or_default() + 1),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1)
                        .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(day)))),
                    subject,
                    item: "101".into(),
                    details: String::new(),
                    amount,
                    approved,
                    created_by_member: false,
                })
                .collect()
        },
    )
}

fn opening() -> impl Strategy<Value = Decimal> {
    (0i64..2_000_000i64).prop_map(|v| Decimal::new(v, 3))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_balances_replay(transactions in ledger(), opening in opening()) {
        let result = LedgerProjector::project(&transactions, opening);

        let mut running = opening;
        for (row, source) in result.chronological().zip(&transactions) {
            running += source.effective_amount();
            prop_assert_eq!(row.balance, running);
            prop_assert_eq!(&row.transaction, source);
        }
        prop_assert_eq!(result.closing_balance, running);
        prop_assert_eq!(result.transactions.len(), transactions.len());
    }

    #[test]
    fn prop_projection_is_deterministic(transactions in ledger(), opening in opening()) {
        let first = LedgerProjector::project(&transactions, opening);
        let second = LedgerProjector::project(&transactions, opening);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_totals_partition(transactions in ledger(), opening in opening()) {
        let result = LedgerProjector::project(&transactions, opening);

        prop_assert!(result.total_income >= Decimal::ZERO);
        prop_assert!(result.total_expense >= Decimal::ZERO);
        prop_assert_eq!(result.closing_balance - opening, result.net_change());

        let subject_sum: Decimal = result.subjects.iter().map(|s| s.total).sum();
        prop_assert_eq!(subject_sum, result.net_change());

        let grouped: usize = result.subjects.iter().map(|s| s.transactions.len()).sum();
        prop_assert_eq!(grouped, transactions.len());
    }

    #[test]
    fn prop_subjects_ordered_by_last_date(transactions in ledger()) {
        let result = LedgerProjector::project(&transactions, Decimal::ZERO);
        for pair in result.subjects.windows(2) {
            prop_assert!(pair[0].last_date >= pair[1].last_date);
        }
    }

    #[test]
    fn prop_pending_transactions_do_not_move_balance(
        transactions in ledger(),
        index in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!transactions.is_empty());
        let i = index.index(transactions.len());

        let mut pending = transactions.clone();
        pending[i].approved = false;
        let mut removed = pending.clone();
        removed.remove(i);

        let with_pending = LedgerProjector::project(&pending, Decimal::ZERO);
        let without = LedgerProjector::project(&removed, Decimal::ZERO);

        prop_assert_eq!(with_pending.closing_balance, without.closing_balance);
        prop_assert_eq!(with_pending.total_income, without.total_income);
        prop_assert_eq!(with_pending.total_expense, without.total_expense);
        prop_assert_eq!(with_pending.transactions.len(), without.transactions.len() + 1);
    }

    #[test]
    fn prop_approval_shifts_only_later_balances(
        transactions in ledger(),
        opening in opening(),
        index in any::<prop::sample::Index>(),
    ) {
        prop_assume!(!transactions.is_empty());
        let i = index.index(transactions.len());

        let mut pending = transactions;
        pending[i].approved = false;
        let mut approved = pending.clone();
        approved[i].approved = true;

        let before = LedgerProjector::project(&pending, opening);
        let after = LedgerProjector::project(&approved, opening);
        let delta = approved[i].parsed_amount().unwrap_or(Decimal::ZERO);

        prop_assert_eq!(after.closing_balance - before.closing_balance, delta);
        let rows = before.chronological().zip(after.chronological());
        for (position, (old, new)) in rows.enumerate() {
            if position < i {
                prop_assert_eq!(new.balance, old.balance);
            } else {
                prop_assert_eq!(new.balance - old.balance, delta);
            }
        }
    }
}
