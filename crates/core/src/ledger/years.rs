//! Year coverage of contribution transactions.
//!
//! A contribution covers the years its details cite (`20xx` tokens standing
//! alone as a word). Without any, it covers the calendar year of its date.

use std::sync::LazyLock;

use chrono::Datelike;
use jam3ya_shared::types::normalize_digits;
use regex::Regex;
use serde::Serialize;

use super::types::Transaction;

/// Runs of ASCII word characters; a year token is a run of exactly `20xx`.
static WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("static pattern is valid"));

/// Years a transaction pays for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentClassification {
    /// Covered years in order of first mention.
    pub covered_years: Vec<i32>,
    /// True when the years came from the details text rather than the date.
    pub from_details: bool,
    /// True when the target year is covered.
    pub paid_for_target_year: bool,
}

/// Extracts the distinct `20xx` years cited in free text.
///
/// Arabic-Indic digits are normalized first, so `٢٠٢٤` counts as 2024.
#[must_use]
pub fn years_in_details(details: &str) -> Vec<i32> {
    let normalized = normalize_digits(details);
    let mut years = Vec::new();

    for run in WORD_RUN.find_iter(&normalized) {
        let token = run.as_str();
        if token.len() != 4 || !token.starts_with("20") {
            continue;
        }
        let Ok(year) = token.parse::<i32>() else {
            continue;
        };
        if !years.contains(&year) {
            years.push(year);
        }
    }

    years
}

/// Classifies which years `transaction` covers and whether `target_year` is among them.
#[must_use]
pub fn classify_payment(transaction: &Transaction, target_year: i32) -> PaymentClassification {
    let cited = years_in_details(&transaction.details);
    let from_details = !cited.is_empty();

    let covered_years = if from_details {
        cited
    } else {
        transaction
            .date
            .map(|date| vec![date.year()])
            .unwrap_or_default()
    };

    PaymentClassification {
        paid_for_target_year: covered_years.contains(&target_year),
        covered_years,
        from_details,
    }
}
