//! Parsing and display of ledger amounts.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Amounts are `rust_decimal::Decimal`; stored values are text and may carry
//! Arabic-Indic digits or a locale decimal separator.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for balances (minor currency unit).
pub const DISPLAY_SCALE: u32 = 3;

const ARABIC_DECIMAL_SEPARATOR: char = '\u{066B}';

/// Maps Arabic-Indic (`٠`..`٩`) and Eastern Arabic-Indic (`۰`..`۹`) digits to ASCII.
#[must_use]
pub fn normalize_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => ascii_digit(c, '\u{0660}'),
            '\u{06F0}'..='\u{06F9}' => ascii_digit(c, '\u{06F0}'),
            _ => c,
        })
        .collect()
}

fn ascii_digit(c: char, zero: char) -> char {
    let offset = u32::from(c) - u32::from(zero);
    char::from_digit(offset, 10).unwrap_or(c)
}

/// Canonicalizes a raw amount: ASCII digits, `.` as the only decimal separator.
#[must_use]
pub fn normalize_amount(raw: &str) -> String {
    normalize_digits(raw.trim())
        .chars()
        .map(|c| match c {
            ARABIC_DECIMAL_SEPARATOR | ',' => '.',
            _ => c,
        })
        .collect()
}

/// Parses a stored amount, returning `None` when it is not a number.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    let normalized = normalize_amount(raw);
    if normalized.is_empty() {
        return None;
    }

    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .ok()
}

/// Rounds to the display scale, half away from zero.
#[must_use]
pub fn round_for_display(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount with exactly three decimal places.
#[must_use]
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_for_display(value);
    format!("{rounded:.3}")
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
