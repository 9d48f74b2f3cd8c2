//! Spreadsheet interchange: CSV import of transactions and members, CSV export
//! of the projected ledger.
//!
//! Columns are read by position so exports from the old spreadsheets load
//! whatever their header captions say.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use jam3ya_core::ledger::{ItemLabelMode, ItemLabeler, LedgerResult};
use jam3ya_core::store::{MemberFields, TransactionFields};
use jam3ya_shared::types::amount::{normalize_digits, parse_amount};
use tracing::{debug, warn};

/// Date layouts accepted on import, tried in order.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Header row of the ledger export.
pub const EXPORT_HEADERS: [&str; 7] = [
    "التسلسل",
    "التاريخ",
    "الموضوع",
    "البند",
    "التفاصيل",
    "القيمة",
    "المجموع التراكمي",
];

/// Parses an import date in any of [`DATE_FORMATS`], with Arabic-Indic digits allowed.
#[must_use]
pub fn parse_import_date(raw: &str) -> Option<NaiveDate> {
    let normalized = normalize_digits(raw.trim());
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&normalized, format).ok())
}

fn cell(record: &csv::StringRecord, index: usize) -> &str {
    record.get(index).map_or("", str::trim)
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input)
}

/// Reads transaction rows (date, subject, item, details, amount).
///
/// A blank or unreadable date carries the last date seen forward. Rows with
/// no subject, item and amount are skipped; a missing amount alone becomes
/// `0`. Imported rows are approved.
///
/// # Errors
///
/// Returns an error when the CSV itself cannot be read.
pub fn read_transactions<R: Read>(input: R) -> Result<Vec<TransactionFields>> {
    let mut rows = Vec::new();
    let mut last_date: Option<NaiveDate> = None;

    for (index, record) in reader(input).records().enumerate() {
        let line = index + 2;
        let record = record.with_context(|| format!("reading transaction row {line}"))?;

        let raw_date = cell(&record, 0);
        if let Some(date) = parse_import_date(raw_date) {
            last_date = Some(date);
        } else if !raw_date.is_empty() {
            warn!(row = line, date = raw_date, "unreadable date, keeping previous");
        }

        let (subject, item, amount) = (cell(&record, 1), cell(&record, 2), cell(&record, 4));
        if subject.is_empty() && item.is_empty() && amount.is_empty() {
            debug!(row = line, "skipping empty row");
            continue;
        }
        let amount = if amount.is_empty() { "0" } else { amount };
        if parse_amount(amount).is_none() {
            warn!(row = line, amount, "amount is not a number, importing as-is");
        }

        rows.push(TransactionFields {
            date: last_date,
            subject: subject.to_string(),
            item: item.to_string(),
            details: cell(&record, 3).to_string(),
            amount: amount.to_string(),
            approved: true,
            created_by_member: false,
        });
    }

    Ok(rows)
}

/// Member codes listed one per line, digits only, first occurrence kept.
#[must_use]
pub fn read_code_list(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for line in text.lines() {
        let line = normalize_digits(line);
        let code: String = line
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        if !code.is_empty() && !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}

/// Keeps the digits of a phone number.
fn clean_phone(raw: &str) -> Option<String> {
    let digits: String = normalize_digits(raw)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    (!digits.is_empty()).then_some(digits)
}

/// Reads member rows (code, name, phone, email). Rows without a name are skipped.
///
/// # Errors
///
/// Returns an error when the CSV itself cannot be read.
pub fn read_members<R: Read>(input: R) -> Result<Vec<MemberFields>> {
    let mut members = Vec::new();

    for (index, record) in reader(input).records().enumerate() {
        let record = record.with_context(|| format!("reading member row {}", index + 2))?;
        let name = cell(&record, 1);
        if name.is_empty() {
            debug!(row = index + 2, "skipping member without name");
            continue;
        }

        let mut fields = MemberFields::named(name);
        fields.code = Some(normalize_digits(cell(&record, 0))).filter(|c| !c.is_empty());
        fields.phone = clean_phone(cell(&record, 2));
        fields.email = Some(cell(&record, 3).to_string()).filter(|e| !e.is_empty());
        members.push(fields);
    }

    Ok(members)
}

/// Writes the ledger newest first, numbering rows from the oldest.
///
/// # Errors
///
/// Returns an error when writing fails.
pub fn write_ledger<W: Write>(
    output: W,
    ledger: &LedgerResult,
    labeler: &ItemLabeler,
    mode: ItemLabelMode,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);
    writer.write_record(EXPORT_HEADERS)?;

    let total = ledger.transactions.len();
    for (offset, row) in ledger.transactions.iter().enumerate() {
        let t = &row.transaction;
        writer.write_record([
            (total - offset).to_string(),
            t.date.map(|d| d.to_string()).unwrap_or_default(),
            t.subject.clone(),
            labeler.label(&t.item, mode),
            t.details.clone(),
            row.display_amount(),
            row.display_balance(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
