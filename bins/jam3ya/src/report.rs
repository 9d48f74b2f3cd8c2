//! Plain-text rendering of the dashboard for the terminal.

use std::fmt;

use jam3ya_core::ledger::Dashboard;
use jam3ya_shared::types::format_amount;

/// Balances, subject totals, yearly contributions and unpaid members.
pub struct DashboardReport<'a>(pub &'a Dashboard);

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dashboard = self.0;
        let ledger = &dashboard.ledger;

        writeln!(f, "Opening balance   {}", format_amount(ledger.opening_balance))?;
        writeln!(f, "Total income      {}", format_amount(ledger.total_income))?;
        writeln!(f, "Total expense     {}", format_amount(ledger.total_expense))?;
        writeln!(f, "Closing balance   {}", format_amount(ledger.closing_balance))?;

        let pending = ledger.pending().count();
        if pending > 0 {
            writeln!(f, "Pending approval  {pending}")?;
        }
        let malformed = ledger.malformed().count();
        if malformed > 0 {
            writeln!(f, "Unreadable amounts {malformed}")?;
        }
        if !dashboard.active_subjects.is_empty() {
            writeln!(f, "Frequent subjects {}", dashboard.active_subjects.join(", "))?;
        }

        writeln!(f, "\nSubjects")?;
        for group in &ledger.subjects {
            let name = if group.name.is_empty() { "-" } else { group.name.as_str() };
            let last = group.last_date.map(|d| d.to_string()).unwrap_or_default();
            writeln!(
                f,
                "  {name:<30} {:>14}  {:>4} rows  {last}",
                format_amount(group.total),
                group.transactions.len(),
            )?;
        }

        writeln!(f, "\nContributions by year")?;
        for year in &dashboard.report.years {
            writeln!(f, "  {year}  {}", format_amount(dashboard.report.total_for(*year)))?;
        }

        writeln!(
            f,
            "\n{} paid, {} unpaid for {}",
            dashboard.paid.len(),
            dashboard.unpaid.len(),
            dashboard.year
        )?;
        for member in &dashboard.unpaid {
            writeln!(f, "  {:<8} {}", member.code_key(), member.name.trim())?;
        }
        Ok(())
    }
}
