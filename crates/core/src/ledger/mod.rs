//! Fund ledger logic.
//!
//! This module implements the read-side projection of the fund ledger:
//! - Domain types for transactions, members and subjects
//! - Chronological replay into running balances and subject groups
//! - Year coverage classification for member contributions
//! - Paid/unpaid determination and the payment report by year
//! - Member code/name labelling for exports
//! - Ledger service composing the projector with the stores

pub mod labels;
pub mod projector;
pub mod report;
pub mod service;
pub mod types;
pub mod years;

#[cfg(test)]
mod projector_props;
#[cfg(test)]
mod report_props;

pub use labels::{ItemLabelMode, ItemLabeler};
pub use projector::{LedgerProjector, LedgerResult, ProjectedTransaction, SubjectGroup};
pub use report::{
    ContributionPolicy, PaymentReport, paid_member_codes, payment_report, unpaid_members,
};
pub use service::{Dashboard, LedgerService};
pub use types::{Member, Subject, Transaction};
pub use years::{PaymentClassification, classify_payment, years_in_details};
