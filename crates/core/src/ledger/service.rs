//! Ledger service composing the projector with the stores.
//!
//! The projector and report functions are pure; this service only loads the
//! inputs they need and writes postings back.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use jam3ya_shared::config::LedgerConfig;
use jam3ya_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::labels::ItemLabeler;
use super::projector::{LedgerProjector, LedgerResult};
use super::report::{
    ContributionPolicy, PaymentReport, paid_member_codes, payment_report, unpaid_members,
};
use super::types::Member;
use crate::store::{EntryType, MemberStore, StoreError, TransactionFields, TransactionStore};

/// Number of subjects offered as quick picks on the dashboard.
pub const ACTIVE_SUBJECT_COUNT: usize = 4;

/// Everything the admin dashboard shows for one year.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    /// Year the paid/unpaid split is computed for.
    pub year: i32,
    /// Projection of the whole ledger from the configured opening balance.
    pub ledger: LedgerResult,
    /// Codes with an approved contribution covering `year`.
    pub paid: BTreeSet<String>,
    /// Active members without one.
    pub unpaid: Vec<Member>,
    /// Contributions per member and year.
    pub report: PaymentReport,
    /// Most used subjects.
    pub active_subjects: Vec<String>,
}

/// Read and write access to the fund ledger.
pub struct LedgerService {
    transactions: Arc<dyn TransactionStore>,
    members: Arc<dyn MemberStore>,
    config: LedgerConfig,
}

impl LedgerService {
    /// Create a new ledger service.
    #[must_use]
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        members: Arc<dyn MemberStore>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            transactions,
            members,
            config,
        }
    }

    /// Contribution rules derived from the configuration.
    #[must_use]
    pub fn policy(&self) -> ContributionPolicy {
        ContributionPolicy::from(&self.config)
    }

    /// Projects the full ledger from the configured opening balance.
    #[instrument(skip(self))]
    pub async fn overview(&self) -> Result<LedgerResult, StoreError> {
        let transactions = self.transactions.list_transactions().await?;
        debug!(count = transactions.len(), "projecting ledger");
        Ok(LedgerProjector::project(
            &transactions,
            self.config.opening_balance,
        ))
    }

    /// Projects one member's transactions starting from zero.
    #[instrument(skip(self))]
    pub async fn member_statement(&self, code: &str) -> Result<LedgerResult, StoreError> {
        let transactions = self
            .transactions
            .list_transactions_for_item(code.trim())
            .await?;
        Ok(LedgerProjector::project(&transactions, Decimal::ZERO))
    }

    /// Builds the dashboard for `year`.
    #[instrument(skip(self))]
    pub async fn dashboard(&self, year: i32) -> Result<Dashboard, StoreError> {
        let transactions = self.transactions.list_transactions().await?;
        let roster = self.members.list_members().await?;
        let policy = self.policy();

        let paid = paid_member_codes(&transactions, &policy, year);
        let unpaid = unpaid_members(&roster, &paid).into_iter().cloned().collect();
        let report = payment_report(&transactions, &roster, &policy, year);
        let active_subjects =
            LedgerProjector::most_used_subjects(&transactions, ACTIVE_SUBJECT_COUNT);
        let ledger = LedgerProjector::project(&transactions, self.config.opening_balance);

        Ok(Dashboard {
            year,
            ledger,
            paid,
            unpaid,
            report,
            active_subjects,
        })
    }

    /// Code/name lookup over the current roster.
    pub async fn labeler(&self) -> Result<ItemLabeler, StoreError> {
        let roster = self.members.list_members().await?;
        Ok(ItemLabeler::new(&roster))
    }

    /// Records an approved admin posting. The sign of the stored amount follows `entry_type`.
    #[instrument(skip(self, details))]
    pub async fn post_entry(
        &self,
        date: NaiveDate,
        subject: &str,
        item: &str,
        details: &str,
        entry_type: EntryType,
        amount: Decimal,
    ) -> Result<TransactionId, StoreError> {
        if subject.trim().is_empty() {
            return Err(StoreError::Validation("subject is required".into()));
        }
        let fields = TransactionFields::admin_posting(
            date,
            subject.trim(),
            item.trim(),
            details,
            entry_type,
            amount,
        );
        let id = self.transactions.insert_transaction(fields).await?;
        info!(%id, ?entry_type, "posted entry");
        Ok(id)
    }

    /// Records a member's contribution as pending approval.
    ///
    /// The member must exist; the stored item is their code as stored.
    #[instrument(skip(self))]
    pub async fn submit_contribution(
        &self,
        date: NaiveDate,
        member_code: &str,
        year: Option<i32>,
        amount: Decimal,
    ) -> Result<TransactionId, StoreError> {
        if amount.is_zero() {
            return Err(StoreError::Validation("amount must not be zero".into()));
        }
        let member = self
            .members
            .find_by_code(member_code)
            .await?
            .ok_or_else(|| StoreError::not_found("member", member_code.trim()))?;

        let fields = TransactionFields::member_submission(
            date,
            self.config.contribution_subject.as_str(),
            member.code_key(),
            year,
            amount,
        );
        let id = self.transactions.insert_transaction(fields).await?;
        info!(%id, member = member.code_key(), "contribution submitted for approval");
        Ok(id)
    }

    /// Approves a pending transaction.
    #[instrument(skip(self))]
    pub async fn approve(&self, id: TransactionId) -> Result<(), StoreError> {
        self.transactions.set_approved(id).await?;
        info!(%id, "transaction approved");
        Ok(())
    }
}
