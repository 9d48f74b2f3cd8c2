//! Reminder runs over the unpaid active members.

use std::sync::Arc;

use jam3ya_shared::NotificationSender;
use jam3ya_shared::email::send_in_background;
use jam3ya_shared::config::ReminderConfig;
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::error::ReminderError;
use super::message::render_reminder;
use crate::ledger::{ContributionPolicy, Member, paid_member_codes, unpaid_members};
use crate::store::{MemberStore, TransactionStore};

/// Outcome of one reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSummary {
    /// Year the reminders were about.
    pub year: i32,
    /// Members a reminder was addressed to.
    pub attempted: usize,
    /// Reminders accepted by the mail relay.
    pub sent: usize,
    /// Reminders that failed to send.
    pub failed: usize,
}

/// Sends contribution reminders to active members who have not paid.
pub struct ReminderService {
    transactions: Arc<dyn TransactionStore>,
    members: Arc<dyn MemberStore>,
    sender: Arc<dyn NotificationSender>,
    policy: ContributionPolicy,
    config: ReminderConfig,
}

impl ReminderService {
    /// Create a new reminder service.
    #[must_use]
    pub fn new(
        transactions: Arc<dyn TransactionStore>,
        members: Arc<dyn MemberStore>,
        sender: Arc<dyn NotificationSender>,
        policy: ContributionPolicy,
        config: ReminderConfig,
    ) -> Self {
        Self {
            transactions,
            members,
            sender,
            policy,
            config,
        }
    }

    /// Active members with an e-mail address and no approved contribution for `year`.
    pub async fn targets(&self, year: i32) -> Result<Vec<Member>, ReminderError> {
        let roster = self.members.list_members().await?;
        let transactions = self.transactions.list_transactions().await?;
        let paid = paid_member_codes(&transactions, &self.policy, year);

        Ok(unpaid_members(&roster, &paid)
            .into_iter()
            .filter(|m| m.contact_email().is_some())
            .cloned()
            .collect())
    }

    /// Sends one reminder to each target for `year`.
    ///
    /// Sends run concurrently. A failed send is logged and counted and never
    /// stops the others.
    #[instrument(skip(self))]
    pub async fn run_for_year(&self, year: i32) -> Result<ReminderSummary, ReminderError> {
        let targets = self.targets(year).await?;
        let mut summary = ReminderSummary {
            year,
            ..ReminderSummary::default()
        };

        let mut deliveries = Vec::with_capacity(targets.len());
        for member in &targets {
            let Some(to) = member.contact_email() else {
                continue;
            };
            let message =
                render_reminder(member, year, &self.config.fund_name, &self.config.base_url);
            deliveries.push(send_in_background(
                self.sender.clone(),
                to.to_string(),
                message,
            ));
        }

        summary.attempted = deliveries.len();
        for delivery in deliveries {
            match delivery.await {
                Ok(true) => summary.sent += 1,
                Ok(false) => summary.failed += 1,
                Err(e) => {
                    summary.failed += 1;
                    warn!(error = %e, "reminder task did not finish");
                }
            }
        }

        info!(
            year,
            attempted = summary.attempted,
            sent = summary.sent,
            failed = summary.failed,
            "reminder run finished"
        );
        Ok(summary)
    }
}
