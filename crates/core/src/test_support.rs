//! In-memory stores and fixtures for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use jam3ya_shared::types::{MemberId, TransactionId};

use crate::ledger::{Member, Transaction};
use crate::store::{MemberFields, MemberStore, StoreError, TransactionFields, TransactionStore};

/// Builds a transaction; `push` assigns the id.
pub fn transaction(
    date: &str,
    subject: &str,
    item: &str,
    details: &str,
    amount: &str,
    approved: bool,
) -> Transaction {
    Transaction {
        id: TransactionId::new(0),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
        subject: subject.into(),
        item: item.into(),
        details: details.into(),
        amount: amount.into(),
        approved,
        created_by_member: false,
    }
}

pub fn member(code: &str, name: &str, active: bool, email: Option<&str>) -> Member {
    Member {
        id: MemberId::new(0),
        code: code.into(),
        name: name.into(),
        nickname: None,
        phone: None,
        email: email.map(Into::into),
        active,
        is_admin: false,
        notes: None,
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    transactions: Mutex<Vec<Transaction>>,
    members: Mutex<Vec<Member>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn push(&self, mut transaction: Transaction) -> TransactionId {
        let id = TransactionId::new(self.next_id());
        transaction.id = id;
        self.transactions.lock().unwrap().push(transaction);
        id
    }

    pub fn add_member(&self, mut member: Member) {
        member.id = MemberId::new(self.next_id());
        self.members.lock().unwrap().push(member);
    }

    fn find_transaction<T>(
        &self,
        id: TransactionId,
        f: impl FnOnce(&mut Transaction) -> T,
    ) -> Result<T, StoreError> {
        let mut rows = self.transactions.lock().unwrap();
        rows.iter_mut()
            .find(|t| t.id == id)
            .map(f)
            .ok_or_else(|| StoreError::not_found("transaction", id))
    }
}

#[async_trait]
impl TransactionStore for InMemoryStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let mut rows = self.transactions.lock().unwrap().clone();
        rows.sort_by_key(|t| (t.date, t.id));
        Ok(rows)
    }

    async fn list_transactions_for_item(
        &self,
        item: &str,
    ) -> Result<Vec<Transaction>, StoreError> {
        let mut rows = self.list_transactions().await?;
        rows.retain(|t| t.item_key() == item.trim());
        Ok(rows)
    }

    async fn insert_transaction(
        &self,
        fields: TransactionFields,
    ) -> Result<TransactionId, StoreError> {
        Ok(self.push(Transaction {
            id: TransactionId::new(0),
            date: fields.date,
            subject: fields.subject,
            item: fields.item,
            details: fields.details,
            amount: fields.amount,
            approved: fields.approved,
            created_by_member: fields.created_by_member,
        }))
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        fields: TransactionFields,
    ) -> Result<(), StoreError> {
        self.find_transaction(id, |t| {
            t.date = fields.date;
            t.subject = fields.subject;
            t.item = fields.item;
            t.details = fields.details;
            t.amount = fields.amount;
        })
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError> {
        let mut rows = self.transactions.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(StoreError::not_found("transaction", id));
        }
        Ok(())
    }

    async fn set_approved(&self, id: TransactionId) -> Result<(), StoreError> {
        self.find_transaction(id, |t| t.approved = true)
    }

    async fn rename_subject(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        let mut rows = self.transactions.lock().unwrap();
        let mut changed = 0;
        for t in rows.iter_mut().filter(|t| t.subject == old) {
            t.subject = new.to_string();
            changed += 1;
        }
        Ok(changed)
    }

    async fn import_transactions(
        &self,
        rows: Vec<TransactionFields>,
        replace: bool,
    ) -> Result<u64, StoreError> {
        if replace {
            self.transactions.lock().unwrap().clear();
        }
        let count = rows.len() as u64;
        for fields in rows {
            self.insert_transaction(fields).await?;
        }
        Ok(count)
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        let mut rows = self.members.lock().unwrap().clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, StoreError> {
        let rows = self.members.lock().unwrap();
        Ok(rows.iter().find(|m| m.code_key() == code.trim()).cloned())
    }

    async fn upsert_member(&self, fields: MemberFields) -> Result<Member, StoreError> {
        let code = fields.requested_code().unwrap_or("1200").to_string();
        let mut new = member(&code, &fields.name, fields.active, fields.email.as_deref());
        new.is_admin = fields.is_admin;
        self.add_member(new.clone());
        Ok(new)
    }

    async fn import_members(&self, rows: Vec<MemberFields>) -> Result<Vec<Member>, StoreError> {
        let mut saved = Vec::with_capacity(rows.len());
        for fields in rows {
            saved.push(self.upsert_member(fields).await?);
        }
        Ok(saved)
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<(), StoreError> {
        let mut rows = self.members.lock().unwrap();
        let member = rows
            .iter_mut()
            .find(|m| m.code_key() == code.trim())
            .ok_or_else(|| StoreError::not_found("member", code))?;
        member.active = active;
        Ok(())
    }

    async fn delete_member(&self, id: MemberId) -> Result<(), StoreError> {
        self.members.lock().unwrap().retain(|m| m.id != id);
        Ok(())
    }
}
