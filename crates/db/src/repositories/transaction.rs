//! Transaction repository for database operations.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use jam3ya_core::ledger::Transaction;
use jam3ya_core::store::{StoreError, TransactionFields, TransactionStore};
use jam3ya_shared::types::TransactionId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::store_error;
use crate::entities::transactions;

/// Storage format of the date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rows per `INSERT` statement during a bulk import.
const IMPORT_BATCH: usize = 500;

/// Parses a stored date, accepting a trailing time part. `None` when malformed.
#[must_use]
pub fn parse_stored_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok()))
}

impl From<transactions::Model> for Transaction {
    fn from(model: transactions::Model) -> Self {
        Self {
            id: TransactionId::new(model.id),
            date: model.date.as_deref().and_then(parse_stored_date),
            subject: model.subject.unwrap_or_default(),
            item: model.item.unwrap_or_default(),
            details: model.details.unwrap_or_default(),
            amount: model.amount.unwrap_or_default(),
            approved: model.is_approved,
            created_by_member: model.created_by_member,
        }
    }
}

fn new_row(fields: TransactionFields) -> transactions::ActiveModel {
    transactions::ActiveModel {
        date: Set(fields.date.map(|d| d.format(DATE_FORMAT).to_string())),
        subject: Set(Some(fields.subject)),
        item: Set(Some(fields.item)),
        details: Set(Some(fields.details)),
        amount: Set(Some(fields.amount)),
        balance: Set(Some("0".to_string())),
        is_approved: Set(fields.approved),
        created_by_member: Set(fields.created_by_member),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
}

/// Transaction repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, id: TransactionId) -> Result<transactions::Model, StoreError> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::not_found("transaction", id))
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = transactions::Entity::find()
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    async fn list_transactions_for_item(
        &self,
        item: &str,
    ) -> Result<Vec<Transaction>, StoreError> {
        let item = item.trim();
        // Items may carry stray whitespace from spreadsheet imports.
        let rows = transactions::Entity::find()
            .filter(transactions::Column::Item.contains(item))
            .order_by_asc(transactions::Column::Date)
            .order_by_asc(transactions::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows
            .into_iter()
            .map(Transaction::from)
            .filter(|t| t.item_key() == item)
            .collect())
    }

    async fn insert_transaction(
        &self,
        fields: TransactionFields,
    ) -> Result<TransactionId, StoreError> {
        let inserted = new_row(fields).insert(&self.db).await.map_err(store_error)?;
        debug!(id = inserted.id, "transaction inserted");
        Ok(TransactionId::new(inserted.id))
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        fields: TransactionFields,
    ) -> Result<(), StoreError> {
        let mut row: transactions::ActiveModel = self.find(id).await?.into();
        row.date = Set(fields.date.map(|d| d.format(DATE_FORMAT).to_string()));
        row.subject = Set(Some(fields.subject));
        row.item = Set(Some(fields.item));
        row.details = Set(Some(fields.details));
        row.amount = Set(Some(fields.amount));
        row.update(&self.db).await.map_err(store_error)?;
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = transactions::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("transaction", id));
        }
        Ok(())
    }

    async fn set_approved(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::IsApproved, Expr::value(true))
            .filter(transactions::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("transaction", id));
        }
        Ok(())
    }

    async fn rename_subject(&self, old: &str, new: &str) -> Result<u64, StoreError> {
        let result = transactions::Entity::update_many()
            .col_expr(transactions::Column::Subject, Expr::value(new))
            .filter(transactions::Column::Subject.eq(old))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected)
    }

    async fn import_transactions(
        &self,
        rows: Vec<TransactionFields>,
        replace: bool,
    ) -> Result<u64, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;

        if replace {
            let cleared = transactions::Entity::delete_many()
                .exec(&txn)
                .await
                .map_err(store_error)?;
            debug!(cleared = cleared.rows_affected, "existing transactions removed");
        }

        let models: Vec<transactions::ActiveModel> = rows.into_iter().map(new_row).collect();
        let mut inserted = 0;
        for batch in models.chunks(IMPORT_BATCH) {
            inserted += transactions::Entity::insert_many(batch.to_vec())
                .exec_without_returning(&txn)
                .await
                .map_err(store_error)?;
        }

        txn.commit().await.map_err(store_error)?;
        info!(inserted, replace, "transactions imported");
        Ok(inserted)
    }
}
