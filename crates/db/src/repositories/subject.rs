//! Subject catalogue repository.

use async_trait::async_trait;
use chrono::Utc;
use jam3ya_core::ledger::Subject;
use jam3ya_core::store::{StoreError, SubjectStore};
use jam3ya_shared::types::SubjectId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;

use super::store_error;
use crate::entities::{subjects, transactions};

impl From<subjects::Model> for Subject {
    fn from(model: subjects::Model) -> Self {
        Self {
            id: SubjectId::new(model.id),
            name: model.name,
        }
    }
}

fn required_name(name: &str) -> Result<&str, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("subject name is required".into()));
    }
    Ok(name)
}

/// Subject repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct SubjectRepository {
    db: DatabaseConnection,
}

impl SubjectRepository {
    /// Creates a new subject repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubjectStore for SubjectRepository {
    async fn list_subjects(&self) -> Result<Vec<Subject>, StoreError> {
        let rows = subjects::Entity::find()
            .order_by_asc(subjects::Column::Name)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Subject::from).collect())
    }

    async fn add_subject(&self, name: &str) -> Result<Subject, StoreError> {
        let row = subjects::ActiveModel {
            name: Set(required_name(name)?.to_string()),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        let inserted = row.insert(&self.db).await.map_err(store_error)?;
        Ok(Subject::from(inserted))
    }

    async fn rename_subject(&self, id: SubjectId, new_name: &str) -> Result<u64, StoreError> {
        let new_name = required_name(new_name)?;
        let txn = self.db.begin().await.map_err(store_error)?;

        let current = subjects::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::not_found("subject", id))?;
        let old_name = current.name.clone();
        if old_name == new_name {
            txn.rollback().await.map_err(store_error)?;
            return Ok(0);
        }

        let mut row: subjects::ActiveModel = current.into();
        row.name = Set(new_name.to_string());
        row.update(&txn).await.map_err(store_error)?;

        let relabelled = transactions::Entity::update_many()
            .col_expr(transactions::Column::Subject, Expr::value(new_name))
            .filter(transactions::Column::Subject.eq(old_name.as_str()))
            .exec(&txn)
            .await
            .map_err(store_error)?
            .rows_affected;

        txn.commit().await.map_err(store_error)?;
        info!(from = %old_name, to = new_name, relabelled, "subject renamed");
        Ok(relabelled)
    }

    async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError> {
        let result = subjects::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("subject", id));
        }
        Ok(())
    }
}
