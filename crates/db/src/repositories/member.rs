//! Member repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use jam3ya_core::ledger::Member;
use jam3ya_core::store::{MemberFields, MemberStore, StoreError};
use jam3ya_shared::types::MemberId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{debug, info};

use super::store_error;
use crate::entities::members;

/// Code given to the first member when none can be derived from the roster.
pub const FIRST_MEMBER_CODE: i64 = 1200;

impl From<members::Model> for Member {
    fn from(model: members::Model) -> Self {
        Self {
            id: MemberId::new(model.id),
            code: model.member_code,
            name: model.name,
            nickname: model.nickname,
            phone: model.phone,
            email: model.email,
            active: model.is_active,
            is_admin: model.is_admin,
            notes: model.notes,
        }
    }
}

/// Next free code: one past the largest numeric code, or [`FIRST_MEMBER_CODE`].
///
/// Codes that are not integers are ignored.
#[must_use]
pub fn next_member_code<'a>(codes: impl IntoIterator<Item = &'a str>) -> String {
    codes
        .into_iter()
        .filter_map(|code| code.trim().parse::<i64>().ok())
        .filter(|&code| code > 0)
        .max()
        .and_then(|max| max.checked_add(1))
        .unwrap_or(FIRST_MEMBER_CODE)
        .to_string()
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Member repository backed by `SeaORM`.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model_by_code<C: ConnectionTrait>(
        db: &C,
        code: &str,
    ) -> Result<Option<members::Model>, StoreError> {
        members::Entity::find()
            .filter(members::Column::MemberCode.eq(code.trim()))
            .one(db)
            .await
            .map_err(store_error)
    }

    async fn assign_code<C: ConnectionTrait>(db: &C) -> Result<String, StoreError> {
        let codes: Vec<String> = members::Entity::find()
            .select_only()
            .column(members::Column::MemberCode)
            .into_tuple()
            .all(db)
            .await
            .map_err(store_error)?;
        Ok(next_member_code(codes.iter().map(String::as_str)))
    }

    /// Updates by id when given, otherwise by code when that code exists,
    /// otherwise inserts. A blank code on insert is assigned.
    async fn upsert<C: ConnectionTrait>(
        db: &C,
        fields: MemberFields,
    ) -> Result<members::Model, StoreError> {
        if fields.name.trim().is_empty() {
            return Err(StoreError::Validation("member name is required".into()));
        }
        let code = fields.requested_code().map(str::to_string);

        let existing = match (fields.id, code.as_deref()) {
            (Some(id), _) => Some(
                members::Entity::find_by_id(id.into_inner())
                    .one(db)
                    .await
                    .map_err(store_error)?
                    .ok_or_else(|| StoreError::not_found("member", id))?,
            ),
            (None, Some(code)) => Self::find_model_by_code(db, code).await?,
            (None, None) => None,
        };

        if let Some(model) = existing {
            let mut row: members::ActiveModel = model.into();
            if let Some(code) = code {
                row.member_code = Set(code);
            }
            Self::apply(&mut row, fields);
            return row.update(db).await.map_err(store_error);
        }

        let code = match code {
            Some(code) => code,
            None => Self::assign_code(db).await?,
        };
        let mut row = members::ActiveModel {
            member_code: Set(code),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        Self::apply(&mut row, fields);
        let inserted = row.insert(db).await.map_err(store_error)?;
        info!(code = %inserted.member_code, "member added");
        Ok(inserted)
    }

    fn apply(row: &mut members::ActiveModel, fields: MemberFields) {
        row.name = Set(fields.name.trim().to_string());
        row.nickname = Set(blank_to_none(fields.nickname));
        row.phone = Set(blank_to_none(fields.phone));
        row.email = Set(blank_to_none(fields.email));
        row.is_active = Set(fields.active);
        row.is_admin = Set(fields.is_admin);
        row.notes = Set(blank_to_none(fields.notes));
    }
}

#[async_trait]
impl MemberStore for MemberRepository {
    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        let rows = members::Entity::find()
            .order_by_asc(members::Column::Name)
            .all(&self.db)
            .await
            .map_err(store_error)?;
        Ok(rows.into_iter().map(Member::from).collect())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Member>, StoreError> {
        Ok(Self::find_model_by_code(&self.db, code)
            .await?
            .map(Member::from))
    }

    async fn upsert_member(&self, fields: MemberFields) -> Result<Member, StoreError> {
        Self::upsert(&self.db, fields).await.map(Member::from)
    }

    async fn import_members(&self, rows: Vec<MemberFields>) -> Result<Vec<Member>, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        let mut saved = Vec::with_capacity(rows.len());
        for fields in rows {
            saved.push(Member::from(Self::upsert(&txn, fields).await?));
        }
        txn.commit().await.map_err(store_error)?;
        info!(count = saved.len(), "members imported");
        Ok(saved)
    }

    async fn set_active(&self, code: &str, active: bool) -> Result<(), StoreError> {
        let result = members::Entity::update_many()
            .col_expr(members::Column::IsActive, Expr::value(active))
            .filter(members::Column::MemberCode.eq(code.trim()))
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("member", code.trim()));
        }
        debug!(code = code.trim(), active, "member status changed");
        Ok(())
    }

    async fn delete_member(&self, id: MemberId) -> Result<(), StoreError> {
        let result = members::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;
        if result.rows_affected == 0 {
            return Err(StoreError::not_found("member", id));
        }
        Ok(())
    }
}
