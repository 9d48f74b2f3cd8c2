//! `SeaORM` Entity for transactions table.
//!
//! `date` and `amount` are text so legacy rows with malformed values still load.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub date: Option<String>,
    pub subject: Option<String>,
    pub item: Option<String>,
    pub details: Option<String>,
    pub amount: Option<String>,
    /// Legacy stored balance; the projection is authoritative.
    pub balance: Option<String>,
    pub is_approved: bool,
    pub created_by_member: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
