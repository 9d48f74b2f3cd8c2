//! `SeaORM` entities for the fund tables.

pub mod members;
pub mod subjects;
pub mod transactions;

/// Common imports.
pub mod prelude {
    pub use super::members::Entity as Members;
    pub use super::subjects::Entity as Subjects;
    pub use super::transactions::Entity as Transactions;
}
