//! Core business logic for Jam3ya.
//!
//! This crate contains the fund's domain logic with ZERO database or web
//! framework dependencies. Storage is reached through the traits in [`store`].
//!
//! # Modules
//!
//! - `ledger` - Running-balance projection, year classification, payment reports
//! - `store` - Storage seams implemented by the database crate
//! - `reminders` - Unpaid-member reminder runs and their quarterly schedule
//! - `classification` - Product category suggestions from a generative model

pub mod classification;
pub mod ledger;
pub mod reminders;
pub mod store;

#[cfg(test)]
mod test_support;
