//! Common types used across the application.

pub mod amount;
pub mod id;

pub use amount::{format_amount, normalize_digits, parse_amount};
pub use id::*;
