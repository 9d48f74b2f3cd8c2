//! Shared types, errors, and configuration for Jam3ya.
//!
//! This crate provides common types used across all other crates:
//! - Amount parsing for locale-formatted ledger values
//! - Typed IDs for type-safe row references
//! - Application-wide error types
//! - Configuration management
//! - Mail delivery behind the `NotificationSender` seam

pub mod config;
pub mod email;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use email::{EmailService, NotificationSender, OutgoingMessage};
pub use error::{AppError, AppResult};
