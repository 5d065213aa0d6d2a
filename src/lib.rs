//! Diária ledger: rate resolution and shift ledger for delivery-company billing.
//!
//! This crate keeps registries of client companies and drivers, resolves
//! what each shift ("diária") costs the company and pays the driver, and
//! keeps an append-only ledger of shifts with scoped listings and
//! spreadsheet export.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use diaria_ledger::audit::MemoryAuditSink;
//! use diaria_ledger::calculation::MissingOverridePolicy;
//! use diaria_ledger::engine::BillingEngine;
//! use diaria_ledger::models::{DriverDraft, Role, User};
//! use diaria_ledger::store::MemoryStore;
//!
//! let engine = BillingEngine::new(
//!     Arc::new(MemoryStore::new()),
//!     MissingOverridePolicy::FallBackToDefault,
//! );
//! let admin = User {
//!     username: "admin".to_string(),
//!     password_hash: String::new(),
//!     role: Role::Admin,
//!     linked_companies: Default::default(),
//! };
//! let audit = MemoryAuditSink::new();
//!
//! let driver = DriverDraft { name: "Joao".to_string(), tax_id: "0123".to_string() };
//! engine.register_driver(&admin, driver, &audit).unwrap();
//! assert_eq!(engine.active_drivers().unwrap().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod access;
pub mod api;
pub mod audit;
pub mod calculation;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod models;
pub mod parse;
pub mod registry;
pub mod store;
