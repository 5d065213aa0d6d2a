//! Core data models for the diária ledger engine.
//!
//! This module contains the registry entities (companies and drivers), the
//! shift records kept by the ledger, and the users that act on them.

mod company;
mod driver;
mod shift_record;
mod status;
mod user;

pub use company::{BillingMode, Company, CompanyDraft, MinimumGuaranteed, RatePair};
pub use driver::{Driver, DriverDraft};
pub use shift_record::{LedgerTotals, ShiftCandidate, ShiftListing, ShiftRecord};
pub use status::Status;
pub use user::{Role, User};
