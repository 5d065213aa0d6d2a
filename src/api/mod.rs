//! HTTP API module for the diária ledger.
//!
//! This module exposes the registries, shift registration, scoped listings
//! and the spreadsheet export over axum.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{PASSWORD_HASH_HEADER, USERNAME_HEADER, create_router};
pub use request::{ShiftQueryParams, ShiftRequest};
pub use response::{ApiError, ApiErrorResponse, ShiftListResponse};
pub use state::AppState;
