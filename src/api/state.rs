//! Application state for the diária ledger API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::audit::{AuditSink, TracingAuditSink};
use crate::config::UserDirectory;
use crate::engine::BillingEngine;

/// Shared application state.
///
/// Holds the engine, the configured users and the audit sink every
/// mutation reports to.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<BillingEngine>,
    users: Arc<UserDirectory>,
    audit: Arc<dyn AuditSink>,
}

impl AppState {
    /// Creates a new application state that audits through `tracing`.
    pub fn new(engine: BillingEngine, users: UserDirectory) -> Self {
        Self::with_audit(engine, users, Arc::new(TracingAuditSink))
    }

    /// Creates a new application state with an explicit audit sink.
    pub fn with_audit(
        engine: BillingEngine,
        users: UserDirectory,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            engine: Arc::new(engine),
            users: Arc::new(users),
            audit,
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &BillingEngine {
        &self.engine
    }

    /// Returns the user directory.
    pub fn users(&self) -> &UserDirectory {
        &self.users
    }

    /// Returns the audit sink.
    pub fn audit(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
