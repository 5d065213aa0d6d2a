//! Audit events.
//!
//! Every registry mutation, shift registration and export emits an
//! [`AuditEvent`] to the [`AuditSink`] the caller passes in. Emission is
//! fire-and-forget: sinks never return errors and never block the primary
//! operation.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::info;

/// What happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A company was registered.
    CompanyRegistered,
    /// A company was edited (and reactivated).
    CompanyUpdated,
    /// A company was activated or deactivated.
    CompanyStatusToggled,
    /// A driver was registered.
    DriverRegistered,
    /// A driver was edited (and reactivated).
    DriverUpdated,
    /// A driver was activated or deactivated.
    DriverStatusToggled,
    /// A shift was appended to the ledger.
    ShiftRegistered,
    /// Shift records were exported.
    ShiftsExported,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuditAction::CompanyRegistered => "company_registered",
            AuditAction::CompanyUpdated => "company_updated",
            AuditAction::CompanyStatusToggled => "company_status_toggled",
            AuditAction::DriverRegistered => "driver_registered",
            AuditAction::DriverUpdated => "driver_updated",
            AuditAction::DriverStatusToggled => "driver_status_toggled",
            AuditAction::ShiftRegistered => "shift_registered",
            AuditAction::ShiftsExported => "shifts_exported",
        };
        f.write_str(label)
    }
}

/// One audit event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// What happened.
    pub action: AuditAction,
    /// Username of the acting user.
    pub actor: String,
    /// Human-readable details.
    pub details: String,
}

impl AuditEvent {
    /// Creates an event.
    pub fn new(action: AuditAction, actor: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            action,
            actor: actor.into(),
            details: details.into(),
        }
    }
}

/// Receives audit events.
pub trait AuditSink: Send + Sync {
    /// Records an event. Must not panic or block on failure.
    fn emit(&self, event: AuditEvent);
}

/// Emits audit events as `tracing` events on the `audit` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn emit(&self, event: AuditEvent) {
        info!(
            target: "audit",
            action = %event.action,
            actor = %event.actor,
            details = %event.details,
            "Audit event"
        );
    }
}

/// Keeps audit events in memory.
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl MemoryAuditSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn emit(&self, event: AuditEvent) {
        // A poisoned sink drops the event rather than failing the caller.
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
