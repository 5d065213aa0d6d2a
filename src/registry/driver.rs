use crate::audit::AuditAction;
use crate::error::EngineResult;
use crate::models::{Driver, DriverDraft, Status};
use crate::store::BillingStore;

use super::RegistryEntry;

impl RegistryEntry for Driver {
    const ENTITY: &'static str = "driver";
    const REGISTERED: AuditAction = AuditAction::DriverRegistered;
    const UPDATED: AuditAction = AuditAction::DriverUpdated;
    const TOGGLED: AuditAction = AuditAction::DriverStatusToggled;

    type Draft = DriverDraft;

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn from_draft(draft: DriverDraft) -> EngineResult<Self> {
        draft.validate()
    }

    fn summary(&self) -> String {
        format!("Driver: {}, tax id: {}", self.name, self.tax_id)
    }

    fn load(store: &dyn BillingStore) -> EngineResult<Vec<Self>> {
        store.load_drivers()
    }

    fn persist(store: &dyn BillingStore, entries: &[Self]) -> EngineResult<()> {
        store.persist_drivers(entries)
    }
}
