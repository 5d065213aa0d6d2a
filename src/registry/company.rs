use tracing::warn;

use crate::audit::AuditAction;
use crate::error::EngineResult;
use crate::models::{BillingMode, Company, CompanyDraft, Status};
use crate::store::BillingStore;

use super::RegistryEntry;

impl RegistryEntry for Company {
    const ENTITY: &'static str = "company";
    const REGISTERED: AuditAction = AuditAction::CompanyRegistered;
    const UPDATED: AuditAction = AuditAction::CompanyUpdated;
    const TOGGLED: AuditAction = AuditAction::CompanyStatusToggled;

    type Draft = CompanyDraft;

    fn name(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }

    fn from_draft(draft: CompanyDraft) -> EngineResult<Self> {
        let company = draft.validate()?;
        if company.has_incomplete_override() {
            warn!(
                company = %company.name,
                "Override weekdays configured without weekend rates"
            );
        }
        Ok(company)
    }

    fn summary(&self) -> String {
        let mode = match self.billing_mode {
            BillingMode::Flat => "flat",
            BillingMode::Hourly => "hourly",
        };
        format!(
            "Company: {}, billing: {}, charged: {}, paid: {}",
            self.name, mode, self.default_rates.charged, self.default_rates.paid
        )
    }

    fn load(store: &dyn BillingStore) -> EngineResult<Vec<Self>> {
        store.load_companies()
    }

    fn persist(store: &dyn BillingStore, entries: &[Self]) -> EngineResult<()> {
        store.persist_companies(entries)
    }
}
