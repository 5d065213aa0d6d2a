//! The engine facade.
//!
//! [`BillingEngine`] ties the registries, the rate resolver, the access
//! scope and the ledger together behind the operations a calling layer
//! needs. The acting user and the audit sink are passed into every call.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::access::{self, RoleScope};
use crate::audit::{AuditAction, AuditEvent, AuditSink};
use crate::calculation::{MissingOverridePolicy, resolve_with_policy};
use crate::config::EngineSettings;
use crate::error::{EngineError, EngineResult};
use crate::ledger::{EXPORT_CONTENT_TYPE, LedgerQuery, ShiftLedger, export_csv, export_file_name};
use crate::models::{
    Company, CompanyDraft, Driver, DriverDraft, LedgerTotals, ShiftCandidate, ShiftRecord, User,
};
use crate::registry::{CompanyRegistry, DriverRegistry};
use crate::store::{BillingStore, JsonFileStore};

/// A serialized export ready to be sent as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftExport {
    /// Suggested file name, `diarias_YYYYMMDD.csv`.
    pub file_name: String,
    /// MIME type of `content`.
    pub content_type: &'static str,
    /// CSV bytes.
    pub content: Vec<u8>,
    /// Number of shift rows.
    pub rows: usize,
}

/// Scoped shift listing with its totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftReport {
    /// Matching records in ledger order.
    pub records: Vec<ShiftRecord>,
    /// Totals over `records`.
    pub totals: LedgerTotals,
}

/// Registries, resolver and ledger over one store.
pub struct BillingEngine {
    companies: CompanyRegistry,
    drivers: DriverRegistry,
    ledger: ShiftLedger,
    policy: MissingOverridePolicy,
}

impl BillingEngine {
    /// Creates an engine over the given store.
    pub fn new(store: Arc<dyn BillingStore>, policy: MissingOverridePolicy) -> Self {
        Self {
            companies: CompanyRegistry::new(Arc::clone(&store)),
            drivers: DriverRegistry::new(Arc::clone(&store)),
            ledger: ShiftLedger::new(store),
            policy,
        }
    }

    /// Creates an engine over a [`JsonFileStore`] in the configured data
    /// directory.
    pub fn from_settings(settings: &EngineSettings) -> EngineResult<Self> {
        let store = JsonFileStore::open(&settings.data_dir)?;
        Ok(Self::new(Arc::new(store), settings.missing_override_policy))
    }

    /// The company registry.
    pub fn companies(&self) -> &CompanyRegistry {
        &self.companies
    }

    /// The driver registry.
    pub fn drivers(&self) -> &DriverRegistry {
        &self.drivers
    }

    /// The shift ledger.
    pub fn ledger(&self) -> &ShiftLedger {
        &self.ledger
    }

    /// The missing-override policy applied to every registration.
    pub fn policy(&self) -> MissingOverridePolicy {
        self.policy
    }

    /// Registers a shift worked by an active driver for an active company.
    ///
    /// # Errors
    ///
    /// - [`EngineError::AccessDenied`] when a supervisor is not linked to the
    ///   company
    /// - [`EngineError::NotFound`] when the company or driver is unknown or
    ///   inactive
    /// - [`EngineError::InvalidShiftInterval`] /
    ///   [`EngineError::MissingRateConfiguration`] from resolution
    /// - [`EngineError::Persistence`] when the ledger cannot be written
    pub fn register_shift(
        &self,
        user: &User,
        candidate: ShiftCandidate,
        audit: &dyn AuditSink,
    ) -> EngineResult<ShiftRecord> {
        access::ensure_can_register(user, &candidate.company)?;

        let company = self.companies.find_active(&candidate.company)?;
        let driver = self.drivers.find_active(&candidate.driver)?;

        let resolution =
            resolve_with_policy(&company, candidate.start_time, candidate.end_time, self.policy)?;

        let vehicle_type = match candidate.vehicle_type.trim() {
            "" => company.vehicle_type.clone(),
            given => given.to_string(),
        };

        let record = ShiftRecord {
            start_time: candidate.start_time,
            end_time: candidate.end_time,
            company_name: company.name,
            driver_name: driver.name,
            vehicle_type,
            driver_tax_id: driver.tax_id,
            amount_charged: resolution.amount_charged,
            amount_paid: resolution.amount_paid,
            minimum_guaranteed_charged: resolution.minimum_guaranteed_charged,
            minimum_guaranteed_paid: resolution.minimum_guaranteed_paid,
            registered_by: user.username.clone(),
        };

        let position = self.ledger.append(record.clone())?;
        info!(
            position,
            company = %record.company_name,
            driver = %record.driver_name,
            registered_by = %record.registered_by,
            rate_source = %resolution.rate_source,
            "Shift registered"
        );
        audit.emit(AuditEvent::new(
            AuditAction::ShiftRegistered,
            &user.username,
            format!(
                "Company: {}, driver: {}, start: {}, end: {}, charged: {}, paid: {}",
                record.company_name,
                record.driver_name,
                record.start_time,
                record.end_time,
                record.amount_charged,
                record.amount_paid
            ),
        ));

        Ok(record)
    }

    /// Shift records visible to the user, with totals.
    pub fn shifts_for(&self, user: &User, query: &LedgerQuery) -> EngineResult<ShiftReport> {
        let records = self
            .ledger
            .query_by_range(query, &RoleScope::for_user(user))?;
        let totals = LedgerTotals::from_records(&records)?;
        Ok(ShiftReport { records, totals })
    }

    /// Exports the records [`BillingEngine::shifts_for`] would return,
    /// naming the file after today's local date.
    ///
    /// An empty selection is [`EngineError::NotFound`].
    pub fn export_for(
        &self,
        user: &User,
        query: &LedgerQuery,
        audit: &dyn AuditSink,
    ) -> EngineResult<ShiftExport> {
        self.export_on(user, query, Local::now().date_naive(), audit)
    }

    /// Like [`BillingEngine::export_for`], with an explicit generation date.
    pub fn export_on(
        &self,
        user: &User,
        query: &LedgerQuery,
        generated_on: NaiveDate,
        audit: &dyn AuditSink,
    ) -> EngineResult<ShiftExport> {
        let report = self.shifts_for(user, query)?;
        if report.records.is_empty() {
            warn!(
                username = %user.username,
                start_date = %query.start_date,
                end_date = %query.end_date,
                "Nothing to export"
            );
            return Err(EngineError::NotFound {
                entity: "shifts".to_string(),
                name: format!("{} to {}", query.start_date, query.end_date),
            });
        }

        let content = export_csv(&report.records)?;
        let rows = report.records.len();
        audit.emit(AuditEvent::new(
            AuditAction::ShiftsExported,
            &user.username,
            format!(
                "Period: {} to {}, rows: {}",
                query.start_date, query.end_date, rows
            ),
        ));

        Ok(ShiftExport {
            file_name: export_file_name(generated_on),
            content_type: EXPORT_CONTENT_TYPE,
            content,
            rows,
        })
    }

    /// Active companies the user may see.
    pub fn companies_for(&self, user: &User) -> EngineResult<Vec<Company>> {
        let companies = self.companies.list_all()?;
        Ok(access::companies_visible_to(user, &companies))
    }

    /// Every company, active or not. Admin only.
    pub fn all_companies(&self, user: &User) -> EngineResult<Vec<Company>> {
        access::ensure_admin(user, "list all companies")?;
        self.companies.list_all()
    }

    /// Registers a company. Admin only.
    pub fn register_company(
        &self,
        user: &User,
        draft: CompanyDraft,
        audit: &dyn AuditSink,
    ) -> EngineResult<Company> {
        access::ensure_admin(user, "register company")?;
        self.companies.register(draft, &user.username, audit)
    }

    /// Edits (and reactivates) a company. Admin only.
    pub fn update_company(
        &self,
        user: &User,
        name: &str,
        draft: CompanyDraft,
        audit: &dyn AuditSink,
    ) -> EngineResult<Company> {
        access::ensure_admin(user, "update company")?;
        self.companies.update(name, draft, &user.username, audit)
    }

    /// Toggles a company's status. Admin only.
    pub fn toggle_company(
        &self,
        user: &User,
        name: &str,
        audit: &dyn AuditSink,
    ) -> EngineResult<Company> {
        access::ensure_admin(user, "toggle company status")?;
        self.companies.toggle_status(name, &user.username, audit)
    }

    /// Active drivers. Any authenticated user may list them.
    pub fn active_drivers(&self) -> EngineResult<Vec<Driver>> {
        self.drivers.list_active()
    }

    /// Every driver, active or not. Admin only.
    pub fn all_drivers(&self, user: &User) -> EngineResult<Vec<Driver>> {
        access::ensure_admin(user, "list all drivers")?;
        self.drivers.list_all()
    }

    /// Registers a driver. Admin only.
    pub fn register_driver(
        &self,
        user: &User,
        draft: DriverDraft,
        audit: &dyn AuditSink,
    ) -> EngineResult<Driver> {
        access::ensure_admin(user, "register driver")?;
        self.drivers.register(draft, &user.username, audit)
    }

    /// Edits (and reactivates) a driver. Admin only.
    ///
    /// Ledger records keep the name and tax id they were registered with.
    pub fn update_driver(
        &self,
        user: &User,
        name: &str,
        draft: DriverDraft,
        audit: &dyn AuditSink,
    ) -> EngineResult<Driver> {
        access::ensure_admin(user, "update driver")?;
        self.drivers.update(name, draft, &user.username, audit)
    }

    /// Toggles a driver's status. Admin only.
    pub fn toggle_driver(
        &self,
        user: &User,
        name: &str,
        audit: &dyn AuditSink,
    ) -> EngineResult<Driver> {
        access::ensure_admin(user, "toggle driver status")?;
        self.drivers.toggle_status(name, &user.username, audit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::MemoryAuditSink;
    use crate::models::{BillingMode, MinimumGuaranteed, Role};
    use crate::store::MemoryStore;
    use chrono::NaiveDateTime;
    use rust_decimal::Decimal;
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn make_datetime(date_str: &str, time_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date_str, time_str), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn make_date(date_str: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn admin() -> User {
        User {
            username: "admin".to_string(),
            password_hash: String::new(),
            role: Role::Admin,
            linked_companies: BTreeSet::new(),
        }
    }

    fn supervisor(username: &str, linked: &[&str]) -> User {
        User {
            username: username.to_string(),
            password_hash: String::new(),
            role: Role::Supervisor,
            linked_companies: linked.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn company_draft(name: &str, mode: BillingMode) -> CompanyDraft {
        CompanyDraft {
            name: name.to_string(),
            vehicle_type: "moto".to_string(),
            billing_mode: mode,
            default_charged_rate: "10".to_string(),
            default_paid_rate: "8".to_string(),
            weekend_charged_rate: Some("15".to_string()),
            weekend_paid_rate: Some("12".to_string()),
            override_weekdays: vec![5, 6],
            minimum_guaranteed: MinimumGuaranteed::Yes,
        }
    }

    fn driver_draft(name: &str, tax_id: &str) -> DriverDraft {
        DriverDraft {
            name: name.to_string(),
            tax_id: tax_id.to_string(),
        }
    }

    fn candidate(company: &str, start: NaiveDateTime, end: NaiveDateTime) -> ShiftCandidate {
        ShiftCandidate {
            company: company.to_string(),
            driver: "Joao".to_string(),
            vehicle_type: String::new(),
            start_time: start,
            end_time: end,
        }
    }

    fn engine() -> (BillingEngine, MemoryAuditSink) {
        let engine = BillingEngine::new(
            Arc::new(MemoryStore::new()),
            MissingOverridePolicy::FallBackToDefault,
        );
        let audit = MemoryAuditSink::new();
        engine
            .register_company(&admin(), company_draft("A", BillingMode::Hourly), &audit)
            .unwrap();
        engine
            .register_company(&admin(), company_draft("B", BillingMode::Flat), &audit)
            .unwrap();
        engine
            .register_driver(&admin(), driver_draft("Joao", "01234567890"), &audit)
            .unwrap();
        (engine, audit)
    }

    // ==========================================================================
    // Shift registration
    // ==========================================================================

    #[test]
    fn test_register_hourly_weekday_shift() {
        let (engine, audit) = engine();
        // Monday, 2.5 hours
        let record = engine
            .register_shift(
                &admin(),
                candidate(
                    "A",
                    make_datetime("2026-01-12", "09:00:00"),
                    make_datetime("2026-01-12", "11:30:00"),
                ),
                &audit,
            )
            .unwrap();

        assert_eq!(record.amount_charged, dec("25"));
        assert_eq!(record.amount_paid, dec("20"));
        assert_eq!(record.vehicle_type, "moto");
        assert_eq!(record.driver_tax_id, "01234567890");
        assert_eq!(record.registered_by, "admin");
        assert!(record.minimum_guaranteed_charged);
        assert_eq!(audit.events().last().unwrap().action, AuditAction::ShiftRegistered);
    }

    #[test]
    fn test_register_flat_saturday_uses_weekend_rates() {
        let (engine, audit) = engine();
        let mut c = candidate(
            "B",
            make_datetime("2026-01-17", "08:00:00"),
            make_datetime("2026-01-17", "20:00:00"),
        );
        c.vehicle_type = "carro".to_string();
        let record = engine.register_shift(&admin(), c, &audit).unwrap();
        assert_eq!(record.amount_charged, dec("15"));
        assert_eq!(record.amount_paid, dec("12"));
        assert_eq!(record.vehicle_type, "carro");
    }

    #[test]
    fn test_supervisor_outside_linked_company_denied() {
        let (engine, audit) = engine();
        let ana = supervisor("ana", &["A"]);
        let result = engine.register_shift(
            &ana,
            candidate(
                "B",
                make_datetime("2026-01-12", "09:00:00"),
                make_datetime("2026-01-12", "10:00:00"),
            ),
            &audit,
        );
        assert!(matches!(result, Err(EngineError::AccessDenied { .. })));
        assert!(engine.ledger().all().unwrap().is_empty());
    }

    #[test]
    fn test_inactive_company_or_driver_not_found() {
        let (engine, audit) = engine();
        engine.toggle_company(&admin(), "A", &audit).unwrap();
        let result = engine.register_shift(
            &admin(),
            candidate(
                "A",
                make_datetime("2026-01-12", "09:00:00"),
                make_datetime("2026-01-12", "10:00:00"),
            ),
            &audit,
        );
        assert!(matches!(result, Err(EngineError::NotFound { .. })));

        engine.toggle_driver(&admin(), "Joao", &audit).unwrap();
        let result = engine.register_shift(
            &admin(),
            candidate(
                "B",
                make_datetime("2026-01-12", "09:00:00"),
                make_datetime("2026-01-12", "10:00:00"),
            ),
            &audit,
        );
        match result {
            Err(EngineError::NotFound { entity, .. }) => assert_eq!(entity, "driver"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_interval_not_appended() {
        let (engine, audit) = engine();
        let result = engine.register_shift(
            &admin(),
            candidate(
                "B",
                make_datetime("2026-01-12", "10:00:00"),
                make_datetime("2026-01-12", "10:00:00"),
            ),
            &audit,
        );
        assert!(matches!(result, Err(EngineError::InvalidShiftInterval { .. })));
        assert!(engine.ledger().all().unwrap().is_empty());
    }

    #[test]
    fn test_reject_policy_blocks_incomplete_override_day() {
        let engine = BillingEngine::new(Arc::new(MemoryStore::new()), MissingOverridePolicy::Reject);
        let audit = MemoryAuditSink::new();
        let mut draft = company_draft("C", BillingMode::Hourly);
        draft.weekend_charged_rate = None;
        draft.weekend_paid_rate = None;
        engine.register_company(&admin(), draft, &audit).unwrap();
        engine
            .register_driver(&admin(), driver_draft("Joao", "01234567890"), &audit)
            .unwrap();

        // Saturday
        let result = engine.register_shift(
            &admin(),
            candidate(
                "C",
                make_datetime("2026-01-17", "09:00:00"),
                make_datetime("2026-01-17", "11:00:00"),
            ),
            &audit,
        );
        match result {
            Err(EngineError::MissingRateConfiguration { company, weekday }) => {
                assert_eq!(company, "C");
                assert_eq!(weekday, chrono::Weekday::Sat);
            }
            other => panic!("Expected MissingRateConfiguration, got {:?}", other),
        }
        assert!(engine.ledger().all().unwrap().is_empty());

        // Monday still resolves against the default pair.
        let record = engine
            .register_shift(
                &admin(),
                candidate(
                    "C",
                    make_datetime("2026-01-12", "09:00:00"),
                    make_datetime("2026-01-12", "11:00:00"),
                ),
                &audit,
            )
            .unwrap();
        assert_eq!(record.amount_charged, dec("20"));
    }

    #[test]
    fn test_oversized_rate_rejected_at_registration() {
        let (engine, audit) = engine();
        let mut draft = company_draft("C", BillingMode::Hourly);
        draft.default_charged_rate = "79228162514264337593543950335".to_string();
        assert!(matches!(
            engine.register_company(&admin(), draft, &audit),
            Err(EngineError::InvalidField { field, .. }) if field == "default_charged_rate"
        ));
    }

    #[test]
    fn test_renaming_driver_keeps_ledger_snapshot() {
        let (engine, audit) = engine();
        engine
            .register_shift(
                &admin(),
                candidate(
                    "B",
                    make_datetime("2026-01-12", "09:00:00"),
                    make_datetime("2026-01-12", "10:00:00"),
                ),
                &audit,
            )
            .unwrap();
        engine
            .update_driver(&admin(), "Joao", driver_draft("Joao Silva", "999"), &audit)
            .unwrap();

        let records = engine.ledger().all().unwrap();
        assert_eq!(records[0].driver_name, "Joao");
        assert_eq!(records[0].driver_tax_id, "01234567890");
    }

    // ==========================================================================
    // Listing and export
    // ==========================================================================

    #[test]
    fn test_shifts_for_scopes_supervisors() {
        let (engine, audit) = engine();
        let ana = supervisor("ana", &["A", "B"]);
        let bia = supervisor("bia", &["A", "B"]);
        let slot = |company: &str| {
            candidate(
                company,
                make_datetime("2026-01-12", "09:00:00"),
                make_datetime("2026-01-12", "10:00:00"),
            )
        };
        engine.register_shift(&ana, slot("A"), &audit).unwrap();
        engine.register_shift(&bia, slot("B"), &audit).unwrap();
        engine.register_shift(&admin(), slot("B"), &audit).unwrap();

        let query = LedgerQuery::new(make_date("2026-01-01"), make_date("2026-01-31"));
        let report = engine.shifts_for(&ana, &query).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.totals.shift_count, 1);
        assert_eq!(report.totals.total_charged, dec("10"));

        let all = engine.shifts_for(&admin(), &query).unwrap();
        assert_eq!(all.totals.shift_count, 3);
        assert_eq!(all.totals.total_charged, dec("30"));
    }

    #[test]
    fn test_overflowing_totals_are_an_error() {
        let (engine, audit) = engine();
        let record = engine
            .register_shift(
                &admin(),
                candidate(
                    "B",
                    make_datetime("2026-01-12", "09:00:00"),
                    make_datetime("2026-01-12", "10:00:00"),
                ),
                &audit,
            )
            .unwrap();
        let big = ShiftRecord {
            amount_charged: dec("50000000000000000000000000000"),
            ..record
        };
        engine.ledger().append(big.clone()).unwrap();
        engine.ledger().append(big).unwrap();

        let query = LedgerQuery::new(make_date("2026-01-01"), make_date("2026-01-31"));
        assert!(matches!(
            engine.shifts_for(&admin(), &query),
            Err(EngineError::AmountOverflow { .. })
        ));
        assert!(matches!(
            engine.export_for(&admin(), &query, &audit),
            Err(EngineError::AmountOverflow { .. })
        ));

        let other_month = LedgerQuery::new(make_date("2026-02-01"), make_date("2026-02-28"));
        assert!(engine.shifts_for(&admin(), &other_month).unwrap().records.is_empty());
    }

    #[test]
    fn test_export_empty_selection_is_not_found() {
        let (engine, audit) = engine();
        let query = LedgerQuery::new(make_date("2026-01-01"), make_date("2026-01-31"));
        assert!(matches!(
            engine.export_for(&admin(), &query, &audit),
            Err(EngineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_export_names_file_and_audits() {
        let (engine, audit) = engine();
        engine
            .register_shift(
                &admin(),
                candidate(
                    "B",
                    make_datetime("2026-01-12", "09:00:00"),
                    make_datetime("2026-01-12", "10:00:00"),
                ),
                &audit,
            )
            .unwrap();
        let query = LedgerQuery::new(make_date("2026-01-01"), make_date("2026-01-31"));
        let export = engine
            .export_on(&admin(), &query, make_date("2026-02-01"), &audit)
            .unwrap();
        assert_eq!(export.file_name, "diarias_20260201.csv");
        assert_eq!(export.rows, 1);
        assert_eq!(export.content_type, EXPORT_CONTENT_TYPE);
        assert_eq!(audit.events().last().unwrap().action, AuditAction::ShiftsExported);
    }

    // ==========================================================================
    // Registry administration
    // ==========================================================================

    #[test]
    fn test_supervisor_cannot_administer_registries() {
        let (engine, audit) = engine();
        let ana = supervisor("ana", &["A"]);
        assert!(matches!(
            engine.register_company(&ana, company_draft("C", BillingMode::Flat), &audit),
            Err(EngineError::AccessDenied { .. })
        ));
        assert!(matches!(
            engine.toggle_driver(&ana, "Joao", &audit),
            Err(EngineError::AccessDenied { .. })
        ));
        assert!(engine.all_companies(&ana).is_err());
        assert_eq!(engine.active_drivers().unwrap().len(), 1);
    }

    #[test]
    fn test_companies_for_supervisor() {
        let (engine, _) = engine();
        let names: Vec<String> = engine
            .companies_for(&supervisor("ana", &["B"]))
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["B"]);
        assert!(engine.companies_for(&supervisor("bia", &[])).unwrap().is_empty());
    }
}
