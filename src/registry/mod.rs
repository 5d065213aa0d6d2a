//! Company and driver registries.
//!
//! Both registries share one lifecycle: entries are registered from
//! validated drafts, edited (which always reactivates them), toggled between
//! active and inactive, and never deleted. [`Registry`] implements that
//! lifecycle once over any [`RegistryEntry`].
//!
//! Every mutation holds the registry's write lock across the whole
//! load → modify → persist cycle, so concurrent edits cannot overwrite each
//! other.

mod company;
mod driver;

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::audit::{AuditAction, AuditEvent, AuditSink};
use crate::error::{EngineError, EngineResult};
use crate::models::{Company, Driver, Status};
use crate::store::BillingStore;

/// Registry of delivery companies.
pub type CompanyRegistry = Registry<Company>;

/// Registry of drivers.
pub type DriverRegistry = Registry<Driver>;

/// An entity kept by a [`Registry`].
pub trait RegistryEntry: Clone + Send + Sync + 'static {
    /// Entity label used in errors and logs ("company", "driver").
    const ENTITY: &'static str;
    /// Audit action for a registration.
    const REGISTERED: AuditAction;
    /// Audit action for an edit.
    const UPDATED: AuditAction;
    /// Audit action for a status toggle.
    const TOGGLED: AuditAction;

    /// User-entered data the entity is validated from.
    type Draft;

    /// Unique name.
    fn name(&self) -> &str;
    /// Current lifecycle status.
    fn status(&self) -> Status;
    /// Sets the lifecycle status.
    fn set_status(&mut self, status: Status);
    /// Validates a draft into an active entity.
    fn from_draft(draft: Self::Draft) -> EngineResult<Self>;
    /// Short description for audit details.
    fn summary(&self) -> String;

    /// Loads the whole collection from the store.
    fn load(store: &dyn BillingStore) -> EngineResult<Vec<Self>>;
    /// Persists the whole collection to the store.
    fn persist(store: &dyn BillingStore, entries: &[Self]) -> EngineResult<()>;
}

/// A soft-delete registry over a [`BillingStore`].
pub struct Registry<E: RegistryEntry> {
    store: Arc<dyn BillingStore>,
    write_lock: Mutex<()>,
    _entry: PhantomData<fn() -> E>,
}

impl<E: RegistryEntry> Registry<E> {
    /// Creates a registry over the given store.
    pub fn new(store: Arc<dyn BillingStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
            _entry: PhantomData,
        }
    }

    /// Registers a new entry.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidField`] when the draft does not validate
    /// - [`EngineError::DuplicateName`] when any entry, active or not,
    ///   already has the name
    /// - [`EngineError::Persistence`] when the store fails
    pub fn register(
        &self,
        draft: E::Draft,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> EngineResult<E> {
        let entry = E::from_draft(draft)?;

        let _guard = self.lock()?;
        let mut entries = E::load(self.store.as_ref())?;
        if entries.iter().any(|e| e.name() == entry.name()) {
            return Err(EngineError::DuplicateName {
                entity: E::ENTITY.to_string(),
                name: entry.name().to_string(),
            });
        }

        entries.push(entry.clone());
        E::persist(self.store.as_ref(), &entries)?;

        info!(entity = E::ENTITY, name = %entry.name(), actor = %actor, "Registered");
        audit.emit(AuditEvent::new(E::REGISTERED, actor, entry.summary()));
        Ok(entry)
    }

    /// Replaces the entry named `name` with the validated draft.
    ///
    /// The draft may rename the entry. The result is always active.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] when no entry is named `name`
    /// - [`EngineError::DuplicateName`] when renaming onto another entry
    /// - [`EngineError::InvalidField`] / [`EngineError::Persistence`] as for
    ///   [`Registry::register`]
    pub fn update(
        &self,
        name: &str,
        draft: E::Draft,
        actor: &str,
        audit: &dyn AuditSink,
    ) -> EngineResult<E> {
        let mut updated = E::from_draft(draft)?;
        updated.set_status(Status::Active);

        let _guard = self.lock()?;
        let mut entries = E::load(self.store.as_ref())?;
        let index = Self::position(&entries, name)?;

        let clashes = entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.name() == updated.name());
        if clashes {
            return Err(EngineError::DuplicateName {
                entity: E::ENTITY.to_string(),
                name: updated.name().to_string(),
            });
        }

        entries[index] = updated.clone();
        E::persist(self.store.as_ref(), &entries)?;

        info!(
            entity = E::ENTITY,
            name = %name,
            new_name = %updated.name(),
            actor = %actor,
            "Updated"
        );
        audit.emit(AuditEvent::new(E::UPDATED, actor, updated.summary()));
        Ok(updated)
    }

    /// Flips the entry between active and inactive and returns it.
    pub fn toggle_status(&self, name: &str, actor: &str, audit: &dyn AuditSink) -> EngineResult<E> {
        let _guard = self.lock()?;
        let mut entries = E::load(self.store.as_ref())?;
        let index = Self::position(&entries, name)?;

        let status = entries[index].status().toggled();
        entries[index].set_status(status);
        E::persist(self.store.as_ref(), &entries)?;

        let entry = entries.swap_remove(index);
        info!(entity = E::ENTITY, name = %name, status = %status, actor = %actor, "Status toggled");
        audit.emit(AuditEvent::new(
            E::TOGGLED,
            actor,
            format!("{} is now {}", entry.name(), status),
        ));
        Ok(entry)
    }

    /// Every entry, including inactive ones, in registration order.
    pub fn list_all(&self) -> EngineResult<Vec<E>> {
        E::load(self.store.as_ref())
    }

    /// Active entries only, in registration order.
    pub fn list_active(&self) -> EngineResult<Vec<E>> {
        let mut entries = self.list_all()?;
        entries.retain(|e| e.status().is_active());
        Ok(entries)
    }

    /// The entry named `name`, whatever its status.
    pub fn find(&self, name: &str) -> EngineResult<E> {
        self.list_all()?
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| EngineError::not_found(E::ENTITY, name))
    }

    /// The entry named `name`, if it is active.
    pub fn find_active(&self, name: &str) -> EngineResult<E> {
        self.list_active()?
            .into_iter()
            .find(|e| e.name() == name)
            .ok_or_else(|| EngineError::not_found(E::ENTITY, name))
    }

    fn position(entries: &[E], name: &str) -> EngineResult<usize> {
        entries
            .iter()
            .position(|e| e.name() == name)
            .ok_or_else(|| EngineError::not_found(E::ENTITY, name))
    }

    fn lock(&self) -> EngineResult<std::sync::MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| EngineError::persistence(E::ENTITY, "registry lock poisoned"))
    }
}
