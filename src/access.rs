//! Access scope filtering.
//!
//! Admins see and act on everything. Supervisors act only on their linked
//! companies and see only the shift records they registered themselves,
//! even for a linked company. A supervisor with no linked companies sees no
//! companies and can register nothing.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{Company, ShiftRecord, User};

/// Which ledger records a query may return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleScope {
    /// Every record.
    Admin,
    /// Only records registered by this username.
    Supervisor {
        /// The supervisor's username.
        username: String,
    },
}

impl RoleScope {
    /// Derives the scope of an authenticated user.
    pub fn for_user(user: &User) -> Self {
        if user.is_admin() {
            RoleScope::Admin
        } else {
            RoleScope::Supervisor {
                username: user.username.clone(),
            }
        }
    }

    /// Returns true when the record is inside this scope.
    pub fn permits(&self, record: &ShiftRecord) -> bool {
        match self {
            RoleScope::Admin => true,
            RoleScope::Supervisor { username } => record.registered_by == *username,
        }
    }
}

/// Active companies the user may see.
///
/// Admins get every active company; supervisors get the active companies in
/// their linked set. Input order is preserved.
///
/// # Example
///
/// ```
/// use diaria_ledger::access::companies_visible_to;
/// use diaria_ledger::models::{Role, User};
/// use std::collections::BTreeSet;
///
/// let unlinked = User {
///     username: "ana".to_string(),
///     password_hash: String::new(),
///     role: Role::Supervisor,
///     linked_companies: BTreeSet::new(),
/// };
/// assert!(companies_visible_to(&unlinked, &[]).is_empty());
/// ```
pub fn companies_visible_to(user: &User, companies: &[Company]) -> Vec<Company> {
    companies
        .iter()
        .filter(|c| c.status.is_active())
        .filter(|c| user.is_admin() || user.is_linked_to(&c.name))
        .cloned()
        .collect()
}

/// Returns true when the user may register shifts against `company_name`.
pub fn can_register_against(user: &User, company_name: &str) -> bool {
    user.is_admin() || user.is_linked_to(company_name)
}

/// Like [`can_register_against`], but as an [`EngineError::AccessDenied`].
pub fn ensure_can_register(user: &User, company_name: &str) -> EngineResult<()> {
    if can_register_against(user, company_name) {
        return Ok(());
    }

    warn!(
        username = %user.username,
        company = %company_name,
        "Shift registration outside linked companies"
    );
    Err(EngineError::AccessDenied {
        username: user.username.clone(),
        message: format!("not linked to company '{}'", company_name),
    })
}

/// Fails with [`EngineError::AccessDenied`] unless the user is an admin.
pub fn ensure_admin(user: &User, action: &str) -> EngineResult<()> {
    if user.is_admin() {
        return Ok(());
    }

    warn!(username = %user.username, action = %action, "Admin-only action refused");
    Err(EngineError::AccessDenied {
        username: user.username.clone(),
        message: format!("{} requires the admin role", action),
    })
}
