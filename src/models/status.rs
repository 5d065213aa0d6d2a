//! Soft-delete lifecycle shared by companies and drivers.

use serde::{Deserialize, Serialize};

/// Whether a registry entry is offered for new work.
///
/// Entries are never physically removed; deactivation flips this field and
/// leaves historical shift records untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Listed in operational pickers and accepted for new shifts.
    #[default]
    #[serde(alias = "ativo")]
    Active,
    /// Kept for history only.
    #[serde(alias = "excluido", alias = "inativo")]
    Inactive,
}

impl Status {
    /// Returns the opposite status.
    ///
    /// ```
    /// use diaria_ledger::models::Status;
    ///
    /// assert_eq!(Status::Active.toggled(), Status::Inactive);
    /// assert_eq!(Status::Inactive.toggled(), Status::Active);
    /// ```
    pub fn toggled(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }

    /// Returns true for [`Status::Active`].
    pub fn is_active(self) -> bool {
        self == Status::Active
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Inactive => write!(f, "inactive"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_twice_is_identity() {
        for status in [Status::Active, Status::Inactive] {
            assert_eq!(status.toggled().toggled(), status);
            assert_ne!(status.toggled(), status);
        }
    }

    #[test]
    fn test_default_is_active() {
        assert_eq!(Status::default(), Status::Active);
    }

    #[test]
    fn test_status_serialization_accepts_legacy_labels() {
        assert_eq!(serde_json::to_string(&Status::Inactive).unwrap(), "\"inactive\"");
        let legacy: Status = serde_json::from_str("\"excluido\"").unwrap();
        assert_eq!(legacy, Status::Inactive);
        let legacy: Status = serde_json::from_str("\"ativo\"").unwrap();
        assert_eq!(legacy, Status::Active);
    }
}
