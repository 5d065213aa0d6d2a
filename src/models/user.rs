//! Users acting on the engine.
//!
//! Users come from the calling layer already authenticated; the engine only
//! reads their role and linked companies to decide scope.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The role a user acts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Unrestricted access.
    Admin,
    /// Restricted to linked companies and to their own shift records.
    Supervisor,
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique login name.
    pub username: String,
    /// Opaque password hash; only ever compared for equality.
    #[serde(default, skip_serializing)]
    pub password_hash: String,
    /// Role the user acts with.
    pub role: Role,
    /// Companies a supervisor may act on. Ignored for admins.
    #[serde(default)]
    pub linked_companies: BTreeSet<String>,
}

impl User {
    /// Returns true for admins.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true when `company` is among the linked companies.
    pub fn is_linked_to(&self, company: &str) -> bool {
        self.linked_companies.contains(company)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_supervisor() {
        let yaml = r#"
username: ana
password_hash: "5e884898"
role: supervisor
linked_companies: ["Rapido Express", "Entrega Ja"]
"#;
        let user: User = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(user.role, Role::Supervisor);
        assert!(user.is_linked_to("Entrega Ja"));
        assert!(!user.is_linked_to("Outra"));
        assert!(!user.is_admin());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User {
            username: "admin".to_string(),
            password_hash: "secret-hash".to_string(),
            role: Role::Admin,
            linked_companies: BTreeSet::new(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("\"role\":\"admin\""));
    }
}
