//! Configuration types for the ledger engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::calculation::MissingOverridePolicy;
use crate::models::User;

/// Engine settings from `settings.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineSettings {
    /// Directory the JSON file store keeps its collections in.
    pub data_dir: PathBuf,
    /// What to do when a shift falls on an override weekday but the company
    /// has no weekend rates.
    #[serde(default)]
    pub missing_override_policy: MissingOverridePolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            missing_override_policy: MissingOverridePolicy::default(),
        }
    }
}

/// Users file structure from `users.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersConfig {
    /// Every known user.
    pub users: Vec<User>,
}

/// Lookup of configured users by username.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: HashMap<String, User>,
}

impl UserDirectory {
    /// Builds a directory, returning the first duplicated username on clash.
    pub fn from_users(users: Vec<User>) -> Result<Self, String> {
        let mut by_name = HashMap::with_capacity(users.len());
        for user in users {
            let username = user.username.clone();
            if by_name.insert(username.clone(), user).is_some() {
                return Err(username);
            }
        }
        Ok(Self { users: by_name })
    }

    /// The user with this username.
    pub fn find(&self, username: &str) -> Option<&User> {
        self.users.get(username)
    }

    /// The user with this username, if the stored hash matches.
    ///
    /// Hashes are compared as opaque strings; hashing happens upstream.
    pub fn authenticate(&self, username: &str, password_hash: &str) -> Option<&User> {
        self.find(username)
            .filter(|user| !user.password_hash.is_empty() && user.password_hash == password_hash)
    }

    /// Every user, sorted by username.
    pub fn users(&self) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.values().collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    /// Number of configured users.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true when no users are configured.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use std::collections::BTreeSet;

    fn user(username: &str, hash: &str) -> User {
        User {
            username: username.to_string(),
            password_hash: hash.to_string(),
            role: Role::Supervisor,
            linked_companies: BTreeSet::new(),
        }
    }

    #[test]
    fn test_settings_default_policy_is_fallback() {
        let settings: EngineSettings = serde_yaml::from_str("data_dir: /var/lib/diarias\n").unwrap();
        assert_eq!(settings.data_dir, PathBuf::from("/var/lib/diarias"));
        assert_eq!(
            settings.missing_override_policy,
            MissingOverridePolicy::FallBackToDefault
        );
    }

    #[test]
    fn test_settings_reject_policy() {
        let settings: EngineSettings =
            serde_yaml::from_str("data_dir: data\nmissing_override_policy: reject\n").unwrap();
        assert_eq!(settings.missing_override_policy, MissingOverridePolicy::Reject);
    }

    #[test]
    fn test_directory_rejects_duplicates() {
        let result = UserDirectory::from_users(vec![user("ana", "x"), user("ana", "y")]);
        assert_eq!(result.unwrap_err(), "ana");
    }

    #[test]
    fn test_authenticate() {
        let directory =
            UserDirectory::from_users(vec![user("ana", "abc123"), user("bia", "")]).unwrap();
        assert!(directory.authenticate("ana", "abc123").is_some());
        assert!(directory.authenticate("ana", "wrong").is_none());
        assert!(directory.authenticate("ghost", "abc123").is_none());
        // An empty stored hash never authenticates.
        assert!(directory.authenticate("bia", "").is_none());
        assert!(directory.find("bia").is_some());
    }

    #[test]
    fn test_users_sorted() {
        let directory =
            UserDirectory::from_users(vec![user("zeca", "1"), user("ana", "2")]).unwrap();
        let names: Vec<&str> = directory.users().iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["ana", "zeca"]);
        assert_eq!(directory.len(), 2);
    }
}
