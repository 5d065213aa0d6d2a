//! Driver model.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::parse::parse_name;

use super::Status;

/// A registered delivery driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// Unique driver name.
    pub name: String,
    /// Tax identifier (CPF). Always text; leading zeros are significant.
    #[serde(default)]
    pub tax_id: String,
    /// Soft-delete lifecycle.
    #[serde(default)]
    pub status: Status,
}

/// User-entered driver data, validated into a [`Driver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverDraft {
    /// Driver name; on update this may differ from the current name.
    pub name: String,
    /// Tax identifier, kept verbatim apart from surrounding whitespace.
    #[serde(default)]
    pub tax_id: String,
}

impl DriverDraft {
    /// Validates the draft into an active [`Driver`].
    ///
    /// ```
    /// use diaria_ledger::models::DriverDraft;
    ///
    /// let driver = DriverDraft {
    ///     name: "Joao Silva".to_string(),
    ///     tax_id: "012.345.678-90".to_string(),
    /// }
    /// .validate()
    /// .unwrap();
    /// assert_eq!(driver.tax_id, "012.345.678-90");
    /// ```
    pub fn validate(self) -> EngineResult<Driver> {
        let name = parse_name(&self.name)?;

        Ok(Driver {
            name,
            tax_id: self.tax_id.trim().to_string(),
            status: Status::Active,
        })
    }
}
