//! Company model and its billing plan.
//!
//! A company's plan decides what a shift costs the company and what the
//! driver earns for it: a default rate pair, an optional weekend pair that
//! applies on the configured override weekdays, and whether the company
//! guarantees a minimum payout.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::parse::{
    optional_text_or_number, parse_name, parse_optional_rate, parse_rate, text_or_number,
    weekday_from_index,
};

use super::Status;

/// How a company's rates turn into shift amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingMode {
    /// The rate is the price of the whole shift, whatever its length.
    #[serde(alias = "unico")]
    Flat,
    /// The rate is per hour worked.
    #[serde(alias = "hora", alias = "por_hora")]
    Hourly,
}

/// Whether the company contractually guarantees a minimum payout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinimumGuaranteed {
    /// A minimum payout is guaranteed.
    #[serde(alias = "sim", alias = "s", alias = "S", alias = "Sim")]
    Yes,
    /// No minimum payout.
    #[serde(alias = "não", alias = "nao", alias = "n", alias = "N", alias = "Não")]
    No,
}

impl MinimumGuaranteed {
    /// Returns true for [`MinimumGuaranteed::Yes`].
    pub fn is_guaranteed(self) -> bool {
        self == MinimumGuaranteed::Yes
    }
}

/// A charged/paid rate pair.
///
/// `charged` is what the company owes, `paid` is what the driver receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePair {
    /// Rate billed to the company.
    pub charged: Decimal,
    /// Rate paid to the driver.
    pub paid: Decimal,
}

/// A delivery company and its billing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique company name.
    pub name: String,
    /// Vehicle type the company contracts (e.g. "moto", "carro").
    #[serde(default)]
    pub vehicle_type: String,
    /// Flat-per-shift or hourly billing.
    pub billing_mode: BillingMode,
    /// Rates used on ordinary days.
    pub default_rates: RatePair,
    /// Rates used on override weekdays, when configured.
    #[serde(default)]
    pub weekend_rates: Option<RatePair>,
    /// Weekdays on which the weekend pair replaces the default pair.
    #[serde(default)]
    pub override_weekdays: Vec<Weekday>,
    /// Whether a minimum payout is guaranteed.
    pub minimum_guaranteed: MinimumGuaranteed,
    /// Soft-delete lifecycle.
    #[serde(default)]
    pub status: Status,
}

impl Company {
    /// Returns true when `weekday` is one of the override weekdays.
    pub fn is_override_weekday(&self, weekday: Weekday) -> bool {
        self.override_weekdays.contains(&weekday)
    }

    /// Override weekdays are configured but there is no weekend pair to use.
    pub fn has_incomplete_override(&self) -> bool {
        !self.override_weekdays.is_empty() && self.weekend_rates.is_none()
    }
}

/// User-entered company data, validated into a [`Company`].
///
/// Rates arrive as text (or bare JSON numbers) and are checked by
/// [`CompanyDraft::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyDraft {
    /// Company name; on update this may differ from the current name.
    pub name: String,
    /// Contracted vehicle type.
    #[serde(default)]
    pub vehicle_type: String,
    /// Billing mode.
    pub billing_mode: BillingMode,
    /// Default charged rate.
    #[serde(deserialize_with = "text_or_number")]
    pub default_charged_rate: String,
    /// Default paid rate.
    #[serde(deserialize_with = "text_or_number")]
    pub default_paid_rate: String,
    /// Weekend charged rate; must come with `weekend_paid_rate`.
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub weekend_charged_rate: Option<String>,
    /// Weekend paid rate; must come with `weekend_charged_rate`.
    #[serde(default, deserialize_with = "optional_text_or_number")]
    pub weekend_paid_rate: Option<String>,
    /// Override weekday indices, 0 = Monday .. 6 = Sunday.
    #[serde(default)]
    pub override_weekdays: Vec<u8>,
    /// Minimum-guaranteed flag.
    pub minimum_guaranteed: MinimumGuaranteed,
}

impl CompanyDraft {
    /// Validates the draft into an active [`Company`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidField`] when the name is blank, a rate
    /// is not a non-negative decimal, only one of the two weekend rates is
    /// given, or a weekday index is outside 0-6.
    ///
    /// # Examples
    ///
    /// ```
    /// use diaria_ledger::models::{BillingMode, CompanyDraft, MinimumGuaranteed, Status};
    /// use rust_decimal::Decimal;
    ///
    /// let draft = CompanyDraft {
    ///     name: "Rapido Express".to_string(),
    ///     vehicle_type: "moto".to_string(),
    ///     billing_mode: BillingMode::Hourly,
    ///     default_charged_rate: "10".to_string(),
    ///     default_paid_rate: "8".to_string(),
    ///     weekend_charged_rate: Some("15".to_string()),
    ///     weekend_paid_rate: Some("12".to_string()),
    ///     override_weekdays: vec![5, 6],
    ///     minimum_guaranteed: MinimumGuaranteed::No,
    /// };
    /// let company = draft.validate().unwrap();
    /// assert_eq!(company.default_rates.charged, Decimal::new(10, 0));
    /// assert_eq!(company.override_weekdays.len(), 2);
    /// assert_eq!(company.status, Status::Active);
    /// ```
    pub fn validate(self) -> EngineResult<Company> {
        let name = parse_name(&self.name)?;

        let default_rates = RatePair {
            charged: parse_rate("default_charged_rate", &self.default_charged_rate)?,
            paid: parse_rate("default_paid_rate", &self.default_paid_rate)?,
        };

        let weekend_charged = parse_optional_rate(
            "weekend_charged_rate",
            self.weekend_charged_rate.as_deref(),
        )?;
        let weekend_paid =
            parse_optional_rate("weekend_paid_rate", self.weekend_paid_rate.as_deref())?;
        let weekend_rates = match (weekend_charged, weekend_paid) {
            (Some(charged), Some(paid)) => Some(RatePair { charged, paid }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(EngineError::invalid_field(
                    "weekend_paid_rate",
                    "is required when weekend_charged_rate is set",
                ));
            }
            (None, Some(_)) => {
                return Err(EngineError::invalid_field(
                    "weekend_charged_rate",
                    "is required when weekend_paid_rate is set",
                ));
            }
        };

        let mut override_weekdays = Vec::with_capacity(self.override_weekdays.len());
        let mut indices = self.override_weekdays;
        indices.sort_unstable();
        indices.dedup();
        for index in indices {
            override_weekdays.push(weekday_from_index("override_weekdays", index)?);
        }

        Ok(Company {
            name,
            vehicle_type: self.vehicle_type.trim().to_string(),
            billing_mode: self.billing_mode,
            default_rates,
            weekend_rates,
            override_weekdays,
            minimum_guaranteed: self.minimum_guaranteed,
            status: Status::Active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn draft() -> CompanyDraft {
        CompanyDraft {
            name: "  Rapido Express ".to_string(),
            vehicle_type: "moto".to_string(),
            billing_mode: BillingMode::Flat,
            default_charged_rate: "120".to_string(),
            default_paid_rate: "90,50".to_string(),
            weekend_charged_rate: None,
            weekend_paid_rate: None,
            override_weekdays: vec![],
            minimum_guaranteed: MinimumGuaranteed::Yes,
        }
    }

    #[test]
    fn test_validate_trims_name_and_parses_rates() {
        let company = draft().validate().unwrap();
        assert_eq!(company.name, "Rapido Express");
        assert_eq!(company.default_rates.charged, dec("120"));
        assert_eq!(company.default_rates.paid, dec("90.50"));
        assert_eq!(company.weekend_rates, None);
        assert_eq!(company.status, Status::Active);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let mut d = draft();
        d.name = "   ".to_string();
        assert!(matches!(
            d.validate(),
            Err(EngineError::InvalidField { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_validate_rejects_reserved_name() {
        let mut d = draft();
        d.name = "all".to_string();
        assert!(matches!(
            d.validate(),
            Err(EngineError::InvalidField { field, .. }) if field == "name"
        ));
    }

    #[test]
    fn test_validate_rejects_rate_above_bound() {
        let mut d = draft();
        d.default_charged_rate = "79228162514264337593543950335".to_string();
        assert!(matches!(
            d.validate(),
            Err(EngineError::InvalidField { field, .. }) if field == "default_charged_rate"
        ));
    }

    #[test]
    fn test_validate_rejects_lone_weekend_rate() {
        let mut d = draft();
        d.weekend_charged_rate = Some("150".to_string());
        match d.validate() {
            Err(EngineError::InvalidField { field, .. }) => {
                assert_eq!(field, "weekend_paid_rate")
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }

        let mut d = draft();
        d.weekend_paid_rate = Some("100".to_string());
        match d.validate() {
            Err(EngineError::InvalidField { field, .. }) => {
                assert_eq!(field, "weekend_charged_rate")
            }
            other => panic!("Expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_blank_weekend_rates_mean_unset() {
        let mut d = draft();
        d.weekend_charged_rate = Some("".to_string());
        d.weekend_paid_rate = Some(" ".to_string());
        assert_eq!(d.validate().unwrap().weekend_rates, None);
    }

    #[test]
    fn test_validate_dedupes_and_orders_weekdays() {
        let mut d = draft();
        d.weekend_charged_rate = Some("150".to_string());
        d.weekend_paid_rate = Some("110".to_string());
        d.override_weekdays = vec![6, 5, 6];
        let company = d.validate().unwrap();
        assert_eq!(company.override_weekdays, vec![Weekday::Sat, Weekday::Sun]);
        assert!(company.is_override_weekday(Weekday::Sun));
        assert!(!company.is_override_weekday(Weekday::Mon));
    }

    #[test]
    fn test_validate_rejects_weekday_out_of_range() {
        let mut d = draft();
        d.override_weekdays = vec![7];
        assert!(d.validate().is_err());
    }

    #[test]
    fn test_incomplete_override_detection() {
        let mut d = draft();
        d.override_weekdays = vec![6];
        let company = d.validate().unwrap();
        assert!(company.has_incomplete_override());
    }

    #[test]
    fn test_draft_deserializes_legacy_labels_and_numbers() {
        let json = r#"{
            "name": "Entrega Ja",
            "billing_mode": "hora",
            "default_charged_rate": 12.5,
            "default_paid_rate": "10",
            "weekend_charged_rate": null,
            "minimum_guaranteed": "sim"
        }"#;
        let d: CompanyDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.billing_mode, BillingMode::Hourly);
        assert_eq!(d.minimum_guaranteed, MinimumGuaranteed::Yes);
        assert_eq!(d.default_charged_rate, "12.5");
        assert_eq!(d.weekend_charged_rate, None);
        assert!(d.vehicle_type.is_empty());
    }

    #[test]
    fn test_company_serialization_round_trip() {
        let company = draft().validate().unwrap();
        let json = serde_json::to_string(&company).unwrap();
        assert!(json.contains("\"billing_mode\":\"flat\""));
        assert!(json.contains("\"charged\":\"120\""));
        let back: Company = serde_json::from_str(&json).unwrap();
        assert_eq!(back, company);
    }
}
