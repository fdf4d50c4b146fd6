//! # Waitlist Entry
//!
//! The persisted record. [`WaitlistFields`] holds the attributes a registrant
//! supplies; [`NewWaitlistEntry`] pairs them with a freshly minted
//! [`UniqueId`] for insertion; [`WaitlistEntry`] is the row as stored, with
//! the service-assigned `id` and `created_at`.
//!
//! All three serialize with the table's snake_case column names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::choices::{
    AlertMethod, AnnualRevenue, Budget, BusinessGoal, CompanySize, GovExperience, Language,
    TargetMarket,
};
use crate::error::ValidationError;
use crate::identity::UniqueId;

/// Upper bound of `success_rate`, a percentage.
pub const MAX_SUCCESS_RATE: i32 = 100;

/// Attributes of a waitlist entry, excluding identity and audit columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistFields {
    pub full_name: String,
    pub job_title: String,
    pub email: String,
    pub phone_number: String,
    pub language: Language,
    pub company_name: String,
    pub business_sector: String,
    pub has_capacity: bool,
    pub interested_in_automation: bool,
    pub target_markets: Vec<TargetMarket>,
    #[serde(default)]
    pub other_markets: Option<String>,
    pub budget: Budget,
    pub alert_method: AlertMethod,
    pub beta_tester: bool,

    #[serde(default)]
    pub company_size: Option<CompanySize>,
    #[serde(default)]
    pub annual_revenue: Option<AnnualRevenue>,
    #[serde(default)]
    pub gov_experience: Option<GovExperience>,
    #[serde(default)]
    pub contracts_annually: Option<i32>,
    #[serde(default)]
    pub success_rate: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub business_goals: Vec<BusinessGoal>,
}

impl WaitlistFields {
    /// Check the record-level invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant:
    /// - required text attributes must be non-blank;
    /// - `target_markets` must be non-empty;
    /// - `other_markets` must be non-blank iff `target_markets` contains
    ///   [`TargetMarket::Other`];
    /// - numeric attributes must be non-negative, and `success_rate` at
    ///   most [`MAX_SUCCESS_RATE`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("full_name", &self.full_name),
            ("job_title", &self.job_title),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
            ("company_name", &self.company_name),
            ("business_sector", &self.business_sector),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
        }

        if self.target_markets.is_empty() {
            return Err(ValidationError::Required {
                field: "target_markets",
            });
        }

        let other_selected = self.target_markets.contains(&TargetMarket::Other);
        let other_given = self
            .other_markets
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        match (other_selected, other_given) {
            (true, false) => return Err(ValidationError::OtherMarketsRequired),
            (false, true) => return Err(ValidationError::UnexpectedOtherMarkets),
            _ => {}
        }

        check_range("contracts_annually", self.contracts_annually, i32::MAX)?;
        check_range("success_rate", self.success_rate, MAX_SUCCESS_RATE)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: Option<i32>, max: i32) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < 0 || v > max => Err(ValidationError::OutOfRange {
            field,
            value: i64::from(v),
            min: 0,
            max: i64::from(max),
        }),
        _ => Ok(()),
    }
}

/// A record ready for insertion: validated fields plus a generated identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWaitlistEntry {
    pub unique_id: UniqueId,
    #[serde(flatten)]
    pub fields: WaitlistFields,
}

impl NewWaitlistEntry {
    /// Attach a freshly generated identifier to `fields`.
    pub fn generate(fields: WaitlistFields) -> Self {
        Self {
            unique_id: UniqueId::generate(),
            fields,
        }
    }

    /// Materialize the row as the store would return it.
    pub fn into_entry(self, id: Uuid, created_at: DateTime<Utc>) -> WaitlistEntry {
        WaitlistEntry {
            id,
            created_at,
            unique_id: self.unique_id,
            fields: self.fields,
        }
    }
}

/// A stored waitlist row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub unique_id: UniqueId,
    #[serde(flatten)]
    pub fields: WaitlistFields,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn fields() -> WaitlistFields {
        WaitlistFields {
            full_name: "Marie Tremblay".into(),
            job_title: "Directrice".into(),
            email: "marie@example.ca".into(),
            phone_number: "(514) 555-0199".into(),
            language: Language::French,
            company_name: "Tremblay Construction".into(),
            business_sector: "Construction".into(),
            has_capacity: true,
            interested_in_automation: true,
            target_markets: vec![TargetMarket::ProvincialQc, TargetMarket::Federal],
            other_markets: None,
            budget: Budget::From200To500,
            alert_method: AlertMethod::Email,
            beta_tester: false,
            company_size: None,
            annual_revenue: None,
            gov_experience: None,
            contracts_annually: None,
            success_rate: None,
            business_goals: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::fields;
    use super::*;

    #[test]
    fn valid_fields_pass() {
        assert_eq!(fields().validate(), Ok(()));
    }

    #[test]
    fn blank_required_text_is_rejected() {
        let mut f = fields();
        f.company_name = "   ".into();
        assert_eq!(
            f.validate(),
            Err(ValidationError::Required {
                field: "company_name"
            })
        );
    }

    #[test]
    fn empty_target_markets_is_rejected() {
        let mut f = fields();
        f.target_markets.clear();
        assert_eq!(
            f.validate(),
            Err(ValidationError::Required {
                field: "target_markets"
            })
        );
    }

    #[test]
    fn other_markets_present_iff_other_selected() {
        let mut f = fields();
        f.target_markets = vec![TargetMarket::Other];
        assert_eq!(f.validate(), Err(ValidationError::OtherMarketsRequired));

        f.other_markets = Some("NATO".into());
        assert_eq!(f.validate(), Ok(()));

        f.target_markets = vec![TargetMarket::Federal];
        assert_eq!(f.validate(), Err(ValidationError::UnexpectedOtherMarkets));
    }

    #[test]
    fn numeric_ranges() {
        let mut f = fields();
        f.success_rate = Some(100);
        f.contracts_annually = Some(0);
        assert_eq!(f.validate(), Ok(()));

        f.success_rate = Some(101);
        assert!(matches!(
            f.validate(),
            Err(ValidationError::OutOfRange {
                field: "success_rate",
                ..
            })
        ));

        f.success_rate = None;
        f.contracts_annually = Some(-1);
        assert!(matches!(
            f.validate(),
            Err(ValidationError::OutOfRange {
                field: "contracts_annually",
                ..
            })
        ));
    }

    #[test]
    fn stored_row_uses_snake_case_columns() {
        let entry = NewWaitlistEntry::generate(fields()).into_entry(Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["full_name"], "Marie Tremblay");
        assert_eq!(json["target_markets"][0], "provincial-qc");
        assert_eq!(json["unique_id"], entry.unique_id.as_str());
        assert!(json["other_markets"].is_null());
        assert_eq!(json["business_goals"], serde_json::json!([]));
    }

    #[test]
    fn row_with_null_goals_and_extra_columns_deserializes() {
        let entry = NewWaitlistEntry::generate(fields()).into_entry(Uuid::new_v4(), Utc::now());
        let mut json = serde_json::to_value(&entry).unwrap();
        json["business_goals"] = serde_json::Value::Null;
        json["updated_at"] = serde_json::json!("2024-01-01T00:00:00Z");

        let back: WaitlistEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
