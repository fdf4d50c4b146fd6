//! # Signup Draft
//!
//! The in-progress answers of the signup form, keyed by the form's camelCase
//! field names. Every single-valued answer is kept as text, exactly as typed
//! or selected, including yes/no answers and numbers. [`Draft::coerce`]
//! turns a complete draft into typed [`WaitlistFields`].
//!
//! Deserialization is lenient about scalar types so that a draft posted by a
//! client that sends `true`, `42` or `null` still reads as `"yes"`, `"42"`
//! and `""`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::choices::{
    AlertMethod, AnnualRevenue, Budget, BusinessGoal, Choice, CompanySize, GovExperience,
    Language, TargetMarket, YesNo,
};
use crate::entry::WaitlistFields;
use crate::error::{FormError, ValidationError};
use crate::schema::FieldName;

/// Value supplied to a single form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Text(String),
    Many(Vec<String>),
}

impl FieldInput {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn many<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Many(values.into_iter().map(Into::into).collect())
    }
}

/// Borrowed view of a draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Many(&'a [String]),
}

impl FieldValue<'_> {
    /// Whether the field counts as answered: non-blank text, or a
    /// non-empty selection.
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Many(v) => !v.is_empty(),
        }
    }
}

/// The form's answers so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Draft {
    #[serde(deserialize_with = "lenient_text")]
    pub full_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub job_title: String,
    #[serde(deserialize_with = "lenient_text")]
    pub email: String,
    #[serde(deserialize_with = "lenient_text")]
    pub phone_number: String,
    #[serde(deserialize_with = "lenient_text")]
    pub language: String,
    #[serde(deserialize_with = "lenient_text")]
    pub company_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub business_sector: String,
    #[serde(deserialize_with = "lenient_text")]
    pub has_capacity: String,
    #[serde(deserialize_with = "lenient_text")]
    pub interested_in_automation: String,
    #[serde(deserialize_with = "lenient_list")]
    pub target_markets: Vec<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub other_markets: String,
    #[serde(deserialize_with = "lenient_text")]
    pub budget: String,
    #[serde(deserialize_with = "lenient_text")]
    pub alert_method: String,
    #[serde(deserialize_with = "lenient_text")]
    pub beta_tester: String,
    #[serde(deserialize_with = "lenient_text")]
    pub company_size: String,
    #[serde(deserialize_with = "lenient_text")]
    pub annual_revenue: String,
    #[serde(deserialize_with = "lenient_text")]
    pub gov_experience: String,
    #[serde(deserialize_with = "lenient_text")]
    pub contracts_annually: String,
    #[serde(deserialize_with = "lenient_text")]
    pub success_rate: String,
    #[serde(deserialize_with = "lenient_list")]
    pub business_goals: Vec<String>,
}

impl Draft {
    /// Borrow the current value of `field`.
    pub fn value(&self, field: FieldName) -> FieldValue<'_> {
        use FieldName as F;
        match field {
            F::FullName => FieldValue::Text(&self.full_name),
            F::JobTitle => FieldValue::Text(&self.job_title),
            F::Email => FieldValue::Text(&self.email),
            F::PhoneNumber => FieldValue::Text(&self.phone_number),
            F::Language => FieldValue::Text(&self.language),
            F::CompanyName => FieldValue::Text(&self.company_name),
            F::BusinessSector => FieldValue::Text(&self.business_sector),
            F::HasCapacity => FieldValue::Text(&self.has_capacity),
            F::InterestedInAutomation => FieldValue::Text(&self.interested_in_automation),
            F::TargetMarkets => FieldValue::Many(&self.target_markets),
            F::OtherMarkets => FieldValue::Text(&self.other_markets),
            F::Budget => FieldValue::Text(&self.budget),
            F::AlertMethod => FieldValue::Text(&self.alert_method),
            F::BetaTester => FieldValue::Text(&self.beta_tester),
            F::CompanySize => FieldValue::Text(&self.company_size),
            F::AnnualRevenue => FieldValue::Text(&self.annual_revenue),
            F::GovExperience => FieldValue::Text(&self.gov_experience),
            F::ContractsAnnually => FieldValue::Text(&self.contracts_annually),
            F::SuccessRate => FieldValue::Text(&self.success_rate),
            F::BusinessGoals => FieldValue::Many(&self.business_goals),
        }
    }

    /// Whether `field` counts as answered.
    pub fn is_filled(&self, field: FieldName) -> bool {
        self.value(field).is_filled()
    }

    /// Overwrite `field` with `input`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::KindMismatch`] when a list is given for a
    /// single-valued field or text for a multi-select field. The draft is
    /// not modified in that case.
    pub fn set(&mut self, field: FieldName, input: FieldInput) -> Result<(), FormError> {
        match (self.slot_mut(field), input) {
            (Slot::Text(slot), FieldInput::Text(v)) => *slot = v,
            (Slot::Many(slot), FieldInput::Many(v)) => *slot = v,
            _ => return Err(FormError::KindMismatch { field }),
        }
        Ok(())
    }

    /// Whether `other` is among the selected target markets.
    pub fn other_market_selected(&self) -> bool {
        self.target_markets
            .iter()
            .any(|m| m.trim() == TargetMarket::Other.as_str())
    }

    fn slot_mut(&mut self, field: FieldName) -> Slot<'_> {
        use FieldName as F;
        match field {
            F::FullName => Slot::Text(&mut self.full_name),
            F::JobTitle => Slot::Text(&mut self.job_title),
            F::Email => Slot::Text(&mut self.email),
            F::PhoneNumber => Slot::Text(&mut self.phone_number),
            F::Language => Slot::Text(&mut self.language),
            F::CompanyName => Slot::Text(&mut self.company_name),
            F::BusinessSector => Slot::Text(&mut self.business_sector),
            F::HasCapacity => Slot::Text(&mut self.has_capacity),
            F::InterestedInAutomation => Slot::Text(&mut self.interested_in_automation),
            F::TargetMarkets => Slot::Many(&mut self.target_markets),
            F::OtherMarkets => Slot::Text(&mut self.other_markets),
            F::Budget => Slot::Text(&mut self.budget),
            F::AlertMethod => Slot::Text(&mut self.alert_method),
            F::BetaTester => Slot::Text(&mut self.beta_tester),
            F::CompanySize => Slot::Text(&mut self.company_size),
            F::AnnualRevenue => Slot::Text(&mut self.annual_revenue),
            F::GovExperience => Slot::Text(&mut self.gov_experience),
            F::ContractsAnnually => Slot::Text(&mut self.contracts_annually),
            F::SuccessRate => Slot::Text(&mut self.success_rate),
            F::BusinessGoals => Slot::Many(&mut self.business_goals),
        }
    }

    /// Convert the draft into typed record fields and check the record
    /// invariants.
    ///
    /// - yes/no answers: `"yes"` is `true`, anything else `false`;
    /// - numbers: blank or non-integer text is absent;
    /// - optional selects: blank is absent;
    /// - `otherMarkets` is dropped unless `other` is selected.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank required answer, an
    /// unrecognised option, a missing `otherMarkets` elaboration, or a
    /// number out of range.
    pub fn coerce(&self) -> Result<WaitlistFields, ValidationError> {
        let target_markets = parse_list::<TargetMarket>(&self.target_markets)?;
        let other_markets = if target_markets.contains(&TargetMarket::Other) {
            non_blank(&self.other_markets)
        } else {
            None
        };

        let fields = WaitlistFields {
            full_name: self.full_name.trim().to_string(),
            job_title: self.job_title.trim().to_string(),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            language: parse_required::<Language>(&self.language)?,
            company_name: self.company_name.trim().to_string(),
            business_sector: self.business_sector.trim().to_string(),
            has_capacity: YesNo::answer_is_yes(&self.has_capacity),
            interested_in_automation: YesNo::answer_is_yes(&self.interested_in_automation),
            target_markets,
            other_markets,
            budget: parse_required::<Budget>(&self.budget)?,
            alert_method: parse_required::<AlertMethod>(&self.alert_method)?,
            beta_tester: YesNo::answer_is_yes(&self.beta_tester),
            company_size: parse_optional::<CompanySize>(&self.company_size)?,
            annual_revenue: parse_optional::<AnnualRevenue>(&self.annual_revenue)?,
            gov_experience: parse_optional::<GovExperience>(&self.gov_experience)?,
            contracts_annually: parse_number(&self.contracts_annually),
            success_rate: parse_number(&self.success_rate),
            business_goals: parse_list::<BusinessGoal>(&self.business_goals)?,
        };
        fields.validate()?;
        Ok(fields)
    }
}

enum Slot<'a> {
    Text(&'a mut String),
    Many(&'a mut Vec<String>),
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_required<T>(raw: &str) -> Result<T, ValidationError>
where
    T: Choice,
{
    parse_optional(raw)?.ok_or(ValidationError::Required { field: T::COLUMN })
}

fn parse_optional<T>(raw: &str) -> Result<Option<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    match raw.trim() {
        "" => Ok(None),
        value => value.parse().map(Some),
    }
}

fn parse_list<T>(raw: &[String]) -> Result<Vec<T>, ValidationError>
where
    T: std::str::FromStr<Err = ValidationError> + PartialEq,
{
    let mut out = Vec::with_capacity(raw.len());
    for value in raw {
        let parsed: T = value.trim().parse()?;
        if !out.contains(&parsed) {
            out.push(parsed);
        }
    }
    Ok(out)
}

fn parse_number(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(true) => Ok(YesNo::Yes.as_str().to_string()),
        Value::Bool(false) => Ok(YesNo::No.as_str().to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string, found {other}"
        ))),
    }
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A draft with every required answer filled in.
    pub fn complete() -> Draft {
        Draft {
            full_name: "Marie Tremblay".into(),
            job_title: "Directrice".into(),
            email: "marie@example.ca".into(),
            phone_number: "(514) 555-0199".into(),
            language: "french".into(),
            company_name: "Tremblay Construction".into(),
            business_sector: "Construction".into(),
            has_capacity: "yes".into(),
            interested_in_automation: "yes".into(),
            target_markets: vec!["provincial-qc".into(), "federal".into()],
            budget: "200-500".into(),
            alert_method: "email".into(),
            beta_tester: "no".into(),
            ..Draft::default()
        }
    }
}
