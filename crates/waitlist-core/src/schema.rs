//! # Form Schema
//!
//! Declarative description of the signup form: eight [`Step`]s, each listing
//! [`FieldSpec`]s. Validation is driven entirely by each field's [`FieldKind`]
//! and [`Requirement`], so adding a field means adding a row to [`STEPS`].

use serde::{Deserialize, Serialize};

use crate::choices::{
    AlertMethod, AnnualRevenue, Budget, BusinessGoal, CompanySize, GovExperience, Language,
    TargetMarket, YesNo,
};
use crate::draft::{Draft, FieldInput};
use crate::entry::MAX_SUCCESS_RATE;
use crate::error::FormError;

use FieldName as F;

/// Form field names, serialized with the camelCase keys of the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FullName,
    JobTitle,
    Email,
    PhoneNumber,
    Language,
    CompanyName,
    BusinessSector,
    HasCapacity,
    InterestedInAutomation,
    TargetMarkets,
    OtherMarkets,
    Budget,
    AlertMethod,
    BetaTester,
    CompanySize,
    AnnualRevenue,
    GovExperience,
    ContractsAnnually,
    SuccessRate,
    BusinessGoals,
}

impl FieldName {
    pub const ALL: [FieldName; 20] = [
        Self::FullName,
        Self::JobTitle,
        Self::Email,
        Self::PhoneNumber,
        Self::Language,
        Self::CompanyName,
        Self::BusinessSector,
        Self::HasCapacity,
        Self::InterestedInAutomation,
        Self::TargetMarkets,
        Self::OtherMarkets,
        Self::Budget,
        Self::AlertMethod,
        Self::BetaTester,
        Self::CompanySize,
        Self::AnnualRevenue,
        Self::GovExperience,
        Self::ContractsAnnually,
        Self::SuccessRate,
        Self::BusinessGoals,
    ];

    /// The camelCase draft key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FullName => "fullName",
            Self::JobTitle => "jobTitle",
            Self::Email => "email",
            Self::PhoneNumber => "phoneNumber",
            Self::Language => "language",
            Self::CompanyName => "companyName",
            Self::BusinessSector => "businessSector",
            Self::HasCapacity => "hasCapacity",
            Self::InterestedInAutomation => "interestedInAutomation",
            Self::TargetMarkets => "targetMarkets",
            Self::OtherMarkets => "otherMarkets",
            Self::Budget => "budget",
            Self::AlertMethod => "alertMethod",
            Self::BetaTester => "betaTester",
            Self::CompanySize => "companySize",
            Self::AnnualRevenue => "annualRevenue",
            Self::GovExperience => "govExperience",
            Self::ContractsAnnually => "contractsAnnually",
            Self::SuccessRate => "successRate",
            Self::BusinessGoals => "businessGoals",
        }
    }

    /// The schema row for this field.
    pub fn spec(&self) -> &'static FieldSpec {
        STEPS
            .iter()
            .flat_map(|step| step.fields.iter())
            .find(|spec| spec.name == *self)
            .unwrap_or(&FALLBACK_SPEC)
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for FieldName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.key() == s)
            .ok_or_else(|| format!("unknown field: {s}"))
    }
}

/// How a field's value is entered and checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    MultiSelect,
    Number { min: i64, max: i64 },
}

/// When a field must be filled before its step can be left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    /// Required only while `other` is a selected target market.
    WhenOtherMarketSelected,
    Optional,
}

/// One form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: FieldName,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: Requirement,
    /// `(value, label)` pairs for select kinds; empty otherwise.
    pub options: &'static [(&'static str, &'static str)],
    /// `(alias, value)` pairs also accepted for select kinds.
    pub aliases: &'static [(&'static str, &'static str)],
}

impl FieldSpec {
    const fn new(name: FieldName, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: Requirement::Always,
            options: &[],
            aliases: &[],
        }
    }

    const fn select(
        name: FieldName,
        label: &'static str,
        options: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::Select)
        }
    }

    const fn multi(
        name: FieldName,
        label: &'static str,
        options: &'static [(&'static str, &'static str)],
    ) -> Self {
        Self {
            options,
            ..Self::new(name, label, FieldKind::MultiSelect)
        }
    }

    const fn aliases(self, aliases: &'static [(&'static str, &'static str)]) -> Self {
        Self { aliases, ..self }
    }

    const fn required(self, required: Requirement) -> Self {
        Self { required, ..self }
    }

    const fn optional(self) -> Self {
        self.required(Requirement::Optional)
    }

    /// Whether the field's requirement holds for `draft`.
    pub fn is_satisfied(&self, draft: &Draft) -> bool {
        match self.required {
            Requirement::Always => draft.is_filled(self.name),
            Requirement::WhenOtherMarketSelected => {
                !draft.other_market_selected() || draft.is_filled(self.name)
            }
            Requirement::Optional => true,
        }
    }

    /// Check `input` against the field kind. An empty value is always
    /// accepted so that a field can be cleared. Multi-select values are
    /// de-duplicated in order.
    ///
    /// # Errors
    ///
    /// Returns a [`FormError`] describing the first problem found.
    pub fn check(&self, input: FieldInput) -> Result<FieldInput, FormError> {
        let field = self.name;
        match (self.kind, input) {
            (FieldKind::MultiSelect, FieldInput::Many(values)) => {
                let mut out: Vec<String> = Vec::with_capacity(values.len());
                for value in values {
                    let Some(token) = self.option_token(&value) else {
                        return Err(FormError::InvalidOption { field, value });
                    };
                    if !out.iter().any(|v| v == token) {
                        out.push(token.to_string());
                    }
                }
                Ok(FieldInput::Many(out))
            }
            (FieldKind::MultiSelect, FieldInput::Text(_)) | (_, FieldInput::Many(_)) => {
                Err(FormError::KindMismatch { field })
            }
            (_, FieldInput::Text(value)) if value.trim().is_empty() => {
                Ok(FieldInput::Text(String::new()))
            }
            (FieldKind::Text, FieldInput::Text(value)) => Ok(FieldInput::Text(value)),
            (FieldKind::Email, FieldInput::Text(value)) => {
                if is_email(&value) {
                    Ok(FieldInput::Text(value))
                } else {
                    Err(FormError::InvalidFormat { field, value })
                }
            }
            (FieldKind::Tel, FieldInput::Text(value)) => {
                if is_phone(&value) {
                    Ok(FieldInput::Text(value))
                } else {
                    Err(FormError::InvalidFormat { field, value })
                }
            }
            (FieldKind::Select, FieldInput::Text(value)) => {
                match self.option_token(&value) {
                    Some(token) => Ok(FieldInput::Text(token.to_string())),
                    None => Err(FormError::InvalidOption { field, value }),
                }
            }
            (FieldKind::Number { min, max }, FieldInput::Text(value)) => {
                match value.trim().parse::<i64>() {
                    Ok(n) if (min..=max).contains(&n) => Ok(FieldInput::Text(n.to_string())),
                    _ => Err(FormError::InvalidNumber { field, value }),
                }
            }
        }
    }

    /// The wire token `value` stands for, resolving legacy aliases.
    fn option_token(&self, value: &str) -> Option<&'static str> {
        if let Some((token, _)) = self.options.iter().find(|(v, _)| *v == value) {
            return Some(token);
        }
        self.aliases
            .iter()
            .find(|(alias, _)| *alias == value)
            .map(|(_, token)| *token)
    }
}

fn is_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

fn is_phone(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '-' | '+'))
        && value.chars().any(|c| c.is_ascii_digit())
}

/// One page of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub fields: &'static [FieldSpec],
}

impl Step {
    /// Whether every field requirement on this step holds for `draft`.
    pub fn is_valid(&self, draft: &Draft) -> bool {
        self.fields.iter().all(|f| f.is_satisfied(draft))
    }

    /// Fields whose requirement does not hold for `draft`.
    pub fn missing_fields(&self, draft: &Draft) -> Vec<FieldName> {
        self.fields
            .iter()
            .filter(|f| !f.is_satisfied(draft))
            .map(|f| f.name)
            .collect()
    }
}

// Every FieldName has a row in STEPS; this is never returned.
const FALLBACK_SPEC: FieldSpec = FieldSpec::new(FieldName::FullName, "Full Name", FieldKind::Text);

/// The signup form, in order.
pub static STEPS: [Step; 8] = [
    Step {
        title: "Primary Contact",
        subtitle: "Let's start with your contact information",
        fields: &[
            FieldSpec::new(F::FullName, "Full Name", FieldKind::Text),
            FieldSpec::new(F::JobTitle, "Job Title", FieldKind::Text),
            FieldSpec::new(F::Email, "Professional Email", FieldKind::Email),
            FieldSpec::new(F::PhoneNumber, "Phone Number", FieldKind::Tel),
        ],
    },
    Step {
        title: "Company Info",
        subtitle: "Tell us about your company",
        fields: &[
            FieldSpec::new(F::CompanyName, "Company Name", FieldKind::Text),
            FieldSpec::new(F::BusinessSector, "Business Sector", FieldKind::Text),
            FieldSpec::select(F::Language, "Preferred Language", Language::OPTIONS),
        ],
    },
    Step {
        title: "Key Qualification",
        subtitle: "Help us understand your needs",
        fields: &[
            FieldSpec::select(
                F::HasCapacity,
                "Do you have additional capacity to take on new contracts?",
                YesNo::OPTIONS,
            ),
            FieldSpec::select(
                F::InterestedInAutomation,
                "Would you be interested in an automated system that alerts you about relevant tenders and assists with proposal writing?",
                YesNo::OPTIONS,
            ),
            FieldSpec::multi(
                F::TargetMarkets,
                "Which government markets interest you?",
                TargetMarket::OPTIONS,
            )
            .aliases(TargetMarket::ALIASES),
            FieldSpec::new(F::OtherMarkets, "Please specify other markets", FieldKind::Text)
                .required(Requirement::WhenOtherMarketSelected),
        ],
    },
    Step {
        title: "Solution Interest",
        subtitle: "Tell us about your preferences",
        fields: &[
            FieldSpec::select(F::Budget, "Monthly budget range", Budget::OPTIONS),
            FieldSpec::select(
                F::AlertMethod,
                "Preferred notification method",
                AlertMethod::OPTIONS,
            ),
        ],
    },
    Step {
        title: "Beta Testing",
        subtitle: "Help shape the future of the platform",
        fields: &[FieldSpec::select(
            F::BetaTester,
            "Interested in being a beta tester?",
            YesNo::OPTIONS,
        )],
    },
    Step {
        title: "Company Profile (Optional)",
        subtitle: "Additional company information",
        fields: &[
            FieldSpec::select(F::CompanySize, "Company Size", CompanySize::OPTIONS).optional(),
            FieldSpec::select(F::AnnualRevenue, "Annual Revenue", AnnualRevenue::OPTIONS)
                .optional(),
        ],
    },
    Step {
        title: "Experience (Optional)",
        subtitle: "Your government contracting experience",
        fields: &[
            FieldSpec::select(
                F::GovExperience,
                "Government Contract Experience",
                GovExperience::OPTIONS,
            )
            .optional(),
            FieldSpec::new(
                F::ContractsAnnually,
                "Number of contracts pursued annually",
                FieldKind::Number {
                    min: 0,
                    max: i32::MAX as i64,
                },
            )
            .optional(),
            FieldSpec::new(
                F::SuccessRate,
                "Current success rate",
                FieldKind::Number {
                    min: 0,
                    max: MAX_SUCCESS_RATE as i64,
                },
            )
            .optional(),
        ],
    },
    Step {
        title: "Goals (Optional)",
        subtitle: "Your business objectives",
        fields: &[FieldSpec::multi(
            F::BusinessGoals,
            "What are your primary objectives?",
            BusinessGoal::OPTIONS,
        )
        .optional()],
    },
];

/// Index of the last step.
pub const LAST_STEP: usize = STEPS.len() - 1;

/// The validity predicate of step `index` for `draft`. Out-of-range indices
/// are never valid.
pub fn step_is_valid(index: usize, draft: &Draft) -> bool {
    STEPS.get(index).is_some_and(|s| s.is_valid(draft))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn text_value() -> impl Strategy<Value = String> {
        prop_oneof![Just(String::new()), Just("  ".to_string()), "[a-z]{1,8}"]
    }

    fn market_list() -> impl Strategy<Value = Vec<String>> {
        proptest::sample::subsequence(
            TargetMarket::ALL.iter().map(|m| m.as_str().to_string()).collect::<Vec<_>>(),
            0..=TargetMarket::ALL.len(),
        )
    }

    prop_compose! {
        fn any_draft()(
            texts in proptest::collection::vec(text_value(), 18),
            target_markets in market_list(),
            business_goals in proptest::collection::vec("[a-z]{1,6}", 0..3),
        ) -> Draft {
            Draft {
                full_name: texts[0].clone(),
                job_title: texts[1].clone(),
                email: texts[2].clone(),
                phone_number: texts[3].clone(),
                language: texts[4].clone(),
                company_name: texts[5].clone(),
                business_sector: texts[6].clone(),
                has_capacity: texts[7].clone(),
                interested_in_automation: texts[8].clone(),
                target_markets,
                other_markets: texts[9].clone(),
                budget: texts[10].clone(),
                alert_method: texts[11].clone(),
                beta_tester: texts[12].clone(),
                company_size: texts[13].clone(),
                annual_revenue: texts[14].clone(),
                gov_experience: texts[15].clone(),
                contracts_annually: texts[16].clone(),
                success_rate: texts[17].clone(),
                business_goals,
            }
        }
    }

    proptest! {
        #[test]
        fn required_steps_block_iff_a_required_field_is_empty(draft in any_draft()) {
            let other = draft.target_markets.iter().any(|m| m == "other");
            for (index, step) in STEPS.iter().enumerate().take(5) {
                let any_empty = step.fields.iter().any(|f| {
                    let empty = !draft.is_filled(f.name);
                    if f.name == FieldName::OtherMarkets {
                        other && empty
                    } else {
                        empty
                    }
                });
                prop_assert_eq!(step_is_valid(index, &draft), !any_empty);
            }
        }

        #[test]
        fn optional_steps_always_advance(draft in any_draft()) {
            for index in 5..STEPS.len() {
                prop_assert!(step_is_valid(index, &draft));
            }
        }
    }
}
