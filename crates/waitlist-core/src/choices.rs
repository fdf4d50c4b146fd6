//! # Option Sets
//!
//! Closed vocabularies for the select and multi-select attributes of a
//! waitlist entry. Each enum serializes as the exact wire token the table
//! stores (`"provincial-qc"`, `"<1M"`, `"500+"`), and carries the human
//! label shown next to it in the signup form.
//!
//! Parsing goes through [`std::str::FromStr`], which is also what the serde
//! `Deserialize` impl calls, so an unknown token is rejected with a
//! [`ValidationError::UnknownOption`] naming the column.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A closed vocabulary bound to one column of the waitlist table.
pub trait Choice: std::str::FromStr<Err = ValidationError> + Copy + PartialEq {
    /// Column the vocabulary belongs to.
    const COLUMN: &'static str;
}

/// Declares a string-valued option enum.
///
/// Each variant lists its wire token, optional legacy aliases accepted on
/// input, and its display label.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, column = $column:literal {
            $( $variant:ident => $value:literal $(| $alias:literal)* , $label:literal ; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Every variant, in form order.
            pub const ALL: &'static [$name] = &[$( $name::$variant, )+];

            /// `(wire token, label)` pairs, in form order.
            pub const OPTIONS: &'static [(&'static str, &'static str)] = &[$( ($value, $label), )+];

            /// `(legacy alias, wire token)` pairs accepted on input.
            pub const ALIASES: &'static [(&'static str, &'static str)] =
                &[$($( ($alias, $value), )*)+];

            /// The wire token.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $value, )+
                }
            }

            /// The human-readable label.
            pub fn label(&self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl Choice for $name {
            const COLUMN: &'static str = $column;
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value $(| $alias)* => Ok($name::$variant), )+
                    other => Err(ValidationError::UnknownOption {
                        field: $column,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum! {
    /// Preferred correspondence language.
    Language, column = "language" {
        English => "english", "English";
        French => "french", "French";
        Both => "both", "Both English & French";
    }
}

string_enum! {
    /// Government market a registrant wants to bid in.
    TargetMarket, column = "target_markets" {
        ProvincialQc => "provincial-qc" | "provincial", "Provincial - Quebec";
        Federal => "federal", "Federal";
        Municipal => "municipal", "Municipal";
        Other => "other", "Other";
    }
}

string_enum! {
    /// Monthly budget range.
    Budget, column = "budget" {
        From50To200 => "50-200", "$50-200";
        From200To500 => "200-500", "$200-500";
        Over500 => "500+", "$500+";
    }
}

string_enum! {
    /// How the registrant wants to be alerted.
    AlertMethod, column = "alert_method" {
        Email => "email", "Email";
        Sms => "sms", "SMS";
        Both => "both", "Both";
    }
}

string_enum! {
    CompanySize, column = "company_size" {
        Micro => "1-10", "1-10 employees";
        Small => "11-50", "11-50 employees";
        Medium => "51-200", "51-200 employees";
        Large => "201-500", "201-500 employees";
        Enterprise => "500+", "500+ employees";
    }
}

string_enum! {
    AnnualRevenue, column = "annual_revenue" {
        Under1M => "<1M", "Less than $1M";
        From1MTo5M => "1M-5M", "$1M - $5M";
        From5MTo20M => "5M-20M", "$5M - $20M";
        From20MTo50M => "20M-50M", "$20M - $50M";
        Over50M => "50M+", "$50M+";
    }
}

string_enum! {
    /// Prior government contracting experience.
    GovExperience, column = "gov_experience" {
        Never => "never", "Never";
        Provincial => "provincial", "Provincial level only";
        Federal => "federal", "Federal level only";
        Both => "both", "Both provincial and federal";
    }
}

string_enum! {
    BusinessGoal, column = "business_goals" {
        Increase => "increase", "Increase number of government contracts";
        Improve => "improve", "Improve bid success rate";
        Reduce => "reduce", "Reduce proposal preparation time";
        Explore => "explore", "Explore new government opportunities";
        Other => "other", "Other";
    }
}

string_enum! {
    /// Answer to a yes/no question in the form. Only the draft uses this;
    /// the stored record holds a plain `bool`.
    YesNo, column = "yes_no" {
        Yes => "yes", "Yes";
        No => "no", "No";
    }
}

impl YesNo {
    /// `"yes"` maps to `true`; any other answer, including an empty one,
    /// maps to `false`.
    pub fn answer_is_yes(raw: &str) -> bool {
        raw.trim() == YesNo::Yes.as_str()
    }
}
