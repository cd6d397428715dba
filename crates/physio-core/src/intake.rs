//! The patient intake record.

use std::path::Path;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

use crate::choices::is_listed_choice;
use crate::error::IntakeError;
use crate::field::{FieldValue, IntakeField};

/// Structured patient-supplied input to one assessment request.
///
/// Every field is always present. Missing text is an empty string, missing
/// choices an empty list and missing numbers `None`. Choice fields hold the
/// labels exactly as the caller supplied them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeRecord {
    /// Whole years. Integral floats such as `34.0` are accepted.
    #[serde(deserialize_with = "whole_number")]
    pub age: Option<u32>,
    #[serde(deserialize_with = "string_or_null")]
    pub gender: String,
    #[serde(deserialize_with = "string_or_null")]
    pub occupation: String,
    #[serde(deserialize_with = "string_or_null")]
    pub activity_level: String,
    #[serde(deserialize_with = "string_or_null")]
    pub other_comments: String,
    #[serde(deserialize_with = "string_or_null")]
    pub pain_location: String,
    /// 0 = no pain, 10 = worst pain.
    #[serde(deserialize_with = "whole_number")]
    pub pain_intensity: Option<u8>,
    #[serde(deserialize_with = "string_or_null")]
    pub pain_duration: String,
    #[serde(deserialize_with = "string_or_list")]
    pub pain_character: Vec<String>,
    #[serde(deserialize_with = "string_or_null")]
    pub aggravating_factors: String,
    #[serde(deserialize_with = "string_or_list")]
    pub relieving_factors: Vec<String>,
    #[serde(deserialize_with = "string_or_null")]
    pub previous_injuries: String,
    #[serde(deserialize_with = "string_or_null")]
    pub chronic_conditions: String,
    #[serde(deserialize_with = "string_or_null")]
    pub medications: String,
    #[serde(deserialize_with = "string_or_null")]
    pub functional_limitations: String,
    #[serde(deserialize_with = "string_or_null")]
    pub patient_goals: String,
    #[serde(deserialize_with = "string_or_list")]
    pub equipment_at_home: Vec<String>,
}

pub const MAX_PAIN_INTENSITY: u8 = 10;

impl IntakeRecord {
    pub fn value(&self, field: IntakeField) -> FieldValue<'_> {
        match field {
            IntakeField::Age => FieldValue::Number(self.age),
            IntakeField::Gender => FieldValue::Text(&self.gender),
            IntakeField::Occupation => FieldValue::Text(&self.occupation),
            IntakeField::ActivityLevel => FieldValue::Text(&self.activity_level),
            IntakeField::OtherComments => FieldValue::Text(&self.other_comments),
            IntakeField::PainLocation => FieldValue::Text(&self.pain_location),
            IntakeField::PainIntensity => {
                FieldValue::Number(self.pain_intensity.map(u32::from))
            }
            IntakeField::PainDuration => FieldValue::Text(&self.pain_duration),
            IntakeField::PainCharacter => FieldValue::List(&self.pain_character),
            IntakeField::AggravatingFactors => FieldValue::Text(&self.aggravating_factors),
            IntakeField::RelievingFactors => FieldValue::List(&self.relieving_factors),
            IntakeField::PreviousInjuries => FieldValue::Text(&self.previous_injuries),
            IntakeField::ChronicConditions => FieldValue::Text(&self.chronic_conditions),
            IntakeField::Medications => FieldValue::Text(&self.medications),
            IntakeField::FunctionalLimitations => {
                FieldValue::Text(&self.functional_limitations)
            }
            IntakeField::PatientGoals => FieldValue::Text(&self.patient_goals),
            IntakeField::EquipmentAtHome => FieldValue::List(&self.equipment_at_home),
        }
    }

    /// Fields that carry no value.
    pub fn empty_fields(&self) -> Vec<IntakeField> {
        IntakeField::ALL
            .into_iter()
            .filter(|f| self.value(*f).is_empty())
            .collect()
    }

    /// Choice values that are not in the field's catalog.
    ///
    /// These are reported, never rejected.
    pub fn unlisted_choices(&self) -> Vec<(IntakeField, String)> {
        let mut unlisted = Vec::new();
        for field in IntakeField::ALL {
            let values: Vec<&str> = match self.value(field) {
                FieldValue::Text(s) => vec![s],
                FieldValue::List(items) => items.iter().map(String::as_str).collect(),
                FieldValue::Number(_) => continue,
            };
            for value in values {
                if !value.trim().is_empty() && !is_listed_choice(field, value) {
                    unlisted.push((field, value.to_string()));
                }
            }
        }
        unlisted
    }

    /// Reject values the intake surface itself cannot produce.
    pub fn check_bounds(&self) -> Result<(), IntakeError> {
        if let Some(intensity) = self.pain_intensity {
            if intensity > MAX_PAIN_INTENSITY {
                return Err(IntakeError::OutOfRange {
                    field: "pain_intensity",
                    value: i64::from(intensity),
                    valid_range: "0-10",
                });
            }
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, IntakeError> {
        let record: IntakeRecord = toml::from_str(content)?;
        record.check_bounds()?;
        Ok(record)
    }

    pub fn from_json_str(content: &str) -> Result<Self, IntakeError> {
        let record: IntakeRecord = serde_json::from_str(content)?;
        record.check_bounds()?;
        Ok(record)
    }

    /// Load an intake file. `.json` files are read as JSON, anything else as TOML.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| IntakeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }
}

fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WholeNumber {
    Int(u64),
    Float(f64),
}

/// Number fields accept integers and floats with no fractional part.
fn whole_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let value = match Option::<WholeNumber>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(WholeNumber::Int(n)) => n,
        Some(WholeNumber::Float(f)) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
            f as u64
        }
        Some(WholeNumber::Float(f)) => {
            return Err(DeError::custom(format!(
                "expected a non-negative whole number, found {}",
                f
            )));
        }
    };
    T::try_from(value)
        .map(Some)
        .map_err(|_| DeError::custom(format!("{} is out of range", value)))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrList {
    One(String),
    Many(Vec<String>),
}

/// Multi-choice fields accept a list or a single pre-joined string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrList>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(StringOrList::One(s)) if s.is_empty() => Vec::new(),
        Some(StringOrList::One(s)) => vec![s],
        Some(StringOrList::Many(items)) => items,
    })
}
