//! Named intake fields.

use serde::{Deserialize, Serialize};

/// One of the 17 named intake fields, in submission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntakeField {
    Age,
    Gender,
    Occupation,
    ActivityLevel,
    OtherComments,
    PainLocation,
    PainIntensity,
    PainDuration,
    PainCharacter,
    AggravatingFactors,
    RelievingFactors,
    PreviousInjuries,
    ChronicConditions,
    Medications,
    FunctionalLimitations,
    PatientGoals,
    EquipmentAtHome,
}

/// Input shape of a field on the intake surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    SingleChoice,
    Text,
    MultiChoice,
    /// Bounded 0..=10 numeric scale.
    Scale,
}

/// Borrowed view of a field value inside an [`IntakeRecord`](crate::IntakeRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Number(Option<u32>),
    Text(&'a str),
    List(&'a [String]),
}

impl FieldValue<'_> {
    /// True for null numbers, blank text and empty lists.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
        }
    }

    /// True only when nothing was supplied: a null number, `""` or `[]`.
    ///
    /// Whitespace-only text and blank list items count as supplied.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }
}

impl IntakeField {
    pub const ALL: [IntakeField; 17] = [
        IntakeField::Age,
        IntakeField::Gender,
        IntakeField::Occupation,
        IntakeField::ActivityLevel,
        IntakeField::OtherComments,
        IntakeField::PainLocation,
        IntakeField::PainIntensity,
        IntakeField::PainDuration,
        IntakeField::PainCharacter,
        IntakeField::AggravatingFactors,
        IntakeField::RelievingFactors,
        IntakeField::PreviousInjuries,
        IntakeField::ChronicConditions,
        IntakeField::Medications,
        IntakeField::FunctionalLimitations,
        IntakeField::PatientGoals,
        IntakeField::EquipmentAtHome,
    ];

    /// Key used in intake files.
    pub fn key(&self) -> &'static str {
        match self {
            IntakeField::Age => "age",
            IntakeField::Gender => "gender",
            IntakeField::Occupation => "occupation",
            IntakeField::ActivityLevel => "activity_level",
            IntakeField::OtherComments => "other_comments",
            IntakeField::PainLocation => "pain_location",
            IntakeField::PainIntensity => "pain_intensity",
            IntakeField::PainDuration => "pain_duration",
            IntakeField::PainCharacter => "pain_character",
            IntakeField::AggravatingFactors => "aggravating_factors",
            IntakeField::RelievingFactors => "relieving_factors",
            IntakeField::PreviousInjuries => "previous_injuries",
            IntakeField::ChronicConditions => "chronic_conditions",
            IntakeField::Medications => "medications",
            IntakeField::FunctionalLimitations => "functional_limitations",
            IntakeField::PatientGoals => "patient_goals",
            IntakeField::EquipmentAtHome => "equipment_at_home",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            IntakeField::Age => FieldKind::Integer,
            IntakeField::PainIntensity => FieldKind::Scale,
            IntakeField::Gender | IntakeField::ActivityLevel | IntakeField::PainDuration => {
                FieldKind::SingleChoice
            }
            IntakeField::PainCharacter
            | IntakeField::RelievingFactors
            | IntakeField::EquipmentAtHome => FieldKind::MultiChoice,
            _ => FieldKind::Text,
        }
    }
}

impl std::fmt::Display for IntakeField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
