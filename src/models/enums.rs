use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Sex {
    Male => "male",
    Female => "female",
    Unknown => "unknown",
});

str_enum!(RecordField {
    PatientName => "patient_name",
    PatientId => "patient_id",
    Age => "age",
    Sex => "sex",
    Diagnosis => "diagnosis",
    Medications => "medications",
    BloodPressure => "blood_pressure",
    Weight => "weight",
    Height => "height",
    Temperature => "temperature",
});

impl Sex {
    /// Canonicalize an OCR'd sex marker ("M", "female", "U", ...).
    /// Anything not recognizably male, female or unknown is rejected.
    pub fn from_marker(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Sex::Male),
            "f" | "female" => Some(Sex::Female),
            "u" | "unknown" => Some(Sex::Unknown),
            _ => None,
        }
    }
}

impl RecordField {
    /// Scored fields in output order. `raw_text` is a passthrough and is never scored.
    pub const ALL: [RecordField; 10] = [
        RecordField::PatientName,
        RecordField::PatientId,
        RecordField::Age,
        RecordField::Sex,
        RecordField::Diagnosis,
        RecordField::Medications,
        RecordField::BloodPressure,
        RecordField::Weight,
        RecordField::Height,
        RecordField::Temperature,
    ];
}
