//! Closed categorical choices and their fixed numeric codes.
//!
//! Every choice offered by the input form is a variant of one of these enums.
//! The code tables are exhaustive `match`es, so a category without a code
//! cannot be constructed.

use serde::{Deserialize, Serialize};

/// A closed set of form options with a fixed numeric encoding.
pub trait Categorical: Copy + Sized + 'static {
    /// Field name used in error messages.
    const KIND: &'static str;

    /// All options, in the order the form presents them.
    const OPTIONS: &'static [Self];

    /// Numeric code expected by the classifier.
    fn code(self) -> u8;

    /// Label shown to the user.
    fn label(self) -> &'static str;

    /// Look up an option by its display label.
    fn from_label(label: &str) -> Option<Self> {
        Self::OPTIONS.iter().copied().find(|o| o.label() == label)
    }

    /// Position of this option in [`Categorical::OPTIONS`].
    fn position(self) -> usize
    where
        Self: PartialEq,
    {
        Self::OPTIONS.iter().position(|o| *o == self).unwrap_or(0)
    }
}

/// Returned when parsing a label that is not one of the listed options.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} option: {value:?}")]
pub struct UnknownCategory {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal = $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl Categorical for $name {
            const KIND: &'static str = $kind;
            const OPTIONS: &'static [Self] = &[$( Self::$variant ),+];

            fn code(self) -> u8 {
                match self {
                    $( Self::$variant => $code ),+
                }
            }

            fn label(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownCategory;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_label(s).ok_or_else(|| UnknownCategory {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }
    };
}

categorical! {
    /// Biological sex as recorded by the form (binary encoding).
    Gender ("gender") {
        Male => "Male" = 1,
        Female => "Female" = 0,
    }
}

categorical! {
    /// Chest pain type (`cp`).
    ChestPainType ("chest pain type") {
        TypicalAngina => "Typical Angina" = 0,
        AtypicalAngina => "Atypical Angina" = 1,
        NonAnginalPain => "Non-anginal Pain" = 2,
        Asymptomatic => "Asymptomatic" = 3,
    }
}

categorical! {
    /// Fasting blood sugar above 120 mg/dl (`fbs`).
    FastingBloodSugar ("fasting blood sugar") {
        Above120 => "> 120 mg/dl" = 1,
        AtMost120 => "<= 120 mg/dl" = 0,
    }
}

categorical! {
    /// Resting electrocardiographic result (`restecg`).
    RestingEcg ("resting ECG") {
        Normal => "Normal" = 0,
        StTAbnormality => "ST-T wave abnormality" = 1,
        LeftVentricularHypertrophy => "Left ventricular hypertrophy" = 2,
    }
}

categorical! {
    /// Exercise induced angina (`exang`).
    ExerciseAngina ("exercise angina") {
        Yes => "Yes" = 1,
        No => "No" = 0,
    }
}

categorical! {
    /// Slope of the peak exercise ST segment (`slope`).
    Slope ("slope") {
        Upsloping => "Upsloping" = 0,
        Flat => "Flat" = 1,
        Downsloping => "Downsloping" = 2,
    }
}

categorical! {
    /// Number of major vessels colored by fluoroscopy (`ca`). Identity encoding.
    MajorVessels ("number of major vessels") {
        Zero => "0" = 0,
        One => "1" = 1,
        Two => "2" = 2,
        Three => "3" = 3,
    }
}

categorical! {
    /// Thalassemia (`thal`).
    Thalassemia ("thalassemia") {
        Normal => "Normal" = 0,
        FixedDefect => "Fixed Defect" = 1,
        ReversibleDefect => "Reversible Defect" = 2,
        Other => "Other" = 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes<T: Categorical>() -> Vec<(&'static str, u8)> {
        T::OPTIONS.iter().map(|o| (o.label(), o.code())).collect()
    }

    #[test]
    fn test_chest_pain_table() {
        assert_eq!(
            codes::<ChestPainType>(),
            vec![
                ("Typical Angina", 0),
                ("Atypical Angina", 1),
                ("Non-anginal Pain", 2),
                ("Asymptomatic", 3),
            ]
        );
    }

    #[test]
    fn test_fasting_blood_sugar_table() {
        assert_eq!(
            codes::<FastingBloodSugar>(),
            vec![("> 120 mg/dl", 1), ("<= 120 mg/dl", 0)]
        );
    }

    #[test]
    fn test_resting_ecg_table() {
        assert_eq!(
            codes::<RestingEcg>(),
            vec![
                ("Normal", 0),
                ("ST-T wave abnormality", 1),
                ("Left ventricular hypertrophy", 2),
            ]
        );
    }

    #[test]
    fn test_exercise_angina_and_slope_tables() {
        assert_eq!(codes::<ExerciseAngina>(), vec![("Yes", 1), ("No", 0)]);
        assert_eq!(
            codes::<Slope>(),
            vec![("Upsloping", 0), ("Flat", 1), ("Downsloping", 2)]
        );
    }

    #[test]
    fn test_thalassemia_table() {
        assert_eq!(
            codes::<Thalassemia>(),
            vec![
                ("Normal", 0),
                ("Fixed Defect", 1),
                ("Reversible Defect", 2),
                ("Other", 3),
            ]
        );
    }

    #[test]
    fn test_gender_and_vessels() {
        assert_eq!(Gender::Male.code(), 1);
        assert_eq!(Gender::Female.code(), 0);
        for (i, v) in MajorVessels::OPTIONS.iter().enumerate() {
            assert_eq!(usize::from(v.code()), i);
        }
    }

    #[test]
    fn test_parse_from_label() {
        assert_eq!(
            "Reversible Defect".parse::<Thalassemia>(),
            Ok(Thalassemia::ReversibleDefect)
        );
        assert_eq!(
            "<= 120 mg/dl".parse::<FastingBloodSugar>(),
            Ok(FastingBloodSugar::AtMost120)
        );

        let err = "Sometimes".parse::<ExerciseAngina>().unwrap_err();
        assert_eq!(err.kind, "exercise angina");
        assert!(err.to_string().contains("Sometimes"));
    }

    #[test]
    fn test_position_matches_options() {
        assert_eq!(Slope::Downsloping.position(), 2);
        assert_eq!(Gender::Male.position(), 0);
    }
}
