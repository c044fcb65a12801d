//! Report categories and the raw-label categorizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Categories a calendar event can be reported under.
///
/// Variants are declared in alphabetical order of their labels so that
/// ordered maps keyed by `Category` iterate alphabetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Collaboration,
    Communication,
    FocusTime,
    HolidayVacation,
    Unavailable,
    WorkMeeting,
}

impl Category {
    /// Every category, in label order.
    pub const ALL: [Self; 6] = [
        Self::Collaboration,
        Self::Communication,
        Self::FocusTime,
        Self::HolidayVacation,
        Self::Unavailable,
        Self::WorkMeeting,
    ];

    /// The label used in calendar clients and reports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Collaboration => "Collaboration",
            Self::Communication => "Communication",
            Self::FocusTime => "Focus Time",
            Self::HolidayVacation => "Holiday/Vacation",
            Self::Unavailable => "Unavailable",
            Self::WorkMeeting => "Work Meeting",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for labels that name no category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

/// How a category was chosen for a raw label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CategorySource {
    /// The first label matched a known category.
    Matched,
    /// The label list was empty; the default category was used.
    EmptyLabel,
    /// The first label was not a known category; the default was used.
    Unrecognized { label: String },
}

/// Result of categorizing one raw label list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Categorization {
    pub category: Category,
    pub source: CategorySource,
}

/// Which labels are accepted and where everything else goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRules {
    /// Labels accepted as-is.
    pub known: Vec<Category>,
    /// Fallback for empty or unrecognized labels.
    pub default: Category,
    /// The category that marks holiday/vacation events.
    pub holiday: Category,
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self {
            known: vec![
                Category::FocusTime,
                Category::Communication,
                Category::Unavailable,
                Category::Collaboration,
                Category::HolidayVacation,
            ],
            default: Category::WorkMeeting,
            holiday: Category::HolidayVacation,
        }
    }
}

/// Returns the first comma-separated label, trimmed.
pub fn primary_label(raw: &str) -> &str {
    raw.split(',').next().unwrap_or("").trim()
}

impl CategoryRules {
    /// Maps a raw label list to a category. Total: every input has an answer.
    pub fn categorize(&self, raw: &str) -> Category {
        self.categorize_detailed(raw).category
    }

    /// Like [`categorize`](Self::categorize), but also reports why.
    pub fn categorize_detailed(&self, raw: &str) -> Categorization {
        let label = primary_label(raw);
        if label.is_empty() {
            return Categorization {
                category: self.default,
                source: CategorySource::EmptyLabel,
            };
        }

        match label.parse::<Category>() {
            Ok(category) if self.known.contains(&category) => Categorization {
                category,
                source: CategorySource::Matched,
            },
            _ => Categorization {
                category: self.default,
                source: CategorySource::Unrecognized {
                    label: label.to_string(),
                },
            },
        }
    }

    /// Returns true if the raw label list's primary label is the holiday category.
    pub fn is_holiday_label(&self, raw: &str) -> bool {
        primary_label(raw) == self.holiday.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_all_variants() {
        for variant in Category::ALL {
            let parsed: Category = variant.to_string().parse().expect("should parse");
            assert_eq!(parsed, variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn unknown_label_errors() {
        let err = "Gardening".parse::<Category>().unwrap_err();
        assert_eq!(err.to_string(), "unknown category: Gardening");
    }

    #[test]
    fn categorize_table() {
        let rules = CategoryRules::default();
        let cases = [
            ("", Category::WorkMeeting),
            ("   ", Category::WorkMeeting),
            ("SomeUnknownTag", Category::WorkMeeting),
            ("SomeUnknownTag, Other", Category::WorkMeeting),
            ("Focus Time, Extra", Category::FocusTime),
            ("  Collaboration  ", Category::Collaboration),
            ("Communication,Focus Time", Category::Communication),
            ("Holiday/Vacation", Category::HolidayVacation),
            ("Unavailable", Category::Unavailable),
            ("Work Meeting", Category::WorkMeeting),
            ("focus time", Category::WorkMeeting),
            (", Focus Time", Category::WorkMeeting),
        ];

        for (raw, expected) in cases {
            assert_eq!(rules.categorize(raw), expected, "label {raw:?}");
        }
    }

    #[test]
    fn fallback_reason_distinguishes_empty_from_unrecognized() {
        let rules = CategoryRules::default();

        assert_eq!(
            rules.categorize_detailed("").source,
            CategorySource::EmptyLabel
        );
        assert_eq!(
            rules.categorize_detailed("Standup, Focus Time").source,
            CategorySource::Unrecognized {
                label: "Standup".to_string()
            }
        );
        assert_eq!(
            rules.categorize_detailed("Focus Time").source,
            CategorySource::Matched
        );
    }

    #[test]
    fn category_outside_known_set_falls_back() {
        let rules = CategoryRules {
            known: vec![Category::FocusTime],
            default: Category::Unavailable,
            holiday: Category::HolidayVacation,
        };

        assert_eq!(rules.categorize("Collaboration"), Category::Unavailable);
        assert_eq!(rules.categorize("Focus Time"), Category::FocusTime);
    }

    #[test]
    fn holiday_label_uses_first_token() {
        let rules = CategoryRules::default();
        assert!(rules.is_holiday_label(" Holiday/Vacation , Focus Time"));
        assert!(!rules.is_holiday_label("Focus Time, Holiday/Vacation"));
        assert!(!rules.is_holiday_label(""));
    }

    #[test]
    fn serializes_as_label() {
        let json = serde_json::to_string(&Category::FocusTime).unwrap();
        assert_eq!(json, "\"Focus Time\"");
        let parsed: Category = serde_json::from_str("\"Holiday/Vacation\"").unwrap();
        assert_eq!(parsed, Category::HolidayVacation);
    }
}
