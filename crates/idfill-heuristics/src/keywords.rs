use serde::{Deserialize, Serialize};

/// Keyword lists driving field classification. Matching is case-insensitive except for
/// the date-of-birth hints, which match case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keywords {
    pub identifier: Vec<String>,
    pub name: Vec<String>,
    pub gender_option: Vec<String>,
    pub dob_placeholder: Vec<String>,
    pub dob_label: Vec<String>,
    /// Tried in order: hyphenated first, then spaced.
    pub sub_district: Vec<String>,
    pub block: Vec<String>,
    pub consent: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Keywords {
    fn default() -> Self {
        Self {
            identifier: owned(&["aadhaar"]),
            name: owned(&["name"]),
            gender_option: owned(&["male"]),
            dob_placeholder: owned(&["DD/MM/YYYY"]),
            dob_label: owned(&["DOB"]),
            sub_district: owned(&["sub-district", "sub district"]),
            block: owned(&["block"]),
            consent: owned(&["consent"]),
        }
    }
}

/// Case-insensitive substring test against any non-empty needle.
pub fn contains_any_ci(haystack: &str, needles: &[String]) -> bool {
    let hay = haystack.to_lowercase();
    needles
        .iter()
        .map(|n| n.trim().to_lowercase())
        .any(|n| !n.is_empty() && hay.contains(&n))
}

/// Case-sensitive substring test against any non-empty needle.
pub fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|n| !n.is_empty() && haystack.contains(n.as_str()))
}
