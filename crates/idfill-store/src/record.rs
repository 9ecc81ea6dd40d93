use serde::{Deserialize, Serialize};

/// Number of trailing identifier digits used as the lookup key.
pub const SUFFIX_LEN: usize = 4;

/// One imported person row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Store-assigned surrogate id; `None` until the record has been written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    /// Identifier text exactly as imported (separators included).
    pub identifier_display: String,
    pub identifier_suffix: String,
    pub gender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<String>,
}

impl PersonRecord {
    /// Build a record from raw column text. Returns `None` when the identifier holds no digit.
    pub fn new(
        name: &str,
        identifier: &str,
        gender: &str,
        birth_year: Option<&str>,
    ) -> Option<Self> {
        let identifier_display = identifier.trim();
        let identifier_suffix = identifier_suffix(identifier_display)?;
        Some(Self {
            id: None,
            name: name.trim().to_string(),
            identifier_display: identifier_display.to_string(),
            identifier_suffix,
            gender: gender.trim().to_string(),
            birth_year: birth_year.map(|y| y.trim().to_string()),
        })
    }

    /// Label shown next to the name in a suggestion list.
    pub fn suggestion_label(&self) -> String {
        format!("...{}", self.identifier_suffix)
    }
}

/// Last four digits of the digit-only projection of `raw`, left-padded with zeros.
///
/// Returns `None` when `raw` contains no ASCII digit.
pub fn identifier_suffix(raw: &str) -> Option<String> {
    let digits: Vec<char> = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let tail: String = digits[digits.len().saturating_sub(SUFFIX_LEN)..]
        .iter()
        .collect();
    Some(format!("{tail:0>width$}", width = SUFFIX_LEN))
}

pub fn is_valid_suffix(s: &str) -> bool {
    s.len() == SUFFIX_LEN && s.bytes().all(|b| b.is_ascii_digit())
}
