//! Line and column splitting for the comma-separated import format.
//!
//! There is no quoting or escaping: every comma separates columns, so a literal comma
//! inside a name shifts the remaining columns.

use idfill_core::config::{ImportConfig, Variant, DEFAULT_BATCH_SIZE};
use idfill_store::PersonRecord;
use serde::Serialize;

/// Which column feeds which record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub name: usize,
    pub identifier: usize,
    pub gender: usize,
    pub birth_year: Option<usize>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: 0,
            identifier: 1,
            gender: 2,
            birth_year: None,
        }
    }
}

impl ColumnMap {
    fn highest(&self) -> usize {
        [self.name, self.identifier, self.gender]
            .into_iter()
            .chain(self.birth_year)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpec {
    pub min_columns: usize,
    pub columns: ColumnMap,
    pub batch_size: usize,
}

impl ImportSpec {
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            min_columns: variant.required_columns(),
            columns: ColumnMap {
                birth_year: variant.birth_year_column(),
                ..ColumnMap::default()
            },
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn from_config(cfg: &ImportConfig) -> Self {
        Self {
            batch_size: cfg.batch_size(),
            ..Self::for_variant(cfg.variant)
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Rows shorter than this are skipped. Never less than the mapped columns need.
    pub fn required_columns(&self) -> usize {
        self.min_columns.max(self.columns.highest() + 1)
    }
}

impl Default for ImportSpec {
    fn default() -> Self {
        Self::for_variant(Variant::Base)
    }
}

/// Split file content into logical rows on `\n` and `\r\n`. A leading byte-order mark is dropped.
pub fn split_rows(text: &str) -> Vec<&str> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Parse one row. `None` means the row is malformed and must be skipped.
pub fn parse_row(line: &str, spec: &ImportSpec) -> Option<PersonRecord> {
    let cols: Vec<&str> = line.split(',').collect();
    if cols.len() < spec.required_columns() {
        return None;
    }
    let map = &spec.columns;
    PersonRecord::new(
        cols[map.name],
        cols[map.identifier],
        cols[map.gender],
        map.birth_year.map(|idx| cols[idx]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_handles_both_line_endings() {
        assert_eq!(split_rows("a\r\nb\nc"), vec!["a", "b", "c"]);
        assert_eq!(split_rows(""), vec![""]);
        assert_eq!(split_rows("a\n"), vec!["a", ""]);
    }

    #[test]
    fn split_drops_leading_byte_order_mark() {
        assert_eq!(split_rows("\u{feff}a\r\nb"), vec!["a", "b"]);
        let spec = ImportSpec::default();
        let first = split_rows("\u{feff}Asha Devi,1234 5678 9012,Female")[0];
        let rec = parse_row(first, &spec).unwrap();
        assert_eq!(rec.name, "Asha Devi");
    }

    #[test]
    fn base_rows_need_three_columns() {
        let spec = ImportSpec::default();
        assert!(parse_row("OnlyTwoCols,123", &spec).is_none());
        let rec = parse_row("Asha Devi,1234 5678 9012,Female", &spec).unwrap();
        assert_eq!(rec.identifier_suffix, "9012");
        assert_eq!(rec.birth_year, None);
    }

    #[test]
    fn extended_rows_carry_birth_year() {
        let spec = ImportSpec::for_variant(Variant::Extended);
        assert_eq!(spec.required_columns(), 4);
        assert!(parse_row("Asha Devi,1234 5678 9012,Female", &spec).is_none());
        let rec = parse_row("Asha Devi,1234 5678 9012,Female, 1984", &spec).unwrap();
        assert_eq!(rec.birth_year.as_deref(), Some("1984"));
    }

    #[test]
    fn rows_without_identifier_digits_are_skipped() {
        let spec = ImportSpec::default();
        assert!(parse_row("Nobody,N/A,Male", &spec).is_none());
    }

    #[test]
    fn extra_columns_are_ignored() {
        let spec = ImportSpec::default();
        let rec = parse_row("Ram Lal,9988 7766 5543,Male,extra,more", &spec).unwrap();
        assert_eq!(rec.gender, "Male");
    }

    #[test]
    fn embedded_commas_shift_columns() {
        let spec = ImportSpec::default();
        // The identifier lands in the gender column, leaving " Ram" as the identifier.
        assert!(parse_row("Lal, Ram,9988 7766 5543,Male", &spec).is_none());
        let rec = parse_row("Lal, Ram 7,9988 7766 5543,Male", &spec).unwrap();
        assert_eq!(rec.name, "Lal");
        assert_eq!(rec.identifier_suffix, "0007");
        assert_eq!(rec.gender, "9988 7766 5543");
    }

    #[test]
    fn mapped_columns_raise_required_count() {
        let spec = ImportSpec {
            min_columns: 1,
            columns: ColumnMap {
                birth_year: Some(5),
                ..ColumnMap::default()
            },
            batch_size: 10,
        };
        assert_eq!(spec.required_columns(), 6);
    }

    #[test]
    fn config_drives_column_layout() {
        let cfg = ImportConfig {
            batch_size: Some(7),
            variant: Variant::Extended,
        };
        let spec = ImportSpec::from_config(&cfg);
        assert_eq!(spec.batch_size, 7);
        assert_eq!(spec.min_columns, 4);
        assert_eq!(spec.columns.birth_year, Some(3));
    }
}
