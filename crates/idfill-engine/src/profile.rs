use idfill_core::config::{Config, KeywordConfig};
use idfill_heuristics::Keywords;
use std::time::Duration;

/// Engine configuration for one page session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillProfile {
    pub keywords: Keywords,
    /// Whitespace-free length at which a typed identifier triggers a lookup.
    pub identifier_length: usize,
    /// Wait before the deferred phase (defaults + consent).
    pub settle_delay: Duration,
    pub fill_date_of_birth: bool,
}

impl Default for FillProfile {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

fn pick(base: Vec<String>, over: &Option<Vec<String>>) -> Vec<String> {
    over.clone().filter(|v| !v.is_empty()).unwrap_or(base)
}

pub fn keywords_from_config(cfg: &KeywordConfig) -> Keywords {
    let base = Keywords::default();
    Keywords {
        identifier: pick(base.identifier, &cfg.identifier),
        name: pick(base.name, &cfg.name),
        gender_option: pick(base.gender_option, &cfg.gender_option),
        dob_placeholder: pick(base.dob_placeholder, &cfg.dob_placeholder),
        dob_label: pick(base.dob_label, &cfg.dob_label),
        sub_district: pick(base.sub_district, &cfg.sub_district),
        block: pick(base.block, &cfg.block),
        consent: pick(base.consent, &cfg.consent),
    }
}

impl FillProfile {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            keywords: keywords_from_config(&cfg.keywords),
            identifier_length: cfg.fill.identifier_length(),
            settle_delay: Duration::from_millis(cfg.fill.settle_delay_ms()),
            fill_date_of_birth: cfg.import.variant.fills_date_of_birth(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idfill_core::config::parse_config;

    #[test]
    fn defaults_match_base_variant() {
        let p = FillProfile::default();
        assert_eq!(p.identifier_length, 12);
        assert_eq!(p.settle_delay, Duration::from_millis(100));
        assert!(!p.fill_date_of_birth);
        assert_eq!(p.keywords, Keywords::default());
    }

    #[test]
    fn config_overrides_keywords_and_timing() {
        let cfg = parse_config(
            r#"
            [import]
            variant = "extended"
            [fill]
            settle_delay_ms = 5
            [keywords]
            identifier = ["uid"]
            block = []
            "#,
        )
        .unwrap();
        let p = FillProfile::from_config(&cfg);
        assert!(p.fill_date_of_birth);
        assert_eq!(p.settle_delay, Duration::from_millis(5));
        assert_eq!(p.keywords.identifier, vec!["uid".to_string()]);
        assert_eq!(p.keywords.block, vec!["block".to_string()]);
    }
}
