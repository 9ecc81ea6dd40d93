//! Environment flag parsing.

/// `1/true/yes/on` or `0/false/no/off`, case-insensitive. Anything else is `None`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Value of the flag `key`; unset or unparsable reads as `default`.
pub fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn flags_accept_common_spellings() {
        assert_eq!(parse_flag(" YES "), Some(true));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("Off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    #[serial]
    fn unset_or_garbled_flag_uses_default() {
        std::env::remove_var("IDFILL_TEST_FLAG");
        assert!(env_flag("IDFILL_TEST_FLAG", true));
        std::env::set_var("IDFILL_TEST_FLAG", "sometimes");
        assert!(!env_flag("IDFILL_TEST_FLAG", false));
        std::env::set_var("IDFILL_TEST_FLAG", "1");
        assert!(env_flag("IDFILL_TEST_FLAG", false));
        std::env::remove_var("IDFILL_TEST_FLAG");
    }
}
