use once_cell::sync::Lazy;
use regex::Regex;

static NON_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9.]").expect("numeric strip pattern should compile"));

/// Best-effort numeric cleanup of a raw cell: drop everything that is not an
/// ASCII digit or `.`, then parse. Empty or unparseable text becomes 0, so
/// the result is never negative and this never fails.
pub fn coerce_number(raw: &str) -> f64 {
    let stripped = NON_NUMERIC.replace_all(raw, "");
    if stripped.is_empty() {
        return 0.0;
    }
    stripped.parse::<f64>().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_separators_and_signs() {
        assert_eq!(coerce_number("1,234,567"), 1_234_567.0);
        assert_eq!(coerce_number("+1,234"), 1234.0);
        assert_eq!(coerce_number("-42"), 42.0);
        assert_eq!(coerce_number("1.5 %"), 1.5);
    }

    #[test]
    fn blanks_and_words_are_zero() {
        assert_eq!(coerce_number(""), 0.0);
        assert_eq!(coerce_number("N/A"), 0.0);
        assert_eq!(coerce_number("   "), 0.0);
    }

    #[test]
    fn leftover_garbage_is_zero() {
        // "1.2.3" survives stripping but is not a float
        assert_eq!(coerce_number("1.2.3"), 0.0);
        assert_eq!(coerce_number("."), 0.0);
    }
}
