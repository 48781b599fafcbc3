//! Currency code to flag glyph resolution.

/// Distance from an ASCII uppercase letter to its regional indicator symbol.
const REGIONAL_INDICATOR_OFFSET: u32 = 127_397;

/// Returns a flag glyph for a 3-letter currency code, or an empty string for
/// malformed input.
///
/// A few well-known codes map to curated glyphs (EUR has no single country).
/// Everything else treats the first two letters of the code as a region
/// code, which is an approximation rather than an ISO mapping.
pub fn flag(currency_code: &str) -> String {
    if currency_code.chars().count() != 3 {
        return String::new();
    }

    if let Some(glyph) = curated(currency_code) {
        return glyph.to_string();
    }

    let region: String = currency_code.chars().take(2).collect();
    region_to_flag(&region)
}

fn curated(code: &str) -> Option<&'static str> {
    Some(match code {
        "EUR" => "🇪🇺",
        "USD" => "🇺🇸",
        "GBP" => "🇬🇧",
        "JPY" => "🇯🇵",
        "AUD" => "🇦🇺",
        "CAD" => "🇨🇦",
        "CHF" => "🇨🇭",
        "CNY" => "🇨🇳",
        "INR" => "🇮🇳",
        _ => return None,
    })
}

fn region_to_flag(region: &str) -> String {
    let mut glyph = String::new();
    for c in region.chars() {
        let c = c.to_ascii_uppercase();
        if !c.is_ascii_uppercase() {
            return String::new();
        }
        match char::from_u32(c as u32 + REGIONAL_INDICATOR_OFFSET) {
            Some(indicator) => glyph.push(indicator),
            None => return String::new(),
        }
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_codes() {
        let expected = [
            ("EUR", "🇪🇺"),
            ("USD", "🇺🇸"),
            ("GBP", "🇬🇧"),
            ("JPY", "🇯🇵"),
            ("AUD", "🇦🇺"),
            ("CAD", "🇨🇦"),
            ("CHF", "🇨🇭"),
            ("CNY", "🇨🇳"),
            ("INR", "🇮🇳"),
        ];
        for (code, glyph) in expected {
            assert_eq!(flag(code), glyph, "wrong glyph for {code}");
        }
    }

    #[test]
    fn test_derived_from_first_two_letters() {
        // S + E regional indicators, i.e. the Swedish flag.
        assert_eq!(flag("SEK"), "🇸🇪");
        assert_eq!(flag("NOK"), "🇳🇴");
        assert_eq!(flag("sek"), "🇸🇪");
    }

    #[test]
    fn test_malformed_length_is_empty() {
        assert_eq!(flag(""), "");
        assert_eq!(flag("US"), "");
        assert_eq!(flag("USDT"), "");
    }

    #[test]
    fn test_non_letter_is_empty() {
        assert_eq!(flag("1SD"), "");
        assert_eq!(flag("U$D"), "");
    }
}
