//! Field classification heuristics for raw detail-pane text fragments.
//!
//! The directory renders addresses, phone numbers, opening hours, and grid
//! codes through visually identical, unlabeled DOM nodes, so the harvest
//! loop has to decide from text alone which fragment is which. These are
//! pure functions — no DOM access, no I/O.

use std::sync::LazyLock;

use regex::Regex;

use leadmap_core::MobileNumberFormat;

/// 5-consecutive-digit run, the shape of a postal code.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{5}").expect("valid regex"));

/// Alphanumeric`+`alphanumeric grid locator code.
static GRID_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z0-9]+\+[A-Z0-9]+").expect("valid regex"));

/// Separator characters tolerated inside phone-number renderings.
const PHONE_SEPARATORS: [char; 4] = [' ', '-', '(', ')'];

/// Street/unit/block tokens that mark a fragment as address-like.
///
/// Locale abbreviations (`cad`, `sok`, `mah`, …) cover the target market's
/// postal conventions; the generic English terms catch internationally
/// formatted listings.
const ADDRESS_KEYWORDS: [&str; 22] = [
    "cad", "sok", "mah", "no:", "no ", "apt", "daire", "kat", "blok", "cd.", "cd ", "sk.",
    "sk ", "mh.", "mh ", "street", "avenue", "road", "boulevard", "lane", "drive", "way",
];

/// Transient classification of one text fragment. Recomputed per fragment,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationSignal {
    pub looks_like_address: bool,
    pub looks_like_phone: bool,
    pub is_target_mobile: bool,
}

/// Classifies one fragment against all three heuristics.
#[must_use]
pub fn classify(text: &str, format: &MobileNumberFormat) -> ClassificationSignal {
    ClassificationSignal {
        looks_like_address: looks_like_address(text),
        looks_like_phone: is_plausible_phone(text),
        is_target_mobile: is_target_mobile_number(text, format),
    }
}

/// Returns `true` when `text` is plausible enough to be worth the stricter
/// mobile-format check.
///
/// Phone numbers in the directory render in many international styles, so
/// this deliberately stops short of full E.164 validation: after stripping
/// separators and a leading `+`, at least 7 digits must remain, and the
/// original text must contain a digit plus one phone-shaped signal (a `+`,
/// a parenthesis pair, or a 7–15 digit count).
#[must_use]
pub fn is_plausible_phone(text: &str) -> bool {
    let text = text.trim();
    if text.len() < 7 {
        return false;
    }

    let digit_count = text
        .strip_prefix('+')
        .unwrap_or(text)
        .chars()
        .filter(|c| !PHONE_SEPARATORS.contains(c))
        .filter(char::is_ascii_digit)
        .count();
    if digit_count < 7 {
        return false;
    }

    let has_digits = text.chars().any(|c| c.is_ascii_digit());
    let has_plus = text.contains('+');
    let has_parens = text.contains('(') && text.contains(')');

    has_digits && (has_plus || has_parens || (7..=15).contains(&digit_count))
}

/// Returns `true` when `text` is a valid target-market mobile number.
///
/// Strictly stronger than [`is_plausible_phone`]: the number must belong to
/// the national mobile block and carry exactly the national significant
/// digit count. Accepted shapes (reference configuration shown):
///
/// - national: `0532 123 45 67` (trunk `0`, mobile digit, 10 significant digits)
/// - international: `+90 532 123 45 67`, `0090 532 ...`, `90532...`
///
/// A number that is merely plausible — a landline, a short code, a foreign
/// mobile — is rejected, and downstream the enclosing record is dropped
/// entirely rather than exported with a blank phone. That gate is the
/// defining contract of the harvest: only target-market mobile numbers
/// count as leads.
#[must_use]
pub fn is_target_mobile_number(text: &str, format: &MobileNumberFormat) -> bool {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !PHONE_SEPARATORS.contains(c))
        .collect();
    if compact.is_empty() || !compact.chars().skip(1).all(|c| c.is_ascii_digit()) {
        return false;
    }

    let long_prefix = format!("+{}", format.country_code);
    let short_prefix = format!("00{}", format.country_code);

    let after_country_code = compact
        .strip_prefix(&long_prefix)
        .or_else(|| compact.strip_prefix(&short_prefix))
        .or_else(|| {
            // Bare numeric country code, only recognized when the mobile
            // digit follows — otherwise national numbers starting with the
            // same digits would be misparsed.
            compact
                .strip_prefix(format.country_code.as_str())
                .filter(|rest| rest.starts_with(format.mobile_leading))
        });

    match after_country_code {
        // International branch: country code immediately followed by the
        // mobile leading digit, or the national trunk form after it.
        Some(rest) => {
            if rest.starts_with(format.mobile_leading) {
                digit_count(rest) == format.national_length
            } else if starts_with_trunk_mobile(rest, format) {
                digit_count(rest) == format.national_length + 1
            } else {
                false
            }
        }
        // National branch: trunk `0` followed by the mobile leading digit.
        None => {
            starts_with_trunk_mobile(&compact, format)
                && digit_count(&compact) == format.national_length + 1
        }
    }
}

fn starts_with_trunk_mobile(s: &str, format: &MobileNumberFormat) -> bool {
    let mut chars = s.chars();
    chars.next() == Some('0') && chars.next() == Some(format.mobile_leading)
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(char::is_ascii_digit).count()
}

/// Returns `true` when `text` reads like a postal address rather than a
/// phone number or some other detail field.
///
/// Three independent signals, any one of which classifies the fragment:
/// a street/unit keyword, a 5-consecutive-digit run (postal code), or an
/// alphanumeric`+`alphanumeric grid locator code.
#[must_use]
pub fn looks_like_address(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }

    let lower = text.to_lowercase();
    if ADDRESS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        return true;
    }

    if POSTAL_CODE.is_match(text) {
        return true;
    }

    GRID_CODE.is_match(text)
}

/// Picks the best address out of the detail pane's candidate fragments.
///
/// Preference order: the first address-like fragment; failing that, the
/// first non-empty fragment that is not itself phone-plausible; failing
/// that, the first candidate verbatim. No candidates at all resolves to
/// the `"N/A"` sentinel.
#[must_use]
pub fn pick_address(candidates: &[String]) -> String {
    if let Some(hit) = candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| looks_like_address(c))
    {
        return hit.to_owned();
    }

    if let Some(hit) = candidates
        .iter()
        .map(|c| c.trim())
        .find(|c| !c.is_empty() && !is_plausible_phone(c))
    {
        return hit.to_owned();
    }

    candidates
        .first()
        .map_or_else(|| leadmap_core::NOT_AVAILABLE.to_owned(), |c| c.trim().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> MobileNumberFormat {
        MobileNumberFormat::default()
    }

    // -----------------------------------------------------------------------
    // is_plausible_phone
    // -----------------------------------------------------------------------

    #[test]
    fn plausible_rejects_fewer_than_seven_digits() {
        assert!(!is_plausible_phone("123 456"));
        assert!(!is_plausible_phone("12-34-56"));
        assert!(!is_plausible_phone("+1 (23) 45"));
    }

    #[test]
    fn plausible_rejects_short_text() {
        assert!(!is_plausible_phone("12345"));
        assert!(!is_plausible_phone(""));
    }

    #[test]
    fn plausible_accepts_plain_seven_digit_run() {
        assert!(is_plausible_phone("1234567"));
    }

    #[test]
    fn plausible_accepts_international_styles() {
        assert!(is_plausible_phone("+90 532 123 45 67"));
        assert!(is_plausible_phone("(0212) 345 67 89"));
        assert!(is_plausible_phone("0532-123-45-67"));
    }

    #[test]
    fn plausible_rejects_digitless_text() {
        assert!(!is_plausible_phone("no digits here"));
    }

    #[test]
    fn plausible_rejects_sixteen_digit_run_without_formatting() {
        assert!(!is_plausible_phone("1234567890123456"));
    }

    // -----------------------------------------------------------------------
    // is_target_mobile_number
    // -----------------------------------------------------------------------

    #[test]
    fn mobile_accepts_national_form() {
        assert!(is_target_mobile_number("0532 123 45 67", &fmt()));
        assert!(is_target_mobile_number("05321234567", &fmt()));
        assert!(is_target_mobile_number("0555-987-65-43", &fmt()));
    }

    #[test]
    fn mobile_accepts_international_forms() {
        assert!(is_target_mobile_number("+90 532 123 45 67", &fmt()));
        assert!(is_target_mobile_number("+905321234567", &fmt()));
        assert!(is_target_mobile_number("0090 532 123 45 67", &fmt()));
        assert!(is_target_mobile_number("90 532 123 45 67", &fmt()));
        assert!(is_target_mobile_number("+90 0532 123 45 67", &fmt()));
    }

    #[test]
    fn mobile_rejects_landline_prefix() {
        assert!(!is_target_mobile_number("0212 123 45 67", &fmt()));
        assert!(!is_target_mobile_number("+90 212 123 45 67", &fmt()));
    }

    #[test]
    fn mobile_rejects_wrong_length() {
        // One digit short / one digit long of the 10-digit significant number.
        assert!(!is_target_mobile_number("0532 123 45 6", &fmt()));
        assert!(!is_target_mobile_number("0532 123 45 678", &fmt()));
        assert!(!is_target_mobile_number("+90 532 123 45 6", &fmt()));
    }

    #[test]
    fn mobile_rejects_foreign_numbers() {
        assert!(!is_target_mobile_number("+1 555 123 4567", &fmt()));
        assert!(!is_target_mobile_number("+44 7911 123456", &fmt()));
    }

    #[test]
    fn mobile_rejects_non_numeric_text() {
        assert!(!is_target_mobile_number("Moda Cad. No: 5", &fmt()));
        assert!(!is_target_mobile_number("", &fmt()));
    }

    #[test]
    fn mobile_validity_implies_plausibility() {
        let samples = [
            "0532 123 45 67",
            "+90 532 123 45 67",
            "0090 532 123 45 67",
            "90 532 123 45 67",
            "05559876543",
        ];
        for s in samples {
            if is_target_mobile_number(s, &fmt()) {
                assert!(is_plausible_phone(s), "{s} mobile-valid but not plausible");
            }
        }
    }

    #[test]
    fn mobile_respects_alternate_national_format() {
        let alt = MobileNumberFormat {
            country_code: "49".to_owned(),
            mobile_leading: '1',
            national_length: 11,
        };
        assert!(is_target_mobile_number("+49 151 1234 5678", &alt));
        assert!(!is_target_mobile_number("+90 532 123 45 67", &alt));
    }

    // -----------------------------------------------------------------------
    // looks_like_address
    // -----------------------------------------------------------------------

    #[test]
    fn address_detects_keyword_and_postal_code() {
        assert!(looks_like_address("123 Main Street, 34000"));
    }

    #[test]
    fn address_detects_locale_abbreviations() {
        assert!(looks_like_address("Caferağa Mah. Moda Cad. No: 8"));
        assert!(looks_like_address("Bağdat Cd. Daire 3 Kat 2"));
    }

    #[test]
    fn address_detects_bare_postal_code() {
        assert!(looks_like_address("Kadıköy 34710 İstanbul"));
    }

    #[test]
    fn address_detects_grid_locator_code() {
        assert!(looks_like_address("W98M+J3 İstanbul"));
    }

    #[test]
    fn address_rejects_mobile_number() {
        assert!(!looks_like_address("0532 123 45 67"));
    }

    #[test]
    fn address_rejects_empty_and_plain_text() {
        assert!(!looks_like_address(""));
        assert!(!looks_like_address("Open until 22:00"));
    }

    // -----------------------------------------------------------------------
    // pick_address
    // -----------------------------------------------------------------------

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn pick_prefers_first_address_like_candidate() {
        let candidates = owned(&[
            "0532 123 45 67",
            "Moda Cad. No: 12, 34710",
            "Another Street 5",
        ]);
        assert_eq!(pick_address(&candidates), "Moda Cad. No: 12, 34710");
    }

    #[test]
    fn pick_falls_back_to_first_non_phone_text() {
        let candidates = owned(&["0532 123 45 67", "Open 24 hours"]);
        assert_eq!(pick_address(&candidates), "Open 24 hours");
    }

    #[test]
    fn pick_falls_back_to_first_candidate_verbatim() {
        // Every candidate is phone-plausible, so the first wins by default.
        let candidates = owned(&["0212 123 45 67", "0216 765 43 21"]);
        assert_eq!(pick_address(&candidates), "0212 123 45 67");
    }

    #[test]
    fn pick_returns_sentinel_without_candidates() {
        assert_eq!(pick_address(&[]), "N/A");
    }

    // -----------------------------------------------------------------------
    // classify
    // -----------------------------------------------------------------------

    #[test]
    fn classify_combines_all_signals() {
        let signal = classify("0532 123 45 67", &fmt());
        assert!(!signal.looks_like_address);
        assert!(signal.looks_like_phone);
        assert!(signal.is_target_mobile);

        let signal = classify("Moda Cad. No: 12, 34710", &fmt());
        assert!(signal.looks_like_address);
        assert!(!signal.is_target_mobile);
    }
}
