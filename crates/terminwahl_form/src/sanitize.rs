// --- File: crates/terminwahl_form/src/sanitize.rs ---
//! Input filters applied while the user types.
//!
//! The pure filters work on strings; the `*_field` wrappers rewrite the value
//! of a page element and do nothing when the element does not exist.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::Page;

static NOT_DIGIT: Lazy<Regex> = Lazy::new(|| compile(r"[^0-9]"));
static NOT_LETTER: Lazy<Regex> = Lazy::new(|| compile(r"[^a-zäöüßA-ZÄÖÜ]"));
static NOT_H_OR_E: Lazy<Regex> = Lazy::new(|| compile(r"[^HE]"));
static NOT_LETTER_OR_DIGIT: Lazy<Regex> = Lazy::new(|| compile(r"[^a-zäöüßA-ZÄÖÜ0-9]"));
// Phone numbers: digits, '+' and whitespace survive
static NOT_PHONE: Lazy<Regex> = Lazy::new(|| compile(r"[^0-9+\s]"));

// The patterns are constants; a failure here is a programming error caught by the tests.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid filter pattern {pattern}: {e}"))
}

/// Keeps only `0-9`.
pub fn only_digits(input: &str) -> String {
    NOT_DIGIT.replace_all(input, "").into_owned()
}

/// Keeps only ASCII letters and the German umlauts and ß.
pub fn only_letters(input: &str) -> String {
    NOT_LETTER.replace_all(input, "").into_owned()
}

/// Keeps only the capital letters `H` and `E`.
pub fn only_h_or_e(input: &str) -> String {
    NOT_H_OR_E.replace_all(input, "").into_owned()
}

/// Keeps letters (including umlauts and ß) and digits.
pub fn only_digits_and_letters(input: &str) -> String {
    NOT_LETTER_OR_DIGIT.replace_all(input, "").into_owned()
}

/// Keeps digits, `+` and whitespace.
pub fn only_digits_and_plus(input: &str) -> String {
    NOT_PHONE.replace_all(input, "").into_owned()
}

fn filter_field(page: &mut Page, id: &str, filter: fn(&str) -> String) {
    if let Some(element) = page.element_mut(id) {
        element.value = filter(&element.value);
    }
}

pub fn only_digits_field(page: &mut Page, id: &str) {
    filter_field(page, id, only_digits);
}

pub fn only_letters_field(page: &mut Page, id: &str) {
    filter_field(page, id, only_letters);
}

pub fn only_h_or_e_field(page: &mut Page, id: &str) {
    filter_field(page, id, only_h_or_e);
}

pub fn only_digits_and_letters_field(page: &mut Page, id: &str) {
    filter_field(page, id, only_digits_and_letters);
}

pub fn only_digits_and_plus_field(page: &mut Page, id: &str) {
    filter_field(page, id, only_digits_and_plus);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Element;

    #[test]
    fn test_only_digits() {
        assert_eq!(only_digits("12a-3 4"), "1234");
        assert_eq!(only_digits("٣"), ""); // non-ASCII digits are dropped
    }

    #[test]
    fn test_only_letters_keeps_umlauts() {
        assert_eq!(only_letters("Müller-Lüdenscheidt 3"), "MüllerLüdenscheidt");
        assert_eq!(only_letters("Straße"), "Straße");
        assert_eq!(only_letters("Éva"), "va");
    }

    #[test]
    fn test_only_h_or_e() {
        assert_eq!(only_h_or_e("HxEhe1E"), "HEE");
    }

    #[test]
    fn test_only_digits_and_letters() {
        assert_eq!(only_digits_and_letters("WVW-ZZZ 1J"), "WVWZZZ1J");
    }

    #[test]
    fn test_only_digits_and_plus() {
        assert_eq!(only_digits_and_plus("+49 (089) 123-4"), "+49 089 1234");
    }

    #[test]
    fn test_field_wrapper_ignores_missing_element() {
        let mut page = Page::new("https://example.org/");
        page.add(Element::new("fin", "input").with_value("12ab34"));
        only_digits_field(&mut page, "fin");
        only_digits_field(&mut page, "missing");
        assert_eq!(page.element("fin").unwrap().value, "1234");
    }
}
