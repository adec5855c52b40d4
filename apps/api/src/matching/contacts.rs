//! Contact field extraction from raw resume text.
//!
//! Fixed regexes plus a positional heuristic for the candidate name. These
//! are best-effort: a `None` field is a valid outcome, not an error.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Permissive email shape: word/dot/hyphen local part, domain with at
    /// least one dot.
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap();
    /// Permissive phone shape: optional country-code prefix, then 2-4 groups
    /// of 2-4 digits with tolerant separators.
    static ref PHONE_RE: Regex =
        Regex::new(r"(\+?\d{1,3}[\s\-.(]?)?(\d{2,4}[\s\-.)]?){2,4}").unwrap();
}

/// How many leading non-empty lines are considered for the name heuristic.
const NAME_SCAN_LINES: usize = 5;
const NAME_MAX_WORDS: usize = 6;
const NAME_MAX_CHARS: usize = 60;

/// Structured contact fields parsed from a resume. All best-effort,
/// never guaranteed present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Extracts name, email, and phone from raw text.
///
/// The name is the first of the leading non-empty lines that does not
/// contain the located email or phone and looks short enough to be a name.
pub fn parse_contacts(text: &str) -> ContactInfo {
    let email = EMAIL_RE.find(text).map(|m| m.as_str().to_string());
    let phone = PHONE_RE.find(text).map(|m| m.as_str().trim().to_string());

    let mut name = None;
    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    for line in lines.take(NAME_SCAN_LINES) {
        if email.as_deref().is_some_and(|e| line.contains(e)) {
            continue;
        }
        if phone.as_deref().is_some_and(|p| line.contains(p)) {
            continue;
        }
        if line.split_whitespace().count() <= NAME_MAX_WORDS
            && line.chars().count() < NAME_MAX_CHARS
        {
            name = Some(line.to_string());
            break;
        }
    }

    ContactInfo { name, email, phone }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESUME: &str =
        "John Doe\njohn@example.com\n+1 555-123-4567\nPython, SQL experience";

    #[test]
    fn test_full_contact_block_is_parsed() {
        let contact = parse_contacts(SAMPLE_RESUME);
        assert_eq!(contact.name.as_deref(), Some("John Doe"));
        assert_eq!(contact.email.as_deref(), Some("john@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("+1 555-123-4567"));
    }

    #[test]
    fn test_text_without_contact_info_yields_nones() {
        let contact = parse_contacts("");
        assert_eq!(contact, ContactInfo::default());
    }

    #[test]
    fn test_email_only() {
        let contact = parse_contacts("reach me at jane.roe@mail.co please");
        assert_eq!(contact.email.as_deref(), Some("jane.roe@mail.co"));
        assert!(contact.phone.is_none());
    }

    #[test]
    fn test_first_email_wins() {
        let contact = parse_contacts("a@b.com later c@d.org");
        assert_eq!(contact.email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn test_name_skips_line_containing_email() {
        let text = "jane.roe@mail.co\nJane Roe\nExperienced analyst";
        let contact = parse_contacts(text);
        assert_eq!(contact.name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_name_rejects_long_lines() {
        let text = format!(
            "{}\nJane Roe\n",
            "A very long headline line that clearly is not anybody's name at all"
        );
        let contact = parse_contacts(&text);
        assert_eq!(contact.name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_name_rejects_wordy_lines() {
        let text = "one two three four five six seven\nJane Roe";
        let contact = parse_contacts(text);
        assert_eq!(contact.name.as_deref(), Some("Jane Roe"));
    }

    #[test]
    fn test_name_only_scans_leading_lines() {
        let text = "x y z w q a b\nx y z w q a b\nx y z w q a b\nx y z w q a b\nx y z w q a b\nJane Roe";
        let contact = parse_contacts(text);
        assert!(contact.name.is_none());
    }

    #[test]
    fn test_phone_with_parenthesized_area_code() {
        let contact = parse_contacts("Call (020) 7946 0958 today");
        assert!(contact.phone.is_some());
    }
}
