//! PII scrubbing for free text.
//!
//! Best-effort only: the patterns over-match things like version strings
//! and under-match international phone formats.

use lazy_static::lazy_static;
use regex::Regex;

pub const REDACTED_EMAIL: &str = "[REDACTED_EMAIL]";
pub const REDACTED_PHONE: &str = "[REDACTED_PHONE]";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"[\w.-]+@[\w.-]+\.\w+").unwrap();

    /// ddd-ddd-dddd with `-`, `.` or no separators.
    static ref PHONE_RE: Regex = Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").unwrap();
}

/// Replace email- and phone-shaped substrings with fixed redaction tokens.
pub fn sanitize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_emails = EMAIL_RE.replace_all(text, REDACTED_EMAIL);
    PHONE_RE
        .replace_all(&without_emails, REDACTED_PHONE)
        .into_owned()
}
