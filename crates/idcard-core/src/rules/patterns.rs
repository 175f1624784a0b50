//! Common regex patterns for identity-card text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Printed field labels followed by a colon or dash ("Name:", "DOB -").
    // Alternatives are ordered longest first so "Date of Birth" wins over "Date".
    pub static ref FIELD_LABEL: Regex = Regex::new(
        r"(?i)\b(full\s+name|surname|name|date\s+of\s+birth|birth\s+date|d\.?o\.?b\.?|date\s+of\s+expiry|expiry\s+date|expiration\s+date|expiry|expires|exp\.?|valid\s+until|id\s+number|id\s+no\.?|id|card\s+number|document\s+number|roll\s+number|address|addr\.?)\s*[:\-]"
    ).unwrap();

    // Characters kept in a normalized ID number.
    pub static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^A-Za-z0-9]").unwrap();

    // Trailing punctuation OCR tends to attach to dates ("01/01/1990.").
    pub static ref TRAILING_PUNCTUATION: Regex = Regex::new(r"[\s.,;:]+$").unwrap();
}
