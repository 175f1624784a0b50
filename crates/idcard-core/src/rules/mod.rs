//! Rule-based helpers: patterns, date and ID-number validation, text offsets.

pub mod dates;
pub mod id_number;
pub mod patterns;
pub mod text;

pub use dates::{normalize_date, parse_date};
pub use id_number::{normalize_id, validate_id, validate_luhn, validate_weighted};
pub use text::{char_len, char_offset, char_slice, collapse_whitespace};
