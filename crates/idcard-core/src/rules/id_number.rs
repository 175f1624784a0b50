//! ID-number normalization and check-digit validation.

use crate::models::config::{IdChecksum, IdNumberConfig};

use super::patterns::NON_ALPHANUMERIC;

/// Strip everything but ASCII letters and digits, uppercased.
pub fn normalize_id(raw: &str) -> String {
    NON_ALPHANUMERIC.replace_all(raw, "").to_ascii_uppercase()
}

/// Check a normalized ID against the configured length bounds and checksum.
pub fn validate_id(id: &str, rules: &IdNumberConfig) -> bool {
    let len = id.chars().count();
    if len < rules.min_length || len > rules.max_length {
        return false;
    }

    match &rules.checksum {
        IdChecksum::None => true,
        IdChecksum::Luhn => validate_luhn(id),
        IdChecksum::Weighted { weights, modulus } => validate_weighted(id, weights, *modulus),
    }
}

/// Luhn mod-10 check over an all-digit string.
pub fn validate_luhn(id: &str) -> bool {
    let digits: Option<Vec<u32>> = id.chars().map(|c| c.to_digit(10)).collect();
    let Some(digits) = digits else {
        return false;
    };
    if digits.len() < 2 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Weighted check digit: the last character must equal the weighted sum of
/// the others modulo `modulus`. Weights repeat as needed.
pub fn validate_weighted(id: &str, weights: &[u32], modulus: u32) -> bool {
    if weights.is_empty() || modulus == 0 {
        return false;
    }
    let modulus = u64::from(modulus);

    let chars: Vec<char> = id.chars().collect();
    let Some((check, body)) = chars.split_last() else {
        return false;
    };
    let Some(expected) = check.to_digit(10) else {
        return false;
    };

    // Reduced as it goes: values stay below 36 * u32::MAX + modulus.
    let mut sum = 0u64;
    for (c, w) in body.iter().zip(weights.iter().cycle()) {
        let Some(v) = char_value(*c) else {
            return false;
        };
        sum = (sum + u64::from(v) * u64::from(*w)) % modulus;
    }

    sum == u64::from(expected)
}

/// ICAO 9303 character values: digits as-is, A=10..Z=35, `<` = 0.
fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        '<' => Some(0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(checksum: IdChecksum) -> IdNumberConfig {
        IdNumberConfig {
            checksum,
            ..IdNumberConfig::default()
        }
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("123-456 789"), "123456789");
        assert_eq!(normalize_id(" ab.12/34c "), "AB1234C");
        assert_eq!(normalize_id("--"), "");
    }

    #[test]
    fn test_length_rule() {
        let r = rules(IdChecksum::None);
        assert!(validate_id("123456789", &r));
        assert!(!validate_id("12345", &r));
        assert!(!validate_id(&"9".repeat(21), &r));
    }

    #[test]
    fn test_luhn() {
        assert!(validate_luhn("79927398713"));
        assert!(!validate_luhn("79927398710"));
        assert!(!validate_luhn("7992A398713"));
        assert!(validate_id("79927398713", &rules(IdChecksum::Luhn)));
    }

    #[test]
    fn test_icao_document_number() {
        // ICAO 9303 specimen: document number L898902C with check digit 3.
        let icao = rules(IdChecksum::Weighted {
            weights: vec![7, 3, 1],
            modulus: 10,
        });
        assert!(validate_id("L898902C3", &icao));
        assert!(!validate_id("L898902C4", &icao));
    }

    #[test]
    fn test_weighted_fixed_weights() {
        // Polish NIP style: 9 weights, mod 11.
        let weights = [6, 5, 7, 2, 3, 4, 5, 6, 7];
        assert!(validate_weighted("5261040828", &weights, 11));
        assert!(!validate_weighted("5261040829", &weights, 11));
    }

    #[test]
    fn test_weighted_with_huge_weights() {
        // 1..8 weighted by u32::MAX (== 5 mod 10): 36 * 5 = 180, check digit 0.
        assert!(validate_weighted("123456780", &[u32::MAX], 10));
        assert!(!validate_weighted("123456789", &[u32::MAX], 10));
        assert!(!validate_weighted("ZZZZZZZZ1", &[u32::MAX], u32::MAX));
    }
}
