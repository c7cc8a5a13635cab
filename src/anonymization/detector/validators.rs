//! Checksum validators that recognizers can attach to their patterns

use serde::Deserialize;

/// Post-match check for a recognizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Validator {
    /// Luhn mod-10 (payment card numbers)
    Luhn,
    /// ISO 13616 mod-97 (IBAN)
    Iban,
    /// US social security number area/group/serial rules
    UsSsn,
}

impl Validator {
    /// Whether `candidate` passes the check
    pub fn validate(&self, candidate: &str) -> bool {
        match self {
            Validator::Luhn => luhn(candidate),
            Validator::Iban => iban(candidate),
            Validator::UsSsn => us_ssn(candidate),
        }
    }
}

fn luhn(candidate: &str) -> bool {
    let digits: Vec<u32> = candidate.chars().filter_map(|c| c.to_digit(10)).collect();
    if !(13..=19).contains(&digits.len()) {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

fn iban(candidate: &str) -> bool {
    let compact: String = candidate
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if !(15..=34).contains(&compact.len()) || !compact.chars().all(|c| c.is_ascii_alphanumeric()) {
        return false;
    }

    // Move country code and check digits to the end, then map letters to 10..35
    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    remainder == 1
}

fn us_ssn(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 9 {
        return false;
    }

    let area = &digits[0..3];
    let group = &digits[3..5];
    let serial = &digits[5..9];

    // Reject a run of one repeated digit (e.g. 111-11-1111)
    if digits.chars().all(|c| Some(c) == digits.chars().next()) {
        return false;
    }

    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("4111 1111 1111 1111", true ; "visa test number")]
    #[test_case("4111-1111-1111-1112", false ; "bad check digit")]
    #[test_case("5500 0000 0000 0004", true ; "mastercard test number")]
    #[test_case("1234", false ; "too short")]
    fn test_luhn(candidate: &str, expected: bool) {
        assert_eq!(Validator::Luhn.validate(candidate), expected);
    }

    #[test_case("GB82 WEST 1234 5698 7654 32", true ; "grouped")]
    #[test_case("DE89370400440532013000", true ; "compact")]
    #[test_case("DE89370400440532013001", false ; "bad checksum")]
    fn test_iban(candidate: &str, expected: bool) {
        assert_eq!(Validator::Iban.validate(candidate), expected);
    }

    #[test_case("123-45-6789", true ; "valid")]
    #[test_case("000-12-3456", false ; "zero area")]
    #[test_case("666-12-3456", false ; "area 666")]
    #[test_case("912-12-3456", false ; "area 9xx")]
    #[test_case("123-00-4567", false ; "zero group")]
    #[test_case("123-45-0000", false ; "zero serial")]
    #[test_case("111-11-1111", false ; "repeated digit")]
    fn test_us_ssn(candidate: &str, expected: bool) {
        assert_eq!(Validator::UsSsn.validate(candidate), expected);
    }
}
