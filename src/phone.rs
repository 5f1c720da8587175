//! M-Pesa phone number input handling.
//!
//! Display formatting only ever groups the first ten digits, while validation accepts
//! both the local (10 digit) and international (12 digit, `254...`) forms.

use std::fmt;

const DISPLAY_DIGITS: usize = 10;
const VALID_LENGTHS: [usize; 2] = [10, 12];

/// Strips everything except ASCII digits.
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Regroups a phone number as `ddd ddd dddd`.
///
/// Input beyond ten digits is truncated. Fewer than ten digits are returned as a
/// plain digit string.
pub fn format_phone_number(input: &str) -> String {
    let digits: String = normalize(input).chars().take(DISPLAY_DIGITS).collect();
    if digits.len() < DISPLAY_DIGITS {
        return digits;
    }
    format!("{} {} {}", &digits[..3], &digits[3..6], &digits[6..])
}

pub fn is_valid_phone_number(input: &str) -> bool {
    VALID_LENGTHS.contains(&normalize(input).len())
}

/// Phone number as typed into the checkout form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhoneNumber {
    digits: String,
}

impl PhoneNumber {
    pub fn parse(input: &str) -> Self {
        Self {
            digits: normalize(input),
        }
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_valid(&self) -> bool {
        is_valid_phone_number(&self.digits)
    }

    pub fn display(&self) -> String {
        format_phone_number(&self.digits)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_local_number() {
        assert_eq!(format_phone_number("0712345678"), "071 234 5678");
        assert!(is_valid_phone_number("0712345678"));
    }

    #[test]
    fn international_number_is_valid_but_display_is_truncated() {
        let phone = PhoneNumber::parse("254712345678");
        assert!(phone.is_valid());
        assert_eq!(phone.digits(), "254712345678");
        assert_eq!(phone.display(), "254 712 3456");
    }

    #[test]
    fn formatting_is_idempotent_on_grouped_input() {
        let once = format_phone_number("071 234 5678");
        assert_eq!(once, "071 234 5678");
        assert_eq!(format_phone_number(&once), once);
    }

    #[test]
    fn strips_punctuation_before_grouping() {
        assert_eq!(format_phone_number("(071) 234-5678"), "071 234 5678");
        assert_eq!(format_phone_number("+254 712"), "254712");
        assert_eq!(format_phone_number("abc"), "");
    }

    #[test]
    fn validity_depends_only_on_digit_count() {
        for len in 0..=16 {
            let input = "7".repeat(len);
            assert_eq!(
                is_valid_phone_number(&input),
                len == 10 || len == 12,
                "length {len}"
            );
        }
        assert!(is_valid_phone_number("07-12-34-56-78"));
        assert!(!is_valid_phone_number("071 234 567"));
    }
}
