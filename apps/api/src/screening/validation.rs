//! Format checks for the identity steps. Pure functions, no normalization
//! beyond what each check states.

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

/// An email only has to contain "@".
pub fn is_valid_email(input: &str) -> bool {
    input.contains('@')
}

/// ASCII digits only, 7 to 15 of them.
pub fn is_valid_phone(input: &str) -> bool {
    !input.is_empty()
        && input.chars().all(|c| c.is_ascii_digit())
        && (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&input.len())
}

/// Parses whole years of experience. Surrounding whitespace is ignored;
/// negative, fractional and non-numeric input yields `None`.
pub fn parse_experience(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_requires_at() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("@"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_phone_length_bounds() {
        assert!(!is_valid_phone("123456"));
        assert!(is_valid_phone("1234567"));
        assert!(is_valid_phone("123456789012345"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn test_phone_rejects_non_digits() {
        assert!(!is_valid_phone("+15551234567"));
        assert!(!is_valid_phone("555-123-4567"));
        assert!(!is_valid_phone("555 1234567"));
        assert!(!is_valid_phone("５５５１２３４５６７"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_experience_parses_integers() {
        assert_eq!(parse_experience("0"), Some(0));
        assert_eq!(parse_experience(" 12 "), Some(12));
    }

    #[test]
    fn test_experience_rejects_other_input() {
        assert_eq!(parse_experience("five"), None);
        assert_eq!(parse_experience("-1"), None);
        assert_eq!(parse_experience("2.5"), None);
        assert_eq!(parse_experience(""), None);
    }
}
