use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating phone numbers
    /// Optional leading "+", then 7 to 15 digits
    /// - Valid: "0991234567", "+593991234567", "2345678"
    /// - Invalid: "099-123-4567", "123", "phone", ""
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
}

/// Non-empty after trimming whitespace
pub fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("blank"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_regex_valid() {
        assert!(PHONE_REGEX.is_match("0991234567"));
        assert!(PHONE_REGEX.is_match("+593991234567"));
        assert!(PHONE_REGEX.is_match("2345678"));
    }

    #[test]
    fn test_phone_regex_invalid() {
        assert!(!PHONE_REGEX.is_match("099-123-4567")); // separators
        assert!(!PHONE_REGEX.is_match("123")); // too short
        assert!(!PHONE_REGEX.is_match("1234567890123456")); // too long
        assert!(!PHONE_REGEX.is_match("phone"));
        assert!(!PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Ana").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }
}
