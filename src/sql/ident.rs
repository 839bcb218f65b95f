//! Identifier validation for table and column names interpolated into SQL text.

use crate::error::AppError;

/// True when `s` is non-empty and consists only of ASCII letters, digits and underscores.
pub fn is_word(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// Validate and return a safe SQL identifier. Surrounding whitespace is trimmed; `*` is allowed.
pub fn identifier(raw: &str) -> Result<String, AppError> {
    let s = raw.trim();
    if s == "*" || is_word(s) {
        Ok(s.to_string())
    } else {
        Err(AppError::InvalidIdentifier(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("users", "users")]
    #[case("created_at", "created_at")]
    #[case("Col9", "Col9")]
    #[case("*", "*")]
    #[case("  email ", "email")]
    #[case(" * ", "*")]
    fn test_valid_identifiers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(identifier(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("users; DROP TABLE users")]
    #[case("users.id")]
    #[case("na-me")]
    #[case("`id`")]
    #[case("**")]
    #[case("id)")]
    #[case("naïve")]
    fn test_invalid_identifiers(#[case] raw: &str) {
        assert!(matches!(identifier(raw), Err(AppError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_is_word_rejects_spaces() {
        assert!(is_word("index"));
        assert!(!is_word("bad method"));
        assert!(!is_word(""));
    }
}
