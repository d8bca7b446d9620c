//! Input validation for account fields.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("username pattern compiles"));

/// Whether `email` looks like a deliverable address.
pub fn is_email_valid(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Usernames are ASCII letters and digits only.
pub fn is_username_valid(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// Returns the first field whose value is blank, in the order given.
pub fn first_missing<'a>(fields: &[(&'a str, &str)]) -> Option<&'a str> {
    fields
        .iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
}

/// Lowercase and trim an identifier for storage and matching.
pub fn normalize_identifier(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_email_valid("alice@x.com"));
        assert!(is_email_valid("first.last@mail.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_email_valid("alice"));
        assert!(!is_email_valid("alice@"));
        assert!(!is_email_valid("@x.com"));
        assert!(!is_email_valid("alice@x"));
    }

    #[test]
    fn username_must_be_alphanumeric() {
        assert!(is_username_valid("alice2"));
        assert!(!is_username_valid("alice_2"));
        assert!(!is_username_valid("al ice"));
        assert!(!is_username_valid(""));
    }

    #[test]
    fn first_missing_reports_in_order() {
        let fields = [("fullName", "Alice"), ("email", " "), ("username", "")];
        assert_eq!(first_missing(&fields), Some("email"));
        assert_eq!(first_missing(&[("a", "x")]), None);
    }

    #[test]
    fn normalize_lowercases_and_trims() {
        assert_eq!(normalize_identifier("  Alice@X.com "), "alice@x.com");
    }
}
