//! Syntactic validation for submitted identifiers.
//!
//! The resolver treats identifiers as opaque strings; only this adapter
//! layer knows what a well-formed email or phone number looks like.

/// Normalise an optional identifier: trim whitespace, treat empty as absent.
pub(crate) fn normalise(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Loose email shape check: one `@` with a non-empty local part and a dotted
/// domain, no whitespace. Deliverability is not this service's concern.
pub(crate) fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = value.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain.split('.').count() >= 2 && domain.split('.').all(|label| !label.is_empty())
}

/// Phone numbers may contain digits, `+`, `-`, parentheses and spaces, and
/// must carry at least six digits.
pub(crate) fn is_valid_phone_number(value: &str) -> bool {
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '));
    allowed && value.chars().filter(char::is_ascii_digit).count() >= 6
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, None)]
    #[case(Some(String::new()), None)]
    #[case(Some("   ".to_owned()), None)]
    #[case(Some(" a@x.com ".to_owned()), Some("a@x.com"))]
    fn normalise_discards_blank_values(#[case] input: Option<String>, #[case] expected: Option<&str>) {
        assert_eq!(normalise(input).as_deref(), expected);
    }

    #[rstest]
    #[case("a@x.com", true)]
    #[case("first.last@sub.example.co", true)]
    #[case("no-at-sign", false)]
    #[case("@x.com", false)]
    #[case("a@nodomain", false)]
    #[case("a@x..com", false)]
    #[case("a@x.com extra", false)]
    #[case("a@b@x.com", false)]
    fn email_shapes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_valid_email(value), valid);
    }

    #[rstest]
    #[case("123456", true)]
    #[case("+44 (0) 20-7946 0958", true)]
    #[case("12345", false)]
    #[case("123-456x", false)]
    #[case("phone", false)]
    fn phone_shapes(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(is_valid_phone_number(value), valid);
    }
}
