//! Small validated value types shared across the notes workspace.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, or `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A credential that must be non-empty and never shows up in `Debug` or `Display` output.
///
/// Configuration structs derive `Debug` and are logged at startup, so the key itself is only
/// reachable through [`SecretText::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct SecretText(NonEmptyText);

impl SecretText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        NonEmptyText::new(input).map(Self)
    }

    /// Returns the raw secret for use in an outbound request header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for SecretText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretText(****)")
    }
}

impl std::fmt::Display for SecretText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("****")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  stable  ").unwrap();
        assert_eq!(text.as_str(), "stable");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new(" \n\t"), Err(TextError::Empty)));
    }

    #[test]
    fn secret_text_is_redacted() {
        let secret = SecretText::new("gsk_live_123").unwrap();
        assert_eq!(format!("{:?}", secret), "SecretText(****)");
        assert_eq!(secret.to_string(), "****");
        assert_eq!(secret.expose(), "gsk_live_123");
    }

    #[test]
    fn secret_text_rejects_empty() {
        assert!(SecretText::new("").is_err());
    }
}
