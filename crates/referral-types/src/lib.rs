/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// A specialty identifier contained characters other than ASCII letters, digits or `_`
    #[error("invalid specialty identifier: {0}")]
    InvalidSpecialty(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Like [`NonEmptyText::new`], but maps empty or absent input to `None`.
    ///
    /// Useful for optional request fields where an empty string means "not supplied".
    pub fn optional(input: Option<impl AsRef<str>>) -> Option<Self> {
        input.and_then(|s| Self::new(s).ok())
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
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

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A medical specialty identifier such as `cardiology` or `general_practice`.
///
/// Identifiers are stored lower-case so that they can be matched against lower-cased
/// transcript text and used as keys into the provider and plan tables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Specialty(String);

impl Specialty {
    /// Creates a specialty identifier, trimming and lower-casing the input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` for blank input and `TextError::InvalidSpecialty` if the
    /// identifier contains anything other than ASCII alphanumerics or `_`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }

        let ok = trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
        if !ok {
            return Err(TextError::InvalidSpecialty(trimmed.to_owned()));
        }

        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable form: underscores become spaces and each word is capitalised.
    ///
    /// `general_practice` renders as `General Practice`.
    pub fn title(&self) -> String {
        self.0
            .split('_')
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Specialty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Specialty {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Specialty {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for Specialty {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Specialty {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Specialty::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  refer to cardiology \n").expect("valid text");
        assert_eq!(text.as_str(), "refer to cardiology");
    }

    #[test]
    fn non_empty_text_rejects_whitespace() {
        assert!(matches!(NonEmptyText::new("   \t"), Err(TextError::Empty)));
    }

    #[test]
    fn optional_maps_blank_to_none() {
        assert_eq!(NonEmptyText::optional(Some("")), None);
        assert_eq!(NonEmptyText::optional(None::<&str>), None);
        assert_eq!(
            NonEmptyText::optional(Some(" Kaiser ")).map(|t| t.into_inner()),
            Some("Kaiser".to_string())
        );
    }

    #[test]
    fn specialty_is_lower_cased() {
        let specialty = Specialty::new(" Cardiology").expect("valid specialty");
        assert_eq!(specialty.as_str(), "cardiology");
    }

    #[test]
    fn specialty_rejects_punctuation() {
        let err = Specialty::new("cardio logy").expect_err("space is not allowed");
        assert!(matches!(err, TextError::InvalidSpecialty(_)));
    }

    #[test]
    fn specialty_title_capitalises_words() {
        let specialty = Specialty::new("general_practice").expect("valid specialty");
        assert_eq!(specialty.title(), "General Practice");
    }

    #[test]
    fn specialty_deserialize_validates() {
        let ok: Specialty = serde_json::from_str("\"Dermatology\"").expect("deserialize");
        assert_eq!(ok.as_str(), "dermatology");

        let err = serde_json::from_str::<Specialty>("\"\"");
        assert!(err.is_err());
    }
}
