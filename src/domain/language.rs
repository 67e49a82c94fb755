use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static LANGUAGE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+(\+[A-Za-z0-9_]+)*$").expect("valid language regex")
});

/// Tesseract language selector such as `eng` or `eng+deu`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Language(String);

impl Language {
    pub fn parse(raw: &str) -> Result<Self, InvalidLanguage> {
        let trimmed = raw.trim();
        if LANGUAGE_CODE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(InvalidLanguage(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid language code: {0:?}")]
pub struct InvalidLanguage(pub String);
