use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Language used for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ko")]
    Korean,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::English => "en",
            Locale::Korean => "ko",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::English, Locale::Korean]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ko" | "korean" => Ok(Locale::Korean),
            _ => Err(anyhow::anyhow!(
                "Unknown language '{value}'. Supported languages: en, ko."
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_as_str_roundtrip() {
        for locale in Locale::all() {
            let parsed: Locale = locale.as_str().parse().expect("roundtrip should succeed");
            assert_eq!(*locale, parsed);
        }
    }

    #[test]
    fn unknown_locale_error() {
        let err = "fr".parse::<Locale>().unwrap_err();
        assert!(err.to_string().contains("Unknown language"));
    }
}
