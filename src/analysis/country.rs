use serde::{Deserialize, Serialize};

use crate::reference::COUNTRIES;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub country: String,
    pub flag: String,
}

impl CountryInfo {
    fn new(country: &str, flag: &str) -> Self {
        Self {
            country: country.to_string(),
            flag: flag.to_string(),
        }
    }

    /// Numbers without an international prefix are assumed to be domestic.
    pub fn domestic() -> Self {
        Self::new("Spain", "🇪🇸")
    }

    pub fn unknown() -> Self {
        Self::new("Unknown", "❓")
    }
}

/// Resolve the originating country of a phone number.
///
/// The input is expected to be clean: digits with an optional leading `+`.
/// Spaces or dashes are not stripped, so `+34 600` still resolves (the
/// prefix is intact) while `+ 34 600` does not.
pub fn resolve_country(phone: &str) -> CountryInfo {
    if !phone.starts_with('+') {
        return CountryInfo::domestic();
    }

    COUNTRIES
        .iter()
        .filter(|c| phone.starts_with(c.prefix))
        .max_by_key(|c| c.prefix.len())
        .map(|c| CountryInfo::new(c.country, c.flag))
        .unwrap_or_else(CountryInfo::unknown)
}
