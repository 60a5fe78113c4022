use std::{fmt, str::FromStr};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};


/// A calendar date in the ISO 8601 form `YYYY-MM-DD`, without time component.
///
/// Only the shape is checked: month `01` to `12`, day `01` to `31`. Whether
/// the day exists in that month is not verified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub(crate) struct IsoDate(String);

// `\d` would also match non-ASCII digits.
static PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$")
        .expect("invalid ISO date regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct InvalidDate;

impl fmt::Display for InvalidDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("not a valid ISO 8601 date string (expected 'YYYY-MM-DD')")
    }
}

impl std::error::Error for InvalidDate {}

impl IsoDate {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for IsoDate {
    type Err = InvalidDate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if PATTERN.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(InvalidDate)
        }
    }
}

impl TryFrom<String> for IsoDate {
    type Error = InvalidDate;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        if PATTERN.is_match(&value) {
            Ok(Self(value))
        } else {
            Err(InvalidDate)
        }
    }
}

impl From<IsoDate> for String {
    fn from(value: IsoDate) -> Self {
        value.0
    }
}

impl fmt::Display for IsoDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
