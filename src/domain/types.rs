//! Strongly-typed value objects used by the search state machine.
//!
//! These wrappers enforce the small set of invariants the search backend
//! relies on (allowed page sizes, ISO dates, known enum spellings) so that a
//! value reaching the request builder can be sent as-is.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Page size outside of the sizes offered by the results view.
    #[error("page size must be one of 10, 25 or 50, got {0}")]
    InvalidPageSize(usize),
    /// Date string matched none of the accepted layouts.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Kind of IP asset being searched.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMode {
    #[default]
    Patent,
    Trademark,
}

impl SearchMode {
    /// Value of the `assetType` request field.
    pub const fn asset_type(self) -> &'static str {
        match self {
            SearchMode::Patent => "PATENT",
            SearchMode::Trademark => "TRADEMARK",
        }
    }

    /// Value of the `dataSource` request field; patents let the backend pick.
    pub const fn data_source(self) -> Option<&'static str> {
        match self {
            SearchMode::Patent => None,
            SearchMode::Trademark => Some("TMVIEW"),
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.asset_type())
    }
}

impl FromStr for SearchMode {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PATENT" => Ok(SearchMode::Patent),
            "TRADEMARK" => Ok(SearchMode::Trademark),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Field the free-text search value is matched against.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    #[default]
    Keyword,
    Inventor,
    Assignee,
}

impl SearchType {
    pub const fn as_str(self) -> &'static str {
        match self {
            SearchType::Keyword => "keyword",
            SearchType::Inventor => "inventor",
            SearchType::Assignee => "assignee",
        }
    }
}

impl Display for SearchType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(SearchType::Keyword),
            "inventor" => Ok(SearchType::Inventor),
            "assignee" => Ok(SearchType::Assignee),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDirection::Asc => f.write_str("ASC"),
            SortDirection::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(TypeConstraintError::InvalidValue(other.to_string())),
        }
    }
}

/// Number of results per page; only 10, 25 and 50 are offered.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "usize", into = "usize")]
pub struct PageSize(usize);

impl PageSize {
    pub const ALLOWED: [usize; 3] = [10, 25, 50];

    /// Creates a page size, rejecting anything not in [`PageSize::ALLOWED`].
    pub fn new(value: usize) -> Result<Self, TypeConstraintError> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(TypeConstraintError::InvalidPageSize(value))
        }
    }

    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(10)
    }
}

impl Display for PageSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for PageSize {
    type Error = TypeConstraintError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PageSize> for usize {
    fn from(value: PageSize) -> Self {
        value.0
    }
}

impl FromStr for PageSize {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<usize>()
            .map_err(|_| TypeConstraintError::InvalidValue(s.to_string()))?;
        Self::new(value)
    }
}

/// Parses a user-entered date into a calendar date.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` and `MM/DD/YYYY` (either
/// separator). A trailing four-digit year is read day-first; the month-first
/// reading is used only when day-first is not a real date. Blank input means
/// "no bound" and yields `Ok(None)`.
pub fn normalize_date(raw: &str) -> Result<Option<NaiveDate>, TypeConstraintError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let invalid = || TypeConstraintError::InvalidDate(trimmed.to_string());

    let parts: Vec<&str> = trimmed.split(['/', '-']).collect();
    let [first, second, third] = parts[..] else {
        return Err(invalid());
    };
    if !parts
        .iter()
        .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let number = |part: &str| part.parse::<u32>().map_err(|_| invalid());
    let year = |part: &str| part.parse::<i32>().map_err(|_| invalid());

    let date = if first.len() == 4 {
        NaiveDate::from_ymd_opt(year(first)?, number(second)?, number(third)?)
    } else if third.len() == 4 {
        let year = year(third)?;
        let (a, b) = (number(first)?, number(second)?);
        NaiveDate::from_ymd_opt(year, b, a).or_else(|| NaiveDate::from_ymd_opt(year, a, b))
    } else {
        None
    };

    date.map(Some).ok_or_else(invalid)
}
