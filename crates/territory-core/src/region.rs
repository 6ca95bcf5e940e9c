//! # Region Codes
//!
//! A region code is a hyphen-separated identifier with one to three
//! segments, ordered most-specific-first:
//!
//! ```text
//! US            country
//! CA-US         province, country
//! LA-CA-US      city, province, country
//! ```
//!
//! Segments carry no meaning on their own. A city segment is only
//! meaningful together with the province and country it is qualified by,
//! and a code as a whole is validated against the location catalog rather
//! than segment by segment.
//!
//! ## Containment
//!
//! [`RegionCode::is_within`] answers "does the candidate lie inside the
//! pattern's territory". It is one-directional: `LA-CA-US` is within `US`,
//! but `US` is not within `LA-CA-US`.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between region code segments.
pub const SEGMENT_SEPARATOR: char = '-';

/// Granularity of a region code, derived from its segment count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionLevel {
    /// One segment.
    Country,
    /// Two segments.
    Province,
    /// Three segments.
    City,
}

impl RegionLevel {
    /// The canonical string name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::Province => "province",
            Self::City => "city",
        }
    }
}

impl std::fmt::Display for RegionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region code such as `US`, `CA-US` or `LA-CA-US`.
///
/// Ordering is lexicographic on the code string so rule sets held in
/// `BTreeSet`s iterate deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RegionCode(String);

impl RegionCode {
    /// Create a region code, rejecting empty or whitespace-only input.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyRegionCode`] for empty input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyRegionCode);
        }
        Ok(Self(s))
    }

    /// Access the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The code split on `-`, most specific segment first.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split(SEGMENT_SEPARATOR).collect()
    }

    /// Granularity of the code, or `None` for codes with more than three segments.
    pub fn level(&self) -> Option<RegionLevel> {
        match self.segments().len() {
            1 => Some(RegionLevel::Country),
            2 => Some(RegionLevel::Province),
            3 => Some(RegionLevel::City),
            _ => None,
        }
    }

    /// Whether this code lies inside the territory described by `pattern`.
    pub fn is_within(&self, pattern: &RegionCode) -> bool {
        is_subregion(&self.segments(), &pattern.segments())
    }
}

impl std::fmt::Display for RegionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RegionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RegionCode> for String {
    fn from(code: RegionCode) -> Self {
        code.0
    }
}

impl std::str::FromStr for RegionCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Segment-level containment test.
///
/// - a one-segment pattern matches when the candidate's last segment equals it;
/// - a two-segment pattern matches when the candidate has at least two
///   segments and its last two equal the pattern in order;
/// - a three-segment pattern matches only an identical three-segment candidate;
/// - any other pattern length never matches.
pub fn is_subregion(candidate: &[&str], pattern: &[&str]) -> bool {
    match *pattern {
        [country] => candidate.last() == Some(&country),
        [province, country] => {
            candidate.len() >= 2 && candidate[candidate.len() - 2..] == [province, country]
        }
        [_, _, _] => candidate.len() == 3 && candidate == pattern,
        _ => false,
    }
}
