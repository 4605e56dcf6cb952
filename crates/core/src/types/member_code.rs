//! Synthetic member code type.
//!
//! A member code is the `PREFIX-YEAR-SEQ` string assigned to each active
//! member, e.g. `GOGN-2024-003`. The sequence number is unique within one
//! (plan, calendar year) bucket and increases with membership start date.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MemberCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberCodeError {
    /// The input does not have the `PREFIX-YEAR-SEQ` shape.
    #[error("member code must have the form PREFIX-YEAR-SEQ")]
    Malformed,
    /// The prefix segment is empty.
    #[error("member code prefix cannot be empty")]
    EmptyPrefix,
    /// The year segment is not a four-digit number.
    #[error("member code year must be a four-digit number")]
    InvalidYear,
    /// The sequence segment is not a positive number.
    #[error("member code sequence must be a positive number")]
    InvalidSequence,
}

/// A synthetic membership identifier of the form `PREFIX-YEAR-SEQ`.
///
/// The sequence is rendered zero-padded to three digits but may grow wider
/// for buckets with more than 999 members.
///
/// ## Examples
///
/// ```
/// use gogn_core::MemberCode;
///
/// let code = MemberCode::new("GOGN", 2024, 3);
/// assert_eq!(code.to_string(), "GOGN-2024-003");
///
/// let parsed: MemberCode = "GOGN-2024-003".parse().unwrap();
/// assert_eq!(parsed, code);
/// assert_eq!(parsed.year(), 2024);
/// assert_eq!(parsed.sequence(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberCode {
    prefix: String,
    year: i32,
    sequence: u32,
}

impl MemberCode {
    /// Create a member code from its parts.
    #[must_use]
    pub fn new(prefix: &str, year: i32, sequence: u32) -> Self {
        Self {
            prefix: prefix.to_string(),
            year,
            sequence,
        }
    }

    /// Parse a member code from its `PREFIX-YEAR-SEQ` string form.
    ///
    /// The prefix itself may contain dashes; the year and sequence are
    /// always the last two dash-separated segments.
    ///
    /// # Errors
    ///
    /// Returns a [`MemberCodeError`] if the input does not split into at
    /// least three segments, the prefix is empty, the year is not four
    /// digits, or the sequence is zero or non-numeric.
    pub fn parse(s: &str) -> Result<Self, MemberCodeError> {
        let (rest, seq_part) = s.rsplit_once('-').ok_or(MemberCodeError::Malformed)?;
        let (prefix, year_part) = rest.rsplit_once('-').ok_or(MemberCodeError::Malformed)?;

        if prefix.is_empty() {
            return Err(MemberCodeError::EmptyPrefix);
        }

        if year_part.len() != 4 {
            return Err(MemberCodeError::InvalidYear);
        }
        let year: i32 = year_part
            .parse()
            .map_err(|_| MemberCodeError::InvalidYear)?;

        let sequence: u32 = seq_part
            .parse()
            .map_err(|_| MemberCodeError::InvalidSequence)?;
        if sequence == 0 {
            return Err(MemberCodeError::InvalidSequence);
        }

        Ok(Self {
            prefix: prefix.to_string(),
            year,
            sequence,
        })
    }

    /// Returns the prefix segment.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the calendar year the code belongs to.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the per-(plan, year) sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl fmt::Display for MemberCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{:03}", self.prefix, self.year, self.sequence)
    }
}

impl std::str::FromStr for MemberCode {
    type Err = MemberCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemberCode {
    type Error = MemberCodeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<MemberCode> for String {
    fn from(code: MemberCode) -> Self {
        code.to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_zero_pads_to_three_digits() {
        assert_eq!(MemberCode::new("GOGN", 2024, 1).to_string(), "GOGN-2024-001");
        assert_eq!(MemberCode::new("GOGN", 2024, 42).to_string(), "GOGN-2024-042");
        assert_eq!(
            MemberCode::new("GOGN", 2024, 1234).to_string(),
            "GOGN-2024-1234"
        );
    }

    #[test]
    fn test_parse_roundtrip() {
        let code: MemberCode = "GOGN-2023-017".parse().unwrap();
        assert_eq!(code.prefix(), "GOGN");
        assert_eq!(code.year(), 2023);
        assert_eq!(code.sequence(), 17);
        assert_eq!(code.to_string(), "GOGN-2023-017");
    }

    #[test]
    fn test_parse_dashed_prefix() {
        let code: MemberCode = "GOGN-EU-2023-002".parse().unwrap();
        assert_eq!(code.prefix(), "GOGN-EU");
        assert_eq!(code.year(), 2023);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(MemberCode::parse("GOGN"), Err(MemberCodeError::Malformed));
        assert_eq!(
            MemberCode::parse("GOGN-2024"),
            Err(MemberCodeError::Malformed)
        );
        assert_eq!(
            MemberCode::parse("-2024-001"),
            Err(MemberCodeError::EmptyPrefix)
        );
        assert_eq!(
            MemberCode::parse("GOGN-24-001"),
            Err(MemberCodeError::InvalidYear)
        );
        assert_eq!(
            MemberCode::parse("GOGN-2024-000"),
            Err(MemberCodeError::InvalidSequence)
        );
        assert_eq!(
            MemberCode::parse("GOGN-2024-abc"),
            Err(MemberCodeError::InvalidSequence)
        );
    }
}
