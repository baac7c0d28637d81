//! The canonical representation of a requested reconstruction rank.

use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SvdPressError;

/// How many singular components a caller wants kept per channel.
///
/// `Explicit` is clamped to the channel's `min(rows, cols)` at reconstruction
/// time; `Auto` uses the rank recommended by the energy-retention rule.
///
/// Serializes as the same string it parses from: `"50"` or `"auto"`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(into = "String", try_from = "String")]
pub enum RankSpec {
    Explicit(NonZeroUsize),
    Auto,
}

impl RankSpec {
    /// Builds an explicit rank, rejecting zero.
    pub fn explicit(k: usize) -> Result<Self, SvdPressError> {
        NonZeroUsize::new(k)
            .map(RankSpec::Explicit)
            .ok_or_else(|| SvdPressError::InvalidRank("rank must be a positive integer".into()))
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, RankSpec::Auto)
    }
}

impl FromStr for RankSpec {
    type Err = SvdPressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(RankSpec::Auto);
        }
        let k: usize = trimmed.parse().map_err(|_| {
            SvdPressError::InvalidRank(format!(
                "'{}' is neither a positive integer nor 'auto'",
                s
            ))
        })?;
        RankSpec::explicit(k)
    }
}

impl From<RankSpec> for String {
    fn from(rank: RankSpec) -> Self {
        rank.to_string()
    }
}

impl TryFrom<String> for RankSpec {
    type Error = SvdPressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Renders `50` or `auto`. This string appears in output file names.
impl fmt::Display for RankSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankSpec::Explicit(k) => write!(f, "{}", k),
            RankSpec::Auto => write!(f, "auto"),
        }
    }
}
