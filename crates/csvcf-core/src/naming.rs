//! Sequential display names such as `BET GROUP 1 001`

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Width the numeric suffix is zero-padded to
const SUFFIX_WIDTH: usize = 3;

/// A prefix plus a starting number; name `i` is `"{prefix} {start + i}"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamingSequence {
    pub prefix: String,
    pub start_index: i64,
}

impl NamingSequence {
    /// Create a new naming sequence
    pub fn new(prefix: impl Into<String>, start_index: i64) -> Self {
        Self {
            prefix: prefix.into(),
            start_index,
        }
    }

    /// Build a sequence from user-typed text
    pub fn parse(prefix: &str, start_index: &str) -> Result<Self> {
        let start = start_index.trim().parse::<i64>().map_err(|_| {
            Error::config(format!(
                "starting index must be a number, got '{}'",
                start_index
            ))
        })?;
        Ok(Self::new(prefix, start))
    }

    /// The name at position `offset` in the sequence
    pub fn name(&self, offset: usize) -> String {
        let n = self.start_index.saturating_add(offset as i64);
        format!("{} {}", self.prefix, zero_pad(n, SUFFIX_WIDTH))
    }

    /// Iterate over names starting at position 0
    pub fn names(&self) -> impl Iterator<Item = String> + '_ {
        (0..).map(move |i| self.name(i))
    }
}

/// Left-pad with zeros to `width` characters, keeping the sign in front
fn zero_pad(n: i64, width: usize) -> String {
    if n < 0 {
        format!("-{:0>w$}", n.unsigned_abs(), w = width.saturating_sub(1))
    } else {
        format!("{:0>w$}", n, w = width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_padding() {
        let seq = NamingSequence::new("X", 1);
        assert_eq!(seq.name(0), "X 001");
        assert_eq!(seq.name(9), "X 010");
        assert_eq!(seq.name(999), "X 1000");
    }

    #[test]
    fn test_names_iterator() {
        let seq = NamingSequence::new("BET GROUP 1", 98);
        let names: Vec<String> = seq.names().take(3).collect();
        assert_eq!(names, vec!["BET GROUP 1 098", "BET GROUP 1 099", "BET GROUP 1 100"]);
    }

    #[test]
    fn test_zero_pad_negative() {
        assert_eq!(zero_pad(-5, 3), "-05");
        assert_eq!(zero_pad(-123, 3), "-123");
        assert_eq!(zero_pad(0, 3), "000");
    }

    #[test]
    fn test_parse_start_index() {
        assert_eq!(NamingSequence::parse("X", " 7 ").unwrap().start_index, 7);

        let err = NamingSequence::parse("X", "seven").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }
}
