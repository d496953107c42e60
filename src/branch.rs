use regex::Regex;
use serde::Serialize;
use std::{fmt, sync::LazyLock};

// ASCII only: `\d` would also accept other Unicode digits
static BRANCH_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{3}$").unwrap());
static AMOUNT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A branch code: exactly three ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct BranchCode(String);

impl BranchCode {
    pub fn parse(s: &str) -> Option<Self> {
        if BRANCH_CODE.is_match(s) {
            Some(Self(s.to_owned()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BranchCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True for a non-empty string of ASCII digits only (no sign, no separators).
pub fn is_amount(s: &str) -> bool {
    AMOUNT.is_match(s)
}
