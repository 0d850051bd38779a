//! Human-readable prefixed record codes (`ELD001`, `ASM014`, `USR1001`,
//! `ANR002`).
//!
//! Codes are zero-padded to three digits and grow past that without
//! truncation, so ordering must compare the numeric part, never the string.

use std::cmp::Ordering;

use crate::error::CoreError;

/// The record families that receive prefixed codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    Elderly,
    Assessment,
    User,
    Analysis,
}

impl CodeKind {
    pub fn prefix(self) -> &'static str {
        match self {
            CodeKind::Elderly => "ELD",
            CodeKind::Assessment => "ASM",
            CodeKind::User => "USR",
            CodeKind::Analysis => "ANR",
        }
    }

    /// Name of the counter slot in the sequence state object.
    pub fn sequence_name(self) -> &'static str {
        match self {
            CodeKind::Elderly => "elderly",
            CodeKind::Assessment => "assessment",
            CodeKind::User => "user",
            CodeKind::Analysis => "analysis",
        }
    }

    pub fn format(self, n: u64) -> String {
        format!("{}{n:03}", self.prefix())
    }

    /// Parse a code, trimming whitespace and uppercasing first.
    ///
    /// `" asm014 "` parses to `ASM014`; `ASM14` and `ASMX01` are rejected.
    pub fn parse(self, raw: &str) -> Result<String, CoreError> {
        let code = raw.trim().to_uppercase();
        let valid = code
            .strip_prefix(self.prefix())
            .is_some_and(|digits| digits.len() >= 3 && digits.bytes().all(|b| b.is_ascii_digit()));

        if valid {
            Ok(code)
        } else {
            Err(CoreError::InvalidId {
                prefix: self.prefix(),
                value: raw.to_string(),
            })
        }
    }
}

/// Numeric part of a prefixed code, if it has one.
pub fn code_number(code: &str) -> Option<u64> {
    let digits_at = code.find(|c: char| c.is_ascii_digit())?;
    code[digits_at..].parse().ok()
}

/// Order two codes by their numeric part, falling back to string order.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    match (code_number(a), code_number(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
