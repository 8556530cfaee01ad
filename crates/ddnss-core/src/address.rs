//! Dotted-quad address type
//!
//! Addresses are kept as the exact text the service returned. Two
//! addresses are equal only if their strings are equal, so `010.0.0.1`
//! and `10.0.0.1` count as different.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{Error, Result};

fn ipv4_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}").expect("IPv4 pattern is valid")
    })
}

/// An IPv4-shaped string (four groups of 1-3 digits, no octet range check)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddress(String);

impl IpAddress {
    /// Parse a whole string as a dotted quad
    ///
    /// Surrounding whitespace is ignored; anything else around the
    /// address is rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let candidate = text.trim();
        match ipv4_pattern().find(candidate) {
            Some(m) if m.start() == 0 && m.end() == candidate.len() => {
                Ok(Self(candidate.to_string()))
            }
            _ => Err(Error::InvalidAddress(candidate.to_string())),
        }
    }

    /// Find the first IPv4-shaped token in free-form text
    pub fn extract(text: &str) -> Option<Self> {
        ipv4_pattern()
            .find(text)
            .map(|m| Self(m.as_str().to_string()))
    }

    /// The address as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
