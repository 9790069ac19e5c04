//! File naming styles and identifier case conversion.
//!
//! A naming style is written with the two marker words `go` and `zero`. The
//! case of each marker decides how words are cased, and whatever sits between
//! the markers becomes the word separator:
//!
//! | style     | `GetUserHandler`       |
//! |-----------|------------------------|
//! | `gozero`  | `getuserhandler`       |
//! | `go_zero` | `get_user_handler`     |
//! | `go-zero` | `get-user-handler`     |
//! | `goZero`  | `getUserHandler`       |
//! | `GoZero`  | `GetUserHandler`       |
//! | `GO_ZERO` | `GET_USER_HANDLER`     |
//!
//! Text before the `go` marker or after the `zero` marker is copied verbatim.
//!
//! # Examples
//!
//! ```
//! use svcgen::core::naming::format_file_name;
//!
//! assert_eq!(format_file_name("go_zero", "PingHandler").unwrap(), "ping_handler");
//! assert!(format_file_name("snake", "PingHandler").is_err());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::core::error::{Error, Result};

/// Style used when neither the command line nor the config file sets one
pub const DEFAULT_STYLE: &str = "gozero";

const GO_MARKER: &str = "GO";
const ZERO_MARKER: &str = "ZERO";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordCase {
    Lower,
    Title,
    Upper,
}

impl WordCase {
    fn from_marker(marker: &str) -> Option<Self> {
        let mut chars = marker.chars();
        let first = chars.next()?;
        let rest: String = chars.collect();

        if marker.chars().all(|c| c.is_ascii_lowercase()) {
            Some(Self::Lower)
        } else if marker.chars().all(|c| c.is_ascii_uppercase()) {
            Some(Self::Upper)
        } else if first.is_ascii_uppercase() && rest.chars().all(|c| c.is_ascii_lowercase()) {
            Some(Self::Title)
        } else {
            None
        }
    }

    fn apply(self, word: &str) -> String {
        match self {
            Self::Lower => word.to_lowercase(),
            Self::Upper => word.to_uppercase(),
            Self::Title => title(&word.to_lowercase()),
        }
    }
}

/// A parsed file naming style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingStyle {
    source: String,
    prefix: String,
    first: WordCase,
    separator: String,
    rest: WordCase,
    suffix: String,
}

impl NamingStyle {
    /// Format an identifier as a file stem in this style
    pub fn format(&self, identifier: &str) -> String {
        let words = split_words(identifier);
        let mut out = String::with_capacity(identifier.len() + self.prefix.len() + 8);
        out.push_str(&self.prefix);

        for (i, word) in words.iter().enumerate() {
            if i == 0 {
                out.push_str(&self.first.apply(word));
            } else {
                out.push_str(&self.separator);
                out.push_str(&self.rest.apply(word));
            }
        }

        out.push_str(&self.suffix);
        out
    }

    /// The style string this was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Default for NamingStyle {
    fn default() -> Self {
        Self {
            source: DEFAULT_STYLE.to_string(),
            prefix: String::new(),
            first: WordCase::Lower,
            separator: String::new(),
            rest: WordCase::Lower,
            suffix: String::new(),
        }
    }
}

impl FromStr for NamingStyle {
    type Err = Error;

    fn from_str(style: &str) -> Result<Self> {
        let invalid = || Error::InvalidStyle(style.to_string());

        // Markers are located on the uppercased copy, so byte offsets must line up
        if !style.is_ascii() || style.contains(['/', '\\']) {
            return Err(invalid());
        }

        let upper = style.to_ascii_uppercase();
        let go_at = upper.find(GO_MARKER).ok_or_else(invalid)?;
        let zero_at = upper.find(ZERO_MARKER).ok_or_else(invalid)?;
        if go_at + GO_MARKER.len() > zero_at {
            return Err(invalid());
        }

        let go = &style[go_at..go_at + GO_MARKER.len()];
        let zero = &style[zero_at..zero_at + ZERO_MARKER.len()];

        Ok(Self {
            source: style.to_string(),
            prefix: style[..go_at].to_string(),
            first: WordCase::from_marker(go).ok_or_else(invalid)?,
            separator: style[go_at + GO_MARKER.len()..zero_at].to_string(),
            rest: WordCase::from_marker(zero).ok_or_else(invalid)?,
            suffix: style[zero_at + ZERO_MARKER.len()..].to_string(),
        })
    }
}

impl fmt::Display for NamingStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Format `identifier` with the naming `style`.
///
/// Pure: the same inputs always give the same output. Fails with
/// [`Error::InvalidStyle`] when the style cannot be parsed.
pub fn format_file_name(style: &str, identifier: &str) -> Result<String> {
    Ok(style.parse::<NamingStyle>()?.format(identifier))
}

/// Splits an identifier into lowercase words.
///
/// Word boundaries are `_`, `-`, `.`, whitespace, a lowercase or digit to
/// uppercase transition, and the last capital of an acronym followed by a
/// lowercase letter (`HTTPServer` becomes `http`, `server`).
pub fn split_words(identifier: &str) -> Vec<String> {
    let chars: Vec<char> = identifier.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }

        current.extend(ch.to_lowercase());
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Uppercases the first character and leaves the rest untouched
pub fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Lowercases the first character and leaves the rest untouched
pub fn untitle(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Converts any identifier to UpperCamelCase (`get_user` → `GetUser`)
pub fn to_camel_case(s: &str) -> String {
    split_words(s).iter().map(|word| title(word)).collect()
}
