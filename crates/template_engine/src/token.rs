//! Placeholder token grammar
//!
//! A token is a one-character type tag followed by a brace-delimited dotted
//! path: `F{a.b.c}`, `S{name}`, `E{change.m5}`. Tokens are parsed out of the
//! template at formatting time and never persisted.

use std::sync::OnceLock;

use regex::Regex;

/// Token type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `F` - humanized currency value
    Currency,
    /// `S` - raw string form
    Raw,
    /// `E` - sentiment marker derived from a numeric change
    Sentiment,
}

impl TokenKind {
    /// Map a tag character to its kind
    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'F' => Some(Self::Currency),
            'S' => Some(Self::Raw),
            'E' => Some(Self::Sentiment),
            _ => None,
        }
    }
}

/// A parsed placeholder token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Dotted path into the snapshot tree
    pub path: String,
}

impl Token {
    /// Parse a full token match (`F{a.b}`) into a `Token`.
    ///
    /// Returns `None` if the text is not a well-formed token.
    pub fn parse(text: &str) -> Option<Self> {
        let mut chars = text.chars();
        let kind = TokenKind::from_tag(chars.next()?)?;
        let rest = chars.as_str();
        let path = rest.strip_prefix('{')?.strip_suffix('}')?;
        Some(Self {
            kind,
            path: path.to_string(),
        })
    }
}

/// Compiled token pattern, built once per process.
///
/// Paths may be empty (`F{}`); an empty path resolves to nothing, which is
/// the required empty substitution.
pub fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[FSE]\{[^{}]*\}").expect("token pattern is valid"))
}
