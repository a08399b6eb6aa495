//! # Template Engine
//!
//! Typed template substitution against a market snapshot.
//!
//! Responsibilities:
//! - Parse `F{..}` / `S{..}` / `E{..}` placeholder tokens out of a template
//! - Resolve each token independently against a `MarketSnapshot`
//! - Humanize currency values and map change percentages to sentiment markers
//!
//! `resolve` is total: unknown paths and wrong-typed values degrade to empty
//! substitution (or the neutral marker for sentiment tokens), never an error.
//! The engine holds no state, so concurrent callers need no coordination.

mod humanize;
mod sentiment;
mod token;

pub use humanize::humanize_usd;
pub use sentiment::sentiment_emoji;
pub use token::{Token, TokenKind};

use contracts::MarketSnapshot;

/// Resolve every placeholder token in `template` against `snapshot`.
///
/// Text outside tokens is passed through verbatim. Resolution is per-token
/// independent: one unresolvable token never affects its siblings.
pub fn resolve(template: &str, snapshot: &MarketSnapshot) -> String {
    token::pattern()
        .replace_all(template, |caps: &regex::Captures<'_>| {
            match Token::parse(&caps[0]) {
                Some(token) => resolve_token(&token, snapshot),
                // Not a recognized token; leave the raw text in place
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Resolve a single token; always produces a string, possibly empty.
fn resolve_token(token: &Token, snapshot: &MarketSnapshot) -> String {
    match token.kind {
        TokenKind::Currency => match snapshot.number_at(&token.path) {
            Some(value) => humanize_usd(value),
            // Non-numeric string leaves render verbatim; anything else is empty
            None => snapshot.text_at(&token.path).unwrap_or_default(),
        },
        TokenKind::Raw => snapshot.text_at(&token.path).unwrap_or_default(),
        TokenKind::Sentiment => {
            // Missing or non-numeric defaults the sentiment to zero
            let value = snapshot.number_at(&token.path).unwrap_or(0.0);
            sentiment_emoji(value).to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot() -> MarketSnapshot {
        MarketSnapshot::new(json!({
            "a": { "b": 1234.5, "c": 20, "d": "ok" },
            "quoted": { "price": "0.042", "junk": "n/a" },
            "nested": { "obj": { "x": 1 } }
        }))
    }

    #[test]
    fn test_end_to_end_template() {
        let out = resolve("F{a.b} E{a.c} S{a.d}", &snapshot());
        assert_eq!(out, "$1.23K 🚀🚀🚀 ok");
    }

    #[test]
    fn test_unknown_path_is_empty_and_isolated() {
        let out = resolve("F{missing.path} S{a.d}", &snapshot());
        assert_eq!(out, " ok");
    }

    #[test]
    fn test_currency_parses_quoted_numbers() {
        assert_eq!(resolve("F{quoted.price}", &snapshot()), "$0.042");
    }

    #[test]
    fn test_currency_keeps_unparsable_string() {
        assert_eq!(resolve("F{quoted.junk}", &snapshot()), "n/a");
    }

    #[test]
    fn test_raw_renders_numbers_textually() {
        assert_eq!(resolve("S{a.c}", &snapshot()), "20");
    }

    #[test]
    fn test_raw_on_branch_node_is_empty() {
        assert_eq!(resolve("S{nested.obj}", &snapshot()), "");
    }

    #[test]
    fn test_sentiment_missing_defaults_neutral() {
        assert_eq!(resolve("E{missing}", &snapshot()), "🎱");
        assert_eq!(resolve("E{quoted.junk}", &snapshot()), "🎱");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(resolve("no tokens here", &snapshot()), "no tokens here");
        // Unknown tag letters are not tokens
        assert_eq!(resolve("A{a.b}", &snapshot()), "A{a.b}");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let snap = snapshot();
        let template = "E{a.c} S{a.d} F{a.b} F{quoted.price}";
        assert_eq!(resolve(template, &snap), resolve(template, &snap));
    }
}
