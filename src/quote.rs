//! Shell-style quoting of command lines for display

use std::sync::OnceLock;
use regex::Regex;

fn plain_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_=+~:,./-]+$").expect("static pattern")
    })
}

/// Quote a single token for display.
///
/// Tokens made only of `[A-Za-z0-9-_=+~:,./]` are returned as is. Anything
/// else is wrapped in single quotes, or in double quotes when the token
/// itself contains a single quote. No escaping is done beyond that, so a
/// token with both quote kinds renders ambiguously.
pub fn quote_token(token: &str) -> String {
    if token.is_empty() {
        return "''".to_string();
    }
    if plain_token().is_match(token) {
        token.to_string()
    } else if token.contains('\'') {
        format!("\"{}\"", token)
    } else {
        format!("'{}'", token)
    }
}

/// Quote every token and join them with single spaces.
pub fn quote_command<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens.iter()
        .map(|t| quote_token(t.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}
