//! Watchlist parsing.
//!
//! The configured channel list is a single space-separated string. Parsing
//! normalizes it into the canonical form used everywhere downstream:
//! lowercase logins, first occurrence wins, runs of whitespace treated as
//! one separator.

/// Parse the raw channel-list string into ordered, distinct, lowercase
/// logins. Malformed or empty input yields an empty list; there is no
/// error case.
pub fn parse(raw: &str) -> Vec<String> {
    let mut logins: Vec<String> = Vec::new();

    for token in raw.split_whitespace() {
        let login = token.to_lowercase();
        if !logins.contains(&login) {
            logins.push(login);
        }
    }

    logins
}
