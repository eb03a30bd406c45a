use crate::error::ParseError;
use crate::models::{Digest, MatchStatus};

/// Pull an expected hash out of checksum-file text. Accepted shapes:
/// - single hex line
/// - "filename <hash>"
/// - "hash  filename"
pub fn parse_first_hash_from_text(s: &str) -> Option<String> {
    for line in s.lines() {
        let t = line.trim();
        if t.is_empty() || t.starts_with('#') {
            continue;
        }
        let tokens: Vec<&str> = t.split_whitespace().collect();
        if tokens.len() == 1 {
            return Some(tokens[0].to_string());
        }
        // sha*sum writes "hash *filename" for binary mode
        for &tok in &tokens {
            let tok = tok.trim_start_matches('*');
            if tok.len() >= 16 && tok.chars().all(|c| c.is_ascii_hexdigit()) {
                return Some(tok.to_string());
            }
        }
    }
    None
}

/// Compare a computed digest with an already parsed expected one.
pub fn match_status(expected: Option<&Digest>, computed: Option<&Digest>) -> MatchStatus {
    match (expected, computed) {
        (Some(expected), Some(computed)) if expected == computed => MatchStatus::Match,
        (Some(_), Some(_)) => MatchStatus::Mismatch,
        _ => MatchStatus::Unchecked,
    }
}

/// Compare user input against a computed digest. Blank input means "nothing to check".
pub fn compare_expected(
    expected: &str,
    computed: Option<&Digest>,
) -> Result<MatchStatus, ParseError> {
    let expected = expected.trim();
    if expected.is_empty() {
        return Ok(MatchStatus::Unchecked);
    }
    let expected = Digest::from_hex(expected)?;
    Ok(match_status(Some(&expected), computed))
}
