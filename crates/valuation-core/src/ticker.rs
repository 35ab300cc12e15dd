use crate::FetchError;

/// Canonical form of a ticker symbol: trimmed and upper-cased.
///
/// Only letters, digits, '.' and '-' are accepted (`BRK.B`, `RDS-A`), so the
/// symbol is safe to embed in URLs and file names.
pub fn normalize_ticker(raw: &str) -> Result<String, FetchError> {
    let ticker = raw.trim().to_uppercase();
    let valid = !ticker.is_empty()
        && ticker.len() <= 12
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !ticker.starts_with('.');
    if valid {
        Ok(ticker)
    } else {
        Err(FetchError::InvalidTicker(raw.trim().to_string()))
    }
}
