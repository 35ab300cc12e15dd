use valuation_core::{FetchError, FinancialSnapshot};

/// Pull the JSON document out of a ```json fenced block, if the provider wrapped it.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(start) = trimmed.find("```json") {
        let rest = &trimmed[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim();
        }
    }
    trimmed
}

/// Whether an `error` field is set. Null, `false`, zero and empty strings count as unset.
fn is_error_set(value: &serde_json::Value) -> bool {
    use serde_json::Value;
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse and validate a provider response body into a snapshot.
///
/// A body carrying a set `error` field means the provider could not resolve the
/// ticker; anything that is not a complete snapshot is malformed data.
pub fn parse_snapshot_payload(ticker: &str, text: &str) -> Result<FinancialSnapshot, FetchError> {
    let body = strip_code_fence(text);

    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!("Failed to parse snapshot response for {}: {}", ticker, e);
        FetchError::MalformedData(format!("response for {} is not valid JSON: {}", ticker, e))
    })?;

    if value.get("error").is_some_and(is_error_set) {
        return Err(FetchError::InvalidTicker(ticker.to_string()));
    }

    let mut snapshot: FinancialSnapshot = serde_json::from_value(value).map_err(|e| {
        FetchError::MalformedData(format!("invalid snapshot for {}: {}", ticker, e))
    })?;

    snapshot.sort_history();
    snapshot.validate()?;
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME: &str = include_str!("../../../snapshots/ACME.json");

    #[test]
    fn test_parses_and_sorts_history() {
        let snapshot = parse_snapshot_payload("ACME", ACME).unwrap();
        assert_eq!(snapshot.company_name, "Acme Industrial Corp");
        let years: Vec<i32> = snapshot.historical_eps.iter().map(|e| e.year).collect();
        assert_eq!(years, vec![2022, 2023, 2024]);
        assert!(snapshot.historical_prices.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(snapshot.grounding_chunks.len(), 1);
    }

    #[test]
    fn test_strips_fenced_block() {
        let wrapped = format!("Here is the data:\n```json\n{}\n```\n", ACME);
        let snapshot = parse_snapshot_payload("ACME", &wrapped).unwrap();
        assert_eq!(snapshot.ticker, "ACME");
    }

    #[test]
    fn test_error_field_is_invalid_ticker() {
        let body = r#"{"ticker": "ZZZZ", "error": "Invalid Ticker or insufficient data"}"#;
        assert_eq!(
            parse_snapshot_payload("ZZZZ", body),
            Err(FetchError::InvalidTicker("ZZZZ".to_string()))
        );
    }

    #[test]
    fn test_unset_error_field_is_ignored() {
        for placeholder in [serde_json::json!(false), serde_json::json!(""), serde_json::json!(0)] {
            let mut value: serde_json::Value = serde_json::from_str(ACME).unwrap();
            value["error"] = placeholder.clone();
            let snapshot = parse_snapshot_payload("ACME", &value.to_string())
                .unwrap_or_else(|e| panic!("error = {} rejected: {:?}", placeholder, e));
            assert_eq!(snapshot.ticker, "ACME");
        }
    }

    #[test]
    fn test_set_error_field_wins_over_data() {
        let mut value: serde_json::Value = serde_json::from_str(ACME).unwrap();
        value["error"] = serde_json::json!(true);
        assert_eq!(
            parse_snapshot_payload("ACME", &value.to_string()),
            Err(FetchError::InvalidTicker("ACME".to_string()))
        );
    }

    #[test]
    fn test_non_json_is_malformed() {
        let result = parse_snapshot_payload("ACME", "<html>Bad Gateway</html>");
        assert!(matches!(result, Err(FetchError::MalformedData(_))));
    }

    #[test]
    fn test_missing_field_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(ACME).unwrap();
        value.as_object_mut().unwrap().remove("sharesOutstanding");
        match parse_snapshot_payload("ACME", &value.to_string()) {
            Err(FetchError::MalformedData(msg)) => assert!(msg.contains("sharesOutstanding")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let mut value: serde_json::Value = serde_json::from_str(ACME).unwrap();
        value["roa"]["currentYear"] = serde_json::json!("ten percent");
        let result = parse_snapshot_payload("ACME", &value.to_string());
        assert!(matches!(result, Err(FetchError::MalformedData(_))));
    }
}
