use serde::{Deserialize, Serialize};

/// How many matches are kept for display, most-relevant-first as returned
/// by the provider.
pub const MAX_SEARCH_RESULTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "1. symbol")]
    pub symbol: String,

    #[serde(rename = "2. name")]
    pub name: String,

    #[serde(rename = "4. region", default)]
    pub region: String,

    #[serde(rename = "8. currency", default)]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SymbolSearchResponse {
    #[serde(rename = "bestMatches", default)]
    pub best_matches: Vec<SearchResult>,
}

impl SymbolSearchResponse {
    /// Provider order preserved; anything past the display cap is dropped.
    pub fn into_results(self) -> Vec<SearchResult> {
        let mut out = self.best_matches;
        out.truncate(MAX_SEARCH_RESULTS);
        out
    }
}

/// Display glyph for an ISO-4217 currency code, when we know one.
pub fn currency_symbol(code: &str) -> Option<&'static str> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "AUD" | "CAD" | "HKD" | "NZD" | "SGD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" | "GBX" => Some("£"),
        "JPY" | "CNY" => Some("¥"),
        "INR" => Some("₹"),
        "KRW" => Some("₩"),
        "CHF" => Some("CHF"),
        "SEK" | "NOK" | "DKK" => Some("kr"),
        "BRL" => Some("R$"),
        "RUB" => Some("₽"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches_json(n: usize) -> serde_json::Value {
        let best_matches: Vec<_> = (1..=n)
            .map(|i| {
                json!({
                    "1. symbol": format!("SYM{i}"),
                    "2. name": format!("Company {i}"),
                    "3. type": "Equity",
                    "4. region": "United States",
                    "8. currency": "USD",
                })
            })
            .collect();
        json!({ "bestMatches": best_matches })
    }

    #[test]
    fn parses_provider_field_names() {
        let parsed: SymbolSearchResponse = serde_json::from_value(matches_json(2)).unwrap();
        let results = parsed.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].symbol, "SYM1");
        assert_eq!(results[0].name, "Company 1");
        assert_eq!(results[0].region, "United States");
        assert_eq!(results[0].currency, "USD");
    }

    #[test]
    fn caps_at_five_in_provider_order() {
        let parsed: SymbolSearchResponse = serde_json::from_value(matches_json(8)).unwrap();
        let results = parsed.into_results();
        assert_eq!(results.len(), MAX_SEARCH_RESULTS);
        assert_eq!(results[0].symbol, "SYM1");
        assert_eq!(results[4].symbol, "SYM5");
    }

    #[test]
    fn no_matches_is_an_empty_list() {
        let parsed: SymbolSearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.into_results().is_empty());
    }

    #[test]
    fn currency_symbols_fall_back_to_none() {
        assert_eq!(currency_symbol("USD"), Some("$"));
        assert_eq!(currency_symbol("eur"), Some("€"));
        assert_eq!(currency_symbol("XYZ"), None);
    }
}
