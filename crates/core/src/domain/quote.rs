use serde::{Deserialize, Serialize};

/// The provider's `Global Quote` object, kept wholesale with its numbered
/// field names. Replaced on every fetch; missing fields deserialize to
/// empty strings and surface as blank/zero display values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockQuote {
    #[serde(rename = "01. symbol", default)]
    pub symbol: String,

    #[serde(rename = "02. open", default)]
    pub open: String,

    #[serde(rename = "03. high", default)]
    pub high: String,

    #[serde(rename = "04. low", default)]
    pub low: String,

    #[serde(rename = "05. price", default)]
    pub price: String,

    #[serde(rename = "06. volume", default)]
    pub volume: String,

    #[serde(rename = "07. latest trading day", default)]
    pub latest_trading_day: String,

    #[serde(rename = "08. previous close", default)]
    pub previous_close: String,

    #[serde(rename = "09. change", default)]
    pub change: String,

    #[serde(rename = "10. change percent", default)]
    pub change_percent: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    pub global_quote: Option<StockQuote>,
}

impl StockQuote {
    pub fn price_value(&self) -> Option<f64> {
        parse_num(&self.price)
    }

    /// The provider formats percent change as e.g. "1.2345%".
    pub fn change_percent_value(&self) -> Option<f64> {
        parse_num(self.change_percent.trim().trim_end_matches('%'))
    }

    pub fn tone(&self) -> PriceTone {
        PriceTone::from_change_percent(self.change_percent_value().unwrap_or(0.0))
    }
}

/// Direction of the latest percent change, used to restyle the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTone {
    Positive,
    Negative,
    Flat,
}

impl PriceTone {
    pub fn from_change_percent(change_percent: f64) -> Self {
        if change_percent > 0.0 {
            PriceTone::Positive
        } else if change_percent < 0.0 {
            PriceTone::Negative
        } else {
            PriceTone::Flat
        }
    }
}

fn parse_num(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>().ok()
}
