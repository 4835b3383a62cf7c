use crate::config::Settings;
use crate::domain::news::{NewsFeedResponse, NewsItem};
use crate::domain::quote::{GlobalQuoteResponse, StockQuote};
use crate::domain::search::{SearchResult, SymbolSearchResponse};
use crate::domain::series::{parse_series_payload, ChartSeries, Interval};
use crate::providers::{NewsSource, QuoteSource, SeriesSource, SymbolSearch};
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

// Search and quote go through the RapidAPI gateway; time series and the
// news feed hit the Alpha Vantage base directly with a query-string key.
const DEFAULT_RAPIDAPI_BASE_URL: &str = "https://alpha-vantage.p.rapidapi.com";
const DEFAULT_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    rapidapi_base_url: String,
    vantage_base_url: String,
    rapidapi_host: String,
    // Distinct keys for the search and quote endpoints.
    search_key: String,
    quote_key: String,
    vantage_api_key: String,
}

impl AlphaVantageClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let rapidapi_host = settings.require_rapidapi_host()?.to_string();
        let search_key = settings.require_rapidapi_search_key()?.to_string();
        let quote_key = settings.require_rapidapi_quote_key()?.to_string();
        let vantage_api_key = settings.require_alpha_vantage_api_key()?.to_string();

        let rapidapi_base_url = std::env::var("RAPIDAPI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_RAPIDAPI_BASE_URL.to_string());
        let vantage_base_url = std::env::var("ALPHAVANTAGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_VANTAGE_BASE_URL.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            rapidapi_base_url,
            vantage_base_url,
            rapidapi_host,
            search_key,
            quote_key,
            vantage_api_key,
        })
    }

    fn rapidapi_headers(&self, key: &str) -> anyhow::Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-rapidapi-host", HeaderValue::from_str(&self.rapidapi_host)?);
        headers.insert("x-rapidapi-key", HeaderValue::from_str(key)?);
        Ok(headers)
    }

    async fn get_json(
        &self,
        url: String,
        headers: HeaderMap,
        params: &[(&str, &str)],
        what: &str,
    ) -> anyhow::Result<Value> {
        let res = self
            .http
            .get(url)
            .headers(headers)
            .query(params)
            .send()
            .await
            .with_context(|| format!("{what} request failed"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {what} response"))?;
        if !status.is_success() {
            anyhow::bail!("{what} HTTP {status}: {text}");
        }

        serde_json::from_str::<Value>(&text)
            .with_context(|| format!("{what} response is not valid JSON: {text}"))
    }

    pub async fn search_symbols(&self, keywords: &str) -> anyhow::Result<Vec<SearchResult>> {
        let url = format!("{}/query", self.rapidapi_base_url.trim_end_matches('/'));
        let headers = self.rapidapi_headers(&self.search_key)?;
        let raw = self
            .get_json(
                url,
                headers,
                &[("function", "SYMBOL_SEARCH"), ("keywords", keywords)],
                "symbol search",
            )
            .await?;

        let parsed: SymbolSearchResponse =
            serde_json::from_value(raw).context("failed to parse symbol search response")?;
        Ok(parsed.into_results())
    }

    pub async fn global_quote(&self, symbol: &str) -> anyhow::Result<StockQuote> {
        let url = format!("{}/query", self.rapidapi_base_url.trim_end_matches('/'));
        let headers = self.rapidapi_headers(&self.quote_key)?;
        let raw = self
            .get_json(
                url,
                headers,
                &[("function", "GLOBAL_QUOTE"), ("symbol", symbol)],
                "global quote",
            )
            .await?;

        let parsed: GlobalQuoteResponse =
            serde_json::from_value(raw).context("failed to parse global quote response")?;
        parsed
            .global_quote
            .context("provider response has no Global Quote object")
    }

    pub async fn time_series(
        &self,
        symbol: &str,
        interval: Interval,
    ) -> anyhow::Result<ChartSeries> {
        let url = format!("{}/query", self.vantage_base_url.trim_end_matches('/'));

        let mut params = vec![
            ("function", interval.function_name()),
            ("symbol", symbol),
            ("apikey", self.vantage_api_key.as_str()),
        ];
        if let Some(sub) = interval.intraday_interval() {
            params.push(("interval", sub));
        }

        let raw = self
            .get_json(url, HeaderMap::new(), &params, "time series")
            .await?;
        parse_series_payload(&raw, interval)
    }

    pub async fn news_feed(&self) -> anyhow::Result<Vec<NewsItem>> {
        let url = format!("{}/query", self.vantage_base_url.trim_end_matches('/'));
        let raw = self
            .get_json(
                url,
                HeaderMap::new(),
                &[
                    ("function", "NEWS_SENTIMENT"),
                    ("apikey", self.vantage_api_key.as_str()),
                ],
                "news feed",
            )
            .await?;

        let parsed: NewsFeedResponse =
            serde_json::from_value(raw).context("failed to parse news feed response")?;
        Ok(parsed.feed)
    }
}

#[async_trait::async_trait]
impl SymbolSearch for AlphaVantageClient {
    async fn search_symbols(&self, keywords: &str) -> anyhow::Result<Vec<SearchResult>> {
        AlphaVantageClient::search_symbols(self, keywords).await
    }
}

#[async_trait::async_trait]
impl QuoteSource for AlphaVantageClient {
    async fn global_quote(&self, symbol: &str) -> anyhow::Result<StockQuote> {
        AlphaVantageClient::global_quote(self, symbol).await
    }
}

#[async_trait::async_trait]
impl SeriesSource for AlphaVantageClient {
    async fn time_series(&self, symbol: &str, interval: Interval) -> anyhow::Result<ChartSeries> {
        AlphaVantageClient::time_series(self, symbol, interval).await
    }
}

#[async_trait::async_trait]
impl NewsSource for AlphaVantageClient {
    async fn news_feed(&self) -> anyhow::Result<Vec<NewsItem>> {
        AlphaVantageClient::news_feed(self).await
    }
}
