pub mod alpha_vantage;
pub mod finnhub;

use crate::domain::news::NewsItem;
use crate::domain::quote::StockQuote;
use crate::domain::search::SearchResult;
use crate::domain::series::{ChartSeries, Interval};
use crate::domain::trending::TrendingStock;
use anyhow::Result;

#[async_trait::async_trait]
pub trait SymbolSearch: Send + Sync {
    /// Up to 5 matches in provider order. Empty keywords and provider-side
    /// no-matches both yield an empty list.
    async fn search_symbols(&self, keywords: &str) -> Result<Vec<SearchResult>>;
}

#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    async fn global_quote(&self, symbol: &str) -> Result<StockQuote>;
}

#[async_trait::async_trait]
pub trait SeriesSource: Send + Sync {
    async fn time_series(&self, symbol: &str, interval: Interval) -> Result<ChartSeries>;
}

#[async_trait::async_trait]
pub trait TrendingSource: Send + Sync {
    /// One listing call truncated to `batch_size`, then a quote+profile
    /// join per symbol. All sub-calls must succeed or the batch fails.
    async fn trending_batch(&self, batch_size: usize) -> Result<Vec<TrendingStock>>;
}

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    async fn news_feed(&self) -> Result<Vec<NewsItem>>;
}
