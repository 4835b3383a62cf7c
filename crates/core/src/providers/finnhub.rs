use crate::config::Settings;
use crate::domain::trending::TrendingStock;
use crate::providers::TrendingSource;
use anyhow::Context;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EXCHANGE: &str = "US";

// The listing is truncated to this many symbols before the per-symbol
// joins are issued, bounding fan-out per tick.
const DEFAULT_BATCH_SIZE: usize = 5;
const DEFAULT_POLL_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct FinnhubClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    exchange: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListedSymbol {
    #[serde(default)]
    pub symbol: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FinnhubQuote {
    #[serde(default)]
    c: f64,

    // Null on symbols with no previous close.
    #[serde(default)]
    dp: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct CompanyProfile {
    #[serde(default)]
    name: String,

    #[serde(rename = "marketCapitalization", default)]
    market_capitalization: f64,
}

impl FinnhubClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let token = settings.require_finnhub_token()?.to_string();

        let base_url =
            std::env::var("FINNHUB_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let exchange = std::env::var("TRENDING_EXCHANGE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EXCHANGE.to_string());

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build trending http client")?;

        Ok(Self {
            http,
            base_url,
            token,
            exchange,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        what: &str,
    ) -> anyhow::Result<T> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("token", self.token.as_str()));

        let res = self
            .http
            .get(url)
            .query(&query)
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

        serde_json::from_str::<T>(&text)
            .with_context(|| format!("failed to parse {what} response: {text}"))
    }

    pub async fn stock_symbols(&self) -> anyhow::Result<Vec<ListedSymbol>> {
        self.get_json(
            "/stock/symbol",
            &[("exchange", self.exchange.as_str())],
            "symbol listing",
        )
        .await
    }

    async fn quote(&self, symbol: &str) -> anyhow::Result<FinnhubQuote> {
        self.get_json("/quote", &[("symbol", symbol)], "trending quote")
            .await
    }

    async fn profile(&self, symbol: &str) -> anyhow::Result<CompanyProfile> {
        self.get_json("/stock/profile2", &[("symbol", symbol)], "company profile")
            .await
    }
}

#[async_trait::async_trait]
impl TrendingSource for FinnhubClient {
    async fn trending_batch(&self, batch_size: usize) -> anyhow::Result<Vec<TrendingStock>> {
        let mut listed = self.stock_symbols().await?;
        listed.truncate(batch_size);

        let mut out = Vec::with_capacity(listed.len());
        for stock in &listed {
            // Quote and profile are joined per symbol; `?` makes the whole
            // batch all-or-nothing for this tick.
            let (quote, profile) =
                tokio::try_join!(self.quote(&stock.symbol), self.profile(&stock.symbol))?;

            out.push(TrendingStock {
                symbol: stock.symbol.clone(),
                name: profile.name,
                price: quote.c,
                percent_change: quote.dp.unwrap_or(0.0),
                market_cap: profile.market_capitalization,
            });
        }

        Ok(out)
    }
}

#[derive(Debug, Clone)]
pub struct TrendingConfig {
    pub poll_period: Duration,
    pub batch_size: usize,
}

impl Default for TrendingConfig {
    fn default() -> Self {
        Self {
            poll_period: Duration::from_secs(DEFAULT_POLL_SECS),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl TrendingConfig {
    pub fn from_env() -> Self {
        let mut out = Self::default();

        if let Ok(s) = std::env::var("TRENDING_POLL_SECS") {
            if let Ok(n) = s.parse::<u64>() {
                out.poll_period = Duration::from_secs(n);
            }
        }

        if let Ok(s) = std::env::var("TRENDING_BATCH_SIZE") {
            if let Ok(n) = s.parse::<usize>() {
                out.batch_size = n;
            }
        }

        out
    }
}

/// Repeating trending poll: fires once immediately, then on every period
/// tick. Successful batches are published to a watch channel; a failed
/// tick publishes nothing, so consumers keep the previous batch. Stopping
/// (or dropping) the stream releases the timer and the task.
pub struct TrendingStream {
    latest: watch::Receiver<Vec<TrendingStock>>,
    shutdown: watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

impl TrendingStream {
    pub fn spawn(source: Arc<dyn TrendingSource>, config: TrendingConfig) -> Self {
        let (tx, rx) = watch::channel(Vec::new());
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.poll_period);
            let mut tick = 0u64;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {}
                    _ = shutdown_rx.changed() => break,
                }

                tick += 1;
                match source.trending_batch(config.batch_size).await {
                    Ok(batch) => {
                        if tx.send(batch).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(tick, error = %err, "trending poll failed; keeping previous batch");
                    }
                }
            }
        });

        Self {
            latest: rx,
            shutdown,
            task,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<TrendingStock>> {
        self.latest.clone()
    }

    /// Teardown: no further polls run once this returns.
    pub async fn stop(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }
}
