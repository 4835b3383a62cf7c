pub mod auth;
pub mod domain;
pub mod providers;
pub mod time;
pub mod view;

pub mod config {
    use anyhow::Context;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub rapidapi_host: Option<String>,
        pub rapidapi_search_key: Option<String>,
        pub rapidapi_quote_key: Option<String>,
        pub alpha_vantage_api_key: Option<String>,
        pub finnhub_token: Option<String>,
        pub auth_base_url: Option<String>,
        pub auth_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                rapidapi_host: std::env::var("RAPIDAPI_HOST").ok(),
                rapidapi_search_key: std::env::var("RAPIDAPI_SEARCH_KEY").ok(),
                rapidapi_quote_key: std::env::var("RAPIDAPI_QUOTE_KEY").ok(),
                alpha_vantage_api_key: std::env::var("ALPHAVANTAGE_API_KEY").ok(),
                finnhub_token: std::env::var("FINNHUB_TOKEN").ok(),
                auth_base_url: std::env::var("AUTH_BASE_URL").ok(),
                auth_api_key: std::env::var("AUTH_API_KEY").ok(),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_rapidapi_host(&self) -> anyhow::Result<&str> {
            self.rapidapi_host
                .as_deref()
                .context("RAPIDAPI_HOST is required")
        }

        pub fn require_rapidapi_search_key(&self) -> anyhow::Result<&str> {
            self.rapidapi_search_key
                .as_deref()
                .context("RAPIDAPI_SEARCH_KEY is required")
        }

        pub fn require_rapidapi_quote_key(&self) -> anyhow::Result<&str> {
            self.rapidapi_quote_key
                .as_deref()
                .context("RAPIDAPI_QUOTE_KEY is required")
        }

        pub fn require_alpha_vantage_api_key(&self) -> anyhow::Result<&str> {
            self.alpha_vantage_api_key
                .as_deref()
                .context("ALPHAVANTAGE_API_KEY is required")
        }

        pub fn require_finnhub_token(&self) -> anyhow::Result<&str> {
            self.finnhub_token
                .as_deref()
                .context("FINNHUB_TOKEN is required")
        }

        pub fn require_auth_api_key(&self) -> anyhow::Result<&str> {
            self.auth_api_key
                .as_deref()
                .context("AUTH_API_KEY is required")
        }
    }
}
