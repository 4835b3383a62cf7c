use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickboard_core::auth::AuthClient;
use tickboard_core::config::Settings;
use tickboard_core::domain::series::Interval;
use tickboard_core::providers::alpha_vantage::AlphaVantageClient;
use tickboard_core::providers::finnhub::{FinnhubClient, TrendingConfig, TrendingStream};
use tickboard_core::view::carousel::{NewsCarousel, ROTATE_PERIOD};
use tickboard_core::view::dashboard::{DashboardController, DashboardState};
use tickboard_core::view::movers::MoversBoard;

mod routes;

#[derive(Debug, Parser)]
#[command(name = "tickboard")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search ticker symbols by keywords.
    Search { keywords: String },

    /// Show the latest quote for a symbol.
    Quote { symbol: String },

    /// Chart a symbol's price history.
    Chart {
        symbol: String,

        /// 1min, 30min, Daily, Weekly or Monthly; unknown values chart Daily.
        #[arg(long, default_value = "Daily")]
        interval: String,
    },

    /// Watch the trending market movers.
    Movers {
        /// Number of successful polling ticks to render before stopping.
        #[arg(long, default_value_t = 3)]
        ticks: u32,

        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Show the headline news carousel.
    News {
        /// Carousel windows to render on the rotate cadence.
        #[arg(long, default_value_t = 2)]
        cycles: u32,
    },

    /// Create an account with the hosted auth backend.
    Register { email: String, password: String },

    /// Sign in against the hosted auth backend.
    Login { email: String, password: String },

    /// Run the signed-in dashboard flow end to end.
    Dashboard {
        email: String,
        password: String,
        keywords: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = match args.command {
        Command::Search { keywords } => cmd_search(&settings, &keywords).await,
        Command::Quote { symbol } => cmd_quote(&settings, &symbol).await,
        Command::Chart { symbol, interval } => cmd_chart(&settings, &symbol, &interval).await,
        Command::Movers { ticks, batch_size } => cmd_movers(&settings, ticks, batch_size).await,
        Command::News { cycles } => cmd_news(&settings, cycles).await,
        Command::Register { email, password } => cmd_register(&settings, &email, &password).await,
        Command::Login { email, password } => cmd_login(&settings, &email, &password).await,
        Command::Dashboard {
            email,
            password,
            keywords,
        } => cmd_dashboard(&settings, &email, &password, &keywords).await,
    };

    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

async fn cmd_search(settings: &Settings, keywords: &str) -> anyhow::Result<()> {
    let client = AlphaVantageClient::from_settings(settings)?;
    let results = client.search_symbols(keywords).await?;

    if results.is_empty() {
        println!("no match for this symbol");
        return Ok(());
    }
    for r in &results {
        println!("{:<8} {:<32} {:<16} {}", r.symbol, r.name, r.region, r.currency);
    }
    Ok(())
}

async fn cmd_quote(settings: &Settings, symbol: &str) -> anyhow::Result<()> {
    let client = AlphaVantageClient::from_settings(settings)?;
    let quote = client.global_quote(symbol).await?;

    println!("{} @ {} ({})", quote.symbol, quote.price, quote.latest_trading_day);
    println!("open {}  high {}  low {}", quote.open, quote.high, quote.low);
    println!(
        "change {} ({})  previous close {}  volume {}",
        quote.change, quote.change_percent, quote.previous_close, quote.volume
    );
    Ok(())
}

async fn cmd_chart(settings: &Settings, symbol: &str, interval: &str) -> anyhow::Result<()> {
    let client = Arc::new(AlphaVantageClient::from_settings(settings)?);
    let mut controller = DashboardController::new(client.clone(), client.clone(), client);

    controller
        .select(symbol, Interval::parse_or_daily(interval))
        .await;
    print_detail(&controller.state);
    Ok(())
}

fn print_detail(state: &DashboardState) {
    if state.chart.data.is_empty() {
        println!("no chart data");
        return;
    }

    println!(
        "{} ({})  last refreshed {}",
        state.selected_symbol, state.selected_interval, state.last_refreshed
    );
    for (label, close) in state.chart.categories.iter().zip(&state.chart.data) {
        println!("{label:>18}  {close:>10.2}");
    }

    if let Some(quote) = &state.quote {
        println!(
            "price {}{}  change {} ({})",
            state.currency_symbol(),
            quote.price,
            quote.change,
            quote.change_percent
        );
    }
    println!("line color {}", state.chart.palette.line);
}

async fn cmd_movers(
    settings: &Settings,
    ticks: u32,
    batch_size: Option<usize>,
) -> anyhow::Result<()> {
    let client = FinnhubClient::from_settings(settings)?;

    let mut config = TrendingConfig::from_env();
    if let Some(n) = batch_size {
        config.batch_size = n;
    }
    let rows = config.batch_size;

    let stream = TrendingStream::spawn(Arc::new(client), config);
    let mut rx = stream.subscribe();
    let mut board = MoversBoard::new();

    for tick in 1..=ticks {
        if rx.changed().await.is_err() {
            break;
        }
        board.replace(rx.borrow_and_update().clone());

        println!("-- tick {tick} --");
        print_board(&board, rows);
    }

    stream.stop().await;
    Ok(())
}

fn print_board(board: &MoversBoard, rows: usize) {
    for i in 0..rows {
        println!(
            "{:<6} {:<24} {:>10.2} {:>7.2}% {:>14}",
            board.symbol(i),
            board.name(i),
            board.price(i),
            board.percent_change(i),
            board.market_cap_label(i)
        );
    }
}

async fn cmd_news(settings: &Settings, cycles: u32) -> anyhow::Result<()> {
    let client = AlphaVantageClient::from_settings(settings)?;
    let feed = client.news_feed().await?;
    tracing::info!(items = feed.len(), "news feed loaded");

    let rotate = std::env::var("NEWS_ROTATE_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(ROTATE_PERIOD);

    let mut carousel = NewsCarousel::new(feed);
    print_window(&carousel);
    for _ in 1..cycles {
        tokio::time::sleep(rotate).await;
        carousel.next();
        print_window(&carousel);
    }
    Ok(())
}

fn print_window(carousel: &NewsCarousel) {
    let start = carousel.current_index();
    println!(
        "-- news {}..{} of {} --",
        start,
        start + carousel.window().len(),
        carousel.len()
    );
    for item in carousel.window() {
        println!("[{}] {}", item.source, item.title);
        if !item.url.is_empty() {
            println!("    {}", item.url);
        }
    }
}

async fn cmd_register(settings: &Settings, email: &str, password: &str) -> anyhow::Result<()> {
    let auth = AuthClient::from_settings(settings)?;
    let session = auth
        .sign_up(email, password)
        .await
        .context("registration failed")?;
    println!("registered {} (uid {})", session.email, session.local_id);
    Ok(())
}

async fn cmd_login(settings: &Settings, email: &str, password: &str) -> anyhow::Result<()> {
    let auth = AuthClient::from_settings(settings)?;
    let session = auth.sign_in(email, password).await.context("login failed")?;
    println!(
        "signed in as {} (session expires {})",
        session.email, session.expires_at
    );
    Ok(())
}

async fn cmd_dashboard(
    settings: &Settings,
    email: &str,
    password: &str,
    keywords: &str,
) -> anyhow::Result<()> {
    let auth = AuthClient::from_settings(settings)?;
    if let Err(err) = auth.sign_in(email, password).await {
        tracing::error!(error = %err, "sign-in failed");
    }

    let session = auth.current_session();
    match routes::guard(routes::resolve("/main"), session.as_ref()) {
        routes::Route::Main => {}
        redirected => {
            println!("redirected to {}", routes::path(redirected));
            return Ok(());
        }
    }

    let market = Arc::new(AlphaVantageClient::from_settings(settings)?);
    let mut controller = DashboardController::new(market.clone(), market.clone(), market.clone());

    controller.run_search(keywords).await;
    let Some(first) = controller.state.results.first().map(|r| r.symbol.clone()) else {
        println!("no match for this symbol");
        return Ok(());
    };

    println!("selected {first}");
    controller.select(&first, Interval::Daily).await;
    print_detail(&controller.state);

    // One movers tick and the first news window round out the screen.
    let config = TrendingConfig::from_env();
    let rows = config.batch_size;
    let stream = TrendingStream::spawn(Arc::new(FinnhubClient::from_settings(settings)?), config);
    let mut rx = stream.subscribe();
    let mut board = MoversBoard::new();
    if rx.changed().await.is_ok() {
        board.replace(rx.borrow_and_update().clone());
    }
    print_board(&board, rows);
    stream.stop().await;

    match market.news_feed().await {
        Ok(feed) => print_window(&NewsCarousel::new(feed)),
        Err(err) => tracing::error!(error = %err, "error fetching news feed"),
    }

    auth.sign_out();
    Ok(())
}
