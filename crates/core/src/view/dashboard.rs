use crate::domain::quote::StockQuote;
use crate::domain::search::{self, SearchResult};
use crate::domain::series::{ChartSeries, Interval};
use crate::providers::{QuoteSource, SeriesSource, SymbolSearch};
use crate::view::chart::ChartModel;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Below this viewport width the search bar collapses behind its icon.
pub const NARROW_VIEWPORT_PX: u32 = 992;

/// Delays reaction to rapid keystrokes until input pauses for the window,
/// and suppresses duplicate consecutive queries.
#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
    last_emitted: Option<String>,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
            last_emitted: None,
        }
    }

    /// Record a keystroke; the window restarts from `now`.
    pub fn push(&mut self, text: &str, now: Instant) {
        self.pending = Some((text.to_string(), now));
    }

    /// The query to run, once the window has elapsed and the text differs
    /// from the previous emission.
    pub fn due(&mut self, now: Instant) -> Option<String> {
        let (_, at) = self.pending.as_ref()?;
        if now.duration_since(*at) < self.window {
            return None;
        }

        let (text, _) = self.pending.take()?;
        if self.last_emitted.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last_emitted = Some(text.clone());
        Some(text)
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Searching,
    ResultsShown,
    LoadingDetail,
    DetailShown,
}

/// Monotonic per-stream request tags. A response carrying a stale tag is
/// dropped instead of overwriting newer state.
#[derive(Debug, Default)]
struct StreamSeq {
    issued: u64,
}

impl StreamSeq {
    fn next(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    fn is_current(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// Tags for the concurrent series + quote fetches of one detail load.
#[derive(Debug, Clone, Copy)]
pub struct DetailRequest {
    pub series_seq: u64,
    pub quote_seq: u64,
}

/// Where a click landed, as far as the menus care.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub inside_profile_trigger: bool,
    pub inside_dropdown: bool,
    pub is_search_input: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub profile_open: bool,
    pub results_open: bool,
    pub search_bar_open: bool,
    pub show_search_bar: bool,
    pub drop_shadow: bool,
}

/// The dashboard's UI state as an explicit value object; every transition
/// is a plain method, independent of any rendering layer.
#[derive(Debug)]
pub struct DashboardState {
    pub phase: Phase,
    pub results: Vec<SearchResult>,
    pub selected_symbol: String,
    pub selected_interval: Interval,
    pub selected_name: String,
    pub selected_currency: String,
    pub last_refreshed: String,
    pub quote: Option<StockQuote>,
    pub chart: ChartModel,
    pub menus: MenuState,
    search_seq: StreamSeq,
    series_seq: StreamSeq,
    quote_seq: StreamSeq,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            results: Vec::new(),
            selected_symbol: String::new(),
            selected_interval: Interval::Daily,
            selected_name: String::new(),
            selected_currency: String::new(),
            last_refreshed: String::new(),
            quote: None,
            chart: ChartModel::new(),
            menus: MenuState::default(),
            search_seq: StreamSeq::default(),
            series_seq: StreamSeq::default(),
            quote_seq: StreamSeq::default(),
        }
    }

    pub fn begin_search(&mut self) -> u64 {
        self.phase = Phase::Searching;
        self.search_seq.next()
    }

    /// Returns false (and changes nothing) when a newer search has been
    /// issued since this one.
    pub fn apply_search_results(&mut self, seq: u64, results: Vec<SearchResult>) -> bool {
        if !self.search_seq.is_current(seq) {
            return false;
        }
        self.results = results;
        self.phase = Phase::ResultsShown;
        self.menus.results_open = true;
        true
    }

    /// Enter loading-detail for a (symbol, interval) pair and issue fresh
    /// tags for the concurrent series and quote fetches. Re-selecting an
    /// interval for the current symbol goes through here too.
    pub fn begin_detail(&mut self, symbol: &str, interval: Interval) -> DetailRequest {
        self.selected_symbol = symbol.to_string();
        self.selected_interval = interval;
        // The quote panel clears while the new detail loads.
        self.quote = None;
        self.phase = Phase::LoadingDetail;
        DetailRequest {
            series_seq: self.series_seq.next(),
            quote_seq: self.quote_seq.next(),
        }
    }

    pub fn apply_series(&mut self, seq: u64, series: &ChartSeries) -> bool {
        if !self.series_seq.is_current(seq) {
            return false;
        }
        self.last_refreshed = series.last_refreshed.clone();
        self.chart.update_series(series);
        self.phase = Phase::DetailShown;
        true
    }

    pub fn apply_quote(&mut self, seq: u64, quote: StockQuote) -> bool {
        if !self.quote_seq.is_current(seq) {
            return false;
        }

        let symbol = self.selected_symbol.clone();
        self.selected_name = self.stock_name(&symbol);
        self.selected_currency = self.stock_currency(&symbol);
        self.chart.apply_palette(quote.tone());
        self.quote = Some(quote);
        self.menus.results_open = false;
        true
    }

    pub fn stock_name(&self, symbol: &str) -> String {
        self.results
            .iter()
            .find(|r| r.symbol == symbol)
            .map(|r| r.name.clone())
            .unwrap_or_default()
    }

    pub fn stock_currency(&self, symbol: &str) -> String {
        self.results
            .iter()
            .find(|r| r.symbol == symbol)
            .map(|r| r.currency.clone())
            .unwrap_or_default()
    }

    pub fn currency_symbol(&self) -> &'static str {
        search::currency_symbol(&self.selected_currency).unwrap_or("")
    }

    pub fn clear_search(&mut self) {
        self.results.clear();
        self.menus.results_open = false;
    }

    pub fn toggle_profile_menu(&mut self) {
        self.menus.profile_open = !self.menus.profile_open;
    }

    pub fn open_results_menu(&mut self) {
        self.menus.results_open = true;
    }

    pub fn toggle_search_icon(&mut self) {
        self.menus.search_bar_open = !self.menus.search_bar_open;
    }

    /// Narrow viewports collapse the search bar behind a toggle.
    pub fn toggle_search_bar(&mut self, viewport_width: u32) {
        if viewport_width < NARROW_VIEWPORT_PX {
            self.menus.show_search_bar = !self.menus.show_search_bar;
        }
    }

    pub fn on_scroll(&mut self, offset_y: f64) {
        self.menus.drop_shadow = offset_y > 0.0;
    }

    /// Menu closing rules: the profile menu closes on any click outside its
    /// trigger; the results dropdown closes on clicks outside dropdown-tagged
    /// elements and the search input.
    pub fn on_click(&mut self, target: ClickTarget) {
        if !target.inside_profile_trigger {
            self.menus.profile_open = false;
        }
        if !target.inside_dropdown && !target.is_search_input {
            self.menus.results_open = false;
        }
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

/// Async glue between the market data client and the dashboard state:
/// debounced search, and concurrent series + quote loads on selection.
/// Provider failures are logged and leave prior state untouched.
pub struct DashboardController {
    search: Arc<dyn SymbolSearch>,
    series: Arc<dyn SeriesSource>,
    quotes: Arc<dyn QuoteSource>,
    pub state: DashboardState,
    debouncer: SearchDebouncer,
}

impl DashboardController {
    pub fn new(
        search: Arc<dyn SymbolSearch>,
        series: Arc<dyn SeriesSource>,
        quotes: Arc<dyn QuoteSource>,
    ) -> Self {
        Self {
            search,
            series,
            quotes,
            state: DashboardState::new(),
            debouncer: SearchDebouncer::default(),
        }
    }

    /// Keystroke entry point; `poll_search` runs the query once the
    /// debounce window has passed.
    pub fn on_search_input(&mut self, text: &str, now: Instant) {
        self.debouncer.push(text, now);
    }

    pub async fn poll_search(&mut self, now: Instant) -> bool {
        let Some(keywords) = self.debouncer.due(now) else {
            return false;
        };
        self.run_search(&keywords).await;
        true
    }

    /// The explicit submit path, bypassing the debounce.
    pub async fn run_search(&mut self, keywords: &str) {
        let seq = self.state.begin_search();
        match self.search.search_symbols(keywords).await {
            Ok(results) => {
                if results.is_empty() {
                    tracing::info!(keywords, "no match for this symbol");
                }
                self.state.apply_search_results(seq, results);
            }
            Err(err) => {
                // Prior results stay on screen.
                tracing::error!(keywords, error = %err, "error searching stocks");
            }
        }
    }

    /// Selecting a result, or a new interval for the selected symbol. The
    /// series and quote fetches run concurrently and are applied through
    /// their sequence tags, so a superseded load cannot clobber this one.
    pub async fn select(&mut self, symbol: &str, interval: Interval) {
        let req = self.state.begin_detail(symbol, interval);

        let (series_res, quote_res) = tokio::join!(
            self.series.time_series(symbol, interval),
            self.quotes.global_quote(symbol),
        );

        match series_res {
            Ok(series) => {
                self.state.apply_series(req.series_seq, &series);
            }
            Err(err) => {
                tracing::error!(symbol, interval = %interval, error = %err, "error fetching stock data");
            }
        }

        match quote_res {
            Ok(quote) => {
                self.state.apply_quote(req.quote_seq, quote);
            }
            Err(err) => {
                tracing::error!(symbol, error = %err, "error retrieving stock quote");
            }
        }
    }
}
