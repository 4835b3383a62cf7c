use crate::time;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Granularity of a requested price time series. Each variant carries its
/// provider function selector, payload key, display-label pattern and an
/// optional cap on the most-recent points kept for charting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Min1,
    Min30,
    Daily,
    Weekly,
    Monthly,
}

impl Interval {
    /// Unknown interval strings chart Daily.
    pub fn parse_or_daily(s: &str) -> Interval {
        match s {
            "1min" => Interval::Min1,
            "30min" => Interval::Min30,
            "Daily" => Interval::Daily,
            "Weekly" => Interval::Weekly,
            "Monthly" => Interval::Monthly,
            _ => Interval::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Min1 => "1min",
            Interval::Min30 => "30min",
            Interval::Daily => "Daily",
            Interval::Weekly => "Weekly",
            Interval::Monthly => "Monthly",
        }
    }

    pub fn function_name(&self) -> &'static str {
        match self {
            Interval::Min1 | Interval::Min30 => "TIME_SERIES_INTRADAY",
            Interval::Daily => "TIME_SERIES_DAILY",
            Interval::Weekly => "TIME_SERIES_WEEKLY",
            Interval::Monthly => "TIME_SERIES_MONTHLY",
        }
    }

    /// Sub-interval query parameter, intraday only.
    pub fn intraday_interval(&self) -> Option<&'static str> {
        match self {
            Interval::Min1 => Some("1min"),
            Interval::Min30 => Some("30min"),
            _ => None,
        }
    }

    pub fn payload_key(&self) -> &'static str {
        match self {
            Interval::Min1 => "Time Series (1min)",
            Interval::Min30 => "Time Series (30min)",
            Interval::Daily => "Time Series (Daily)",
            Interval::Weekly => "Weekly Time Series",
            Interval::Monthly => "Monthly Time Series",
        }
    }

    /// Most-recent points retained for the chart; 1min is uncapped.
    pub fn point_cap(&self) -> Option<usize> {
        match self {
            Interval::Min1 => None,
            Interval::Min30 => Some(50),
            Interval::Daily => Some(30),
            Interval::Weekly => Some(52),
            Interval::Monthly => Some(60),
        }
    }

    pub fn label_pattern(&self) -> &'static str {
        match self {
            Interval::Min1 => "%-I:%M %p",
            Interval::Min30 => "%b %-d, %-I:%M %p",
            Interval::Daily => "%b %-d",
            Interval::Weekly | Interval::Monthly => "%b %Y",
        }
    }

    pub fn all() -> [Interval; 5] {
        [
            Interval::Min1,
            Interval::Min30,
            Interval::Daily,
            Interval::Weekly,
            Interval::Monthly,
        ]
    }
}

impl Default for Interval {
    fn default() -> Self {
        Interval::Daily
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSeriesPoint {
    pub timestamp: NaiveDateTime,
    pub close: f64,
}

/// A reshaped series ready for charting: capped per interval and in
/// chronological (oldest-first) order.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub interval: Interval,
    pub last_refreshed: String,
    pub points: Vec<TimeSeriesPoint>,
}

impl ChartSeries {
    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    /// Category labels formatted per the interval's display pattern.
    pub fn labels(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| time::format_label(p.timestamp, self.interval.label_pattern()))
            .collect()
    }
}

/// Reshape a raw time-series payload for the chart: pick the interval's
/// payload key, keep the most-recent capped points and flip them to
/// chronological order. Bars with unparseable stamps or closes are skipped.
pub fn parse_series_payload(payload: &Value, interval: Interval) -> anyhow::Result<ChartSeries> {
    let last_refreshed = payload
        .get("Meta Data")
        .and_then(|m| m.get("3. Last Refreshed"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let series = payload
        .get(interval.payload_key())
        .and_then(Value::as_object)
        .with_context(|| {
            format!(
                "missing series object {:?} in provider payload",
                interval.payload_key()
            )
        })?;

    let mut points = Vec::with_capacity(series.len());
    for (stamp, bar) in series {
        let Some(timestamp) = time::parse_provider_timestamp(stamp) else {
            continue;
        };
        let Some(close) = bar
            .get("4. close")
            .and_then(Value::as_str)
            .and_then(|s| s.trim().parse::<f64>().ok())
        else {
            continue;
        };
        points.push(TimeSeriesPoint { timestamp, close });
    }

    // Normalize to newest-first before applying the cap so the cap always
    // keeps the most recent points, whatever order the provider sent.
    points.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    if let Some(cap) = interval.point_cap() {
        points.truncate(cap);
    }
    points.reverse();

    Ok(ChartSeries {
        interval,
        last_refreshed,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily_payload(days: u32) -> Value {
        let mut series = serde_json::Map::new();
        for day in 1..=days {
            // January then February, to stay within real dates.
            let (month, dom) = if day <= 31 { (1, day) } else { (2, day - 31) };
            series.insert(
                format!("2024-{month:02}-{dom:02}"),
                json!({
                    "1. open": "100.0",
                    "4. close": format!("{}.5", 100 + day),
                }),
            );
        }
        json!({
            "Meta Data": { "3. Last Refreshed": "2024-02-09" },
            "Time Series (Daily)": series,
        })
    }

    #[test]
    fn unknown_interval_falls_back_to_daily() {
        assert_eq!(Interval::parse_or_daily("Daily"), Interval::Daily);
        assert_eq!(Interval::parse_or_daily("1min"), Interval::Min1);
        assert_eq!(Interval::parse_or_daily("fortnightly"), Interval::Daily);
        assert_eq!(Interval::parse_or_daily(""), Interval::Daily);
    }

    #[test]
    fn caps_match_documented_limits() {
        assert_eq!(Interval::Min1.point_cap(), None);
        assert_eq!(Interval::Min30.point_cap(), Some(50));
        assert_eq!(Interval::Daily.point_cap(), Some(30));
        assert_eq!(Interval::Weekly.point_cap(), Some(52));
        assert_eq!(Interval::Monthly.point_cap(), Some(60));
    }

    #[test]
    fn forty_daily_entries_chart_thirty_oldest_first() {
        let payload = daily_payload(40);
        let series = parse_series_payload(&payload, Interval::Daily).unwrap();

        assert_eq!(series.points.len(), 30);
        assert_eq!(series.last_refreshed, "2024-02-09");

        // The 10 oldest entries fell to the cap; the window starts at day 11.
        assert_eq!(series.points[0].close, 111.5);
        assert_eq!(series.points[29].close, 140.5);
        for pair in series.points.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }

        // Daily labels use "month day" formatting.
        assert_eq!(series.labels()[0], "Jan 11");
        assert_eq!(series.labels()[29], "Feb 9");
    }

    #[test]
    fn chronological_regardless_of_payload_order() {
        // Keys intentionally listed newest-first; the reshaper must not
        // depend on provider ordering.
        let payload = json!({
            "Meta Data": { "3. Last Refreshed": "2024-01-03" },
            "Time Series (Daily)": {
                "2024-01-03": { "4. close": "3.0" },
                "2024-01-01": { "4. close": "1.0" },
                "2024-01-02": { "4. close": "2.0" },
            }
        });
        let series = parse_series_payload(&payload, Interval::Daily).unwrap();
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn one_minute_series_is_uncapped_with_time_labels() {
        let mut bars = serde_json::Map::new();
        for minute in 0..60 {
            bars.insert(
                format!("2024-01-05 15:{minute:02}:00"),
                json!({ "4. close": format!("{minute}.0") }),
            );
        }
        let payload = json!({
            "Meta Data": { "3. Last Refreshed": "2024-01-05 15:59:00" },
            "Time Series (1min)": bars,
        });

        let series = parse_series_payload(&payload, Interval::Min1).unwrap();
        assert_eq!(series.points.len(), 60);
        assert_eq!(series.labels()[0], "3:00 PM");
        assert_eq!(series.labels()[59], "3:59 PM");
    }

    #[test]
    fn skips_malformed_bars() {
        let payload = json!({
            "Time Series (Daily)": {
                "2024-01-01": { "4. close": "1.0" },
                "garbage": { "4. close": "2.0" },
                "2024-01-03": { "4. close": "not a number" },
            }
        });
        let series = parse_series_payload(&payload, Interval::Daily).unwrap();
        assert_eq!(series.closes(), vec![1.0]);
        assert!(series.last_refreshed.is_empty());
    }

    #[test]
    fn missing_payload_key_is_an_error() {
        let payload = json!({ "Meta Data": {} });
        assert!(parse_series_payload(&payload, Interval::Weekly).is_err());
    }
}
