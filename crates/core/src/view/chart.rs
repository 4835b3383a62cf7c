use crate::domain::quote::PriceTone;
use crate::domain::series::ChartSeries;

/// Line and fill-gradient colors applied to the chart without touching its
/// data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPalette {
    pub line: &'static str,
    pub gradient_from: &'static str,
    pub gradient_to: &'static str,
}

impl ChartPalette {
    pub fn for_tone(tone: PriceTone) -> Self {
        match tone {
            PriceTone::Positive => Self {
                line: "rgba(0, 255, 0, 1)",
                gradient_from: "rgba(0, 255, 0, 0.25)",
                gradient_to: "rgba(0, 255, 0, 0.05)",
            },
            PriceTone::Negative => Self {
                line: "rgba(255, 0, 0, 1)",
                gradient_from: "rgba(255, 0, 0, 0.25)",
                gradient_to: "rgba(255, 0, 0, 0.05)",
            },
            PriceTone::Flat => Self {
                line: "rgba(0, 143, 251, 1)",
                gradient_from: "rgba(0, 143, 251, 0.25)",
                gradient_to: "rgba(0, 143, 251, 0.05)",
            },
        }
    }
}

/// The one chart instance a dashboard owns. Series swaps and restyling
/// mutate it in place; it is never torn down and recreated.
#[derive(Debug, Clone)]
pub struct ChartModel {
    pub series_name: &'static str,
    pub data: Vec<f64>,
    pub categories: Vec<String>,
    pub palette: ChartPalette,
    generation: u64,
}

impl ChartModel {
    pub fn new() -> Self {
        Self {
            series_name: "Price",
            data: Vec::new(),
            categories: Vec::new(),
            palette: ChartPalette::for_tone(PriceTone::Flat),
            generation: 0,
        }
    }

    /// Swap in a new series and its category labels.
    pub fn update_series(&mut self, series: &ChartSeries) {
        self.data = series.closes();
        self.categories = series.labels();
        self.generation += 1;
    }

    /// Restyle only; data and categories are left alone.
    pub fn apply_palette(&mut self, tone: PriceTone) {
        self.palette = ChartPalette::for_tone(tone);
    }

    /// Number of series swaps applied to this instance since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for ChartModel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{parse_series_payload, Interval};
    use serde_json::json;

    fn series(interval: Interval, entries: &[(&str, &str)]) -> ChartSeries {
        let mut bars = serde_json::Map::new();
        for (stamp, close) in entries {
            bars.insert(stamp.to_string(), json!({ "4. close": close }));
        }

        let mut payload = serde_json::Map::new();
        let last = entries.last().map(|e| e.0).unwrap_or("");
        payload.insert("Meta Data".to_string(), json!({ "3. Last Refreshed": last }));
        payload.insert(
            interval.payload_key().to_string(),
            serde_json::Value::Object(bars),
        );

        parse_series_payload(&serde_json::Value::Object(payload), interval).unwrap()
    }

    #[test]
    fn interval_switch_replaces_data_in_place() {
        let mut chart = ChartModel::new();

        let daily = series(
            Interval::Daily,
            &[("2024-01-04", "1.0"), ("2024-01-05", "2.0")],
        );
        chart.update_series(&daily);
        assert_eq!(chart.data, vec![1.0, 2.0]);
        assert_eq!(chart.categories, vec!["Jan 4", "Jan 5"]);
        assert_eq!(chart.generation(), 1);

        let weekly = series(
            Interval::Weekly,
            &[("2024-01-05", "3.0"), ("2024-01-12", "4.0")],
        );
        chart.update_series(&weekly);

        // Same instance, new data and labels.
        assert_eq!(chart.generation(), 2);
        assert_eq!(chart.data, vec![3.0, 4.0]);
        assert_eq!(chart.categories, vec!["Jan 2024", "Jan 2024"]);
    }

    #[test]
    fn palette_changes_leave_data_alone() {
        let mut chart = ChartModel::new();
        let daily = series(Interval::Daily, &[("2024-01-05", "2.0")]);
        chart.update_series(&daily);

        chart.apply_palette(PriceTone::Positive);
        assert_eq!(chart.palette.line, "rgba(0, 255, 0, 1)");
        assert_eq!(chart.data, vec![2.0]);
        assert_eq!(chart.generation(), 1);

        chart.apply_palette(PriceTone::Negative);
        assert_eq!(chart.palette.line, "rgba(255, 0, 0, 1)");

        chart.apply_palette(PriceTone::Flat);
        assert_eq!(chart.palette.line, "rgba(0, 143, 251, 1)");
    }
}
