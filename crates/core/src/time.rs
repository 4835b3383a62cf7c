use chrono::{NaiveDate, NaiveDateTime};

/// The time-series provider stamps intraday bars as "YYYY-MM-DD HH:MM:SS"
/// and daily/weekly/monthly bars as bare dates.
pub fn parse_provider_timestamp(s: &str) -> Option<NaiveDateTime> {
    let t = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(t, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_label(timestamp: NaiveDateTime, pattern: &str) -> String {
    timestamp.format(pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_provider_stamp_shapes() {
        let daily = parse_provider_timestamp("2024-01-05").unwrap();
        assert_eq!(daily.format("%Y-%m-%d %H:%M").to_string(), "2024-01-05 00:00");

        let intraday = parse_provider_timestamp("2024-01-05 16:00:00").unwrap();
        assert_eq!(intraday.format("%H:%M").to_string(), "16:00");

        assert!(parse_provider_timestamp("not a date").is_none());
    }

    #[test]
    fn formats_display_labels() {
        let ts = parse_provider_timestamp("2024-01-05 16:00:00").unwrap();
        assert_eq!(format_label(ts, "%b %-d"), "Jan 5");
        assert_eq!(format_label(ts, "%b %Y"), "Jan 2024");
        assert_eq!(format_label(ts, "%-I:%M %p"), "4:00 PM");
        assert_eq!(format_label(ts, "%b %-d, %-I:%M %p"), "Jan 5, 4:00 PM");
    }
}
