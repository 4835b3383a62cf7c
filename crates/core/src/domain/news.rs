use serde::{Deserialize, Serialize};

/// One entry of the provider's news feed, taken as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub banner_image: String,

    #[serde(default)]
    pub time_published: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsFeedResponse {
    #[serde(default)]
    pub feed: Vec<NewsItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_feed_entries_with_missing_fields() {
        let v = json!({
            "items": "2",
            "feed": [
                {
                    "title": "Markets rally",
                    "url": "https://example.com/a",
                    "source": "Example Wire",
                    "time_published": "20240105T160000"
                },
                { "title": "Second headline" },
            ]
        });

        let parsed: NewsFeedResponse = serde_json::from_value(v).unwrap();
        assert_eq!(parsed.feed.len(), 2);
        assert_eq!(parsed.feed[0].source, "Example Wire");
        assert!(parsed.feed[1].url.is_empty());
    }

    #[test]
    fn empty_body_is_an_empty_feed() {
        let parsed: NewsFeedResponse = serde_json::from_value(json!({})).unwrap();
        assert!(parsed.feed.is_empty());
    }
}
