use crate::domain::news::NewsItem;
use std::time::Duration;

/// Visible slice of the feed.
pub const WINDOW_LEN: usize = 4;

/// Auto-advance cadence; the driver owns the timer.
pub const ROTATE_PERIOD: Duration = Duration::from_secs(5);

/// Rotating window over a feed fetched once. The current index wraps
/// modulo the feed length in both directions; the visible window runs
/// short at the end of the feed rather than wrapping mid-window.
#[derive(Debug, Clone, Default)]
pub struct NewsCarousel {
    feed: Vec<NewsItem>,
    current: usize,
}

impl NewsCarousel {
    pub fn new(feed: Vec<NewsItem>) -> Self {
        Self { feed, current: 0 }
    }

    pub fn len(&self) -> usize {
        self.feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feed.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn next(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        self.current = (self.current + 1) % self.feed.len();
    }

    pub fn prev(&mut self) {
        if self.feed.is_empty() {
            return;
        }
        self.current = (self.current + self.feed.len() - 1) % self.feed.len();
    }

    pub fn window(&self) -> &[NewsItem] {
        let end = (self.current + WINDOW_LEN).min(self.feed.len());
        &self.feed[self.current..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(len: usize) -> Vec<NewsItem> {
        (0..len)
            .map(|i| NewsItem {
                title: format!("Headline {i}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn steps_wrap_modulo_feed_length() {
        let mut carousel = NewsCarousel::new(feed(7));

        // 10 forward and 4 backward steps: (10 - 4) mod 7 = 6.
        for _ in 0..10 {
            carousel.next();
        }
        for _ in 0..4 {
            carousel.prev();
        }
        assert_eq!(carousel.current_index(), 6);

        // Backward past zero wraps to the end.
        let mut carousel = NewsCarousel::new(feed(5));
        carousel.prev();
        assert_eq!(carousel.current_index(), 4);
    }

    #[test]
    fn index_stays_in_bounds_over_many_steps() {
        let mut carousel = NewsCarousel::new(feed(3));
        for i in 0..50 {
            if i % 3 == 0 {
                carousel.prev();
            } else {
                carousel.next();
            }
            assert!(carousel.current_index() < carousel.len());
        }
    }

    #[test]
    fn window_runs_short_at_the_end() {
        let mut carousel = NewsCarousel::new(feed(6));
        assert_eq!(carousel.window().len(), 4);
        assert_eq!(carousel.window()[0].title, "Headline 0");

        for _ in 0..4 {
            carousel.next();
        }
        // Index 4 of 6: only two items remain.
        let window = carousel.window();
        assert_eq!(window.len(), 2);
        assert_eq!(window[0].title, "Headline 4");
        assert_eq!(window[1].title, "Headline 5");
    }

    #[test]
    fn empty_feed_is_inert() {
        let mut carousel = NewsCarousel::new(Vec::new());
        carousel.next();
        carousel.prev();
        assert_eq!(carousel.current_index(), 0);
        assert!(carousel.window().is_empty());
    }
}
