//! Download Navigation
//!
//! Opening a generated PDF is a side effect owned by whoever displays the
//! dashboard: the web host turns it into a file download on the next page
//! render, the CLI fetches the file itself.

use parking_lot::Mutex;

/// Starts the download of a URL
pub trait Navigator: Send + Sync {
    fn open(&self, url: &str);
}

/// Navigator that queues URLs until the display drains them
#[derive(Debug, Default)]
pub struct NavigationQueue {
    pending: Mutex<Vec<String>>,
}

impl NavigationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all pending URLs; each is returned exactly once
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock())
    }

    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl Navigator for NavigationQueue {
    fn open(&self, url: &str) {
        tracing::info!(url = %url, "Opening download");
        self.pending.lock().push(url.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_returns_each_url_once() {
        let queue = NavigationQueue::new();
        queue.open("http://a/1.pdf");
        queue.open("http://a/2.pdf");
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.drain(), vec!["http://a/1.pdf", "http://a/2.pdf"]);
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
