use std::collections::{BTreeMap, HashSet, VecDeque};
use url::Url;

/// The mutable state of one crawl: frontier, visited set and title index
///
/// URLs are stored in canonical string form. The frontier is FIFO, so links
/// are explored breadth-first, and it never holds a URL twice or a URL that
/// has already been visited. The visited set only grows.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    frontier: VecDeque<String>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    titles: BTreeMap<String, String>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a state whose frontier holds only the seed
    pub fn seeded(seed: &Url) -> Self {
        let mut state = Self::new();
        state.enqueue(seed);
        state
    }

    /// Appends a canonical URL to the frontier
    ///
    /// Returns false (and does nothing) if the URL was already visited or queued.
    pub fn enqueue(&mut self, url: &Url) -> bool {
        self.enqueue_str(url.as_str())
    }

    fn enqueue_str(&mut self, url: &str) -> bool {
        if self.visited.contains(url) || self.queued.contains(url) {
            return false;
        }
        self.queued.insert(url.to_string());
        self.frontier.push_back(url.to_string());
        true
    }

    /// Removes the earliest-enqueued URL and marks it visited in the same step
    ///
    /// Returns `None` when the frontier is empty.
    pub fn dequeue(&mut self) -> Option<String> {
        while let Some(url) = self.frontier.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    pub fn record_title(&mut self, url: &str, title: &str) {
        self.titles.insert(url.to_string(), title.to_string());
    }

    /// Folds previously persisted progress into this state
    ///
    /// Visited URLs and titles are unioned in, pending URLs are appended to
    /// the frontier, and anything queued that is now known to be visited is
    /// dropped from the frontier.
    pub fn merge<P, V>(&mut self, pending: P, visited: V, titles: BTreeMap<String, String>)
    where
        P: IntoIterator<Item = String>,
        V: IntoIterator<Item = String>,
    {
        self.visited.extend(visited);
        self.titles.extend(titles);

        let visited = &self.visited;
        self.frontier.retain(|url| !visited.contains(url));
        self.queued.retain(|url| !visited.contains(url));

        for url in pending {
            self.enqueue_str(&url);
        }
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn is_queued(&self, url: &str) -> bool {
        self.queued.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.frontier.len()
    }

    /// Pending URLs in dequeue order
    pub fn pending(&self) -> impl Iterator<Item = &str> {
        self.frontier.iter().map(String::as_str)
    }

    /// Visited URLs, sorted
    pub fn visited_sorted(&self) -> Vec<String> {
        let mut visited: Vec<String> = self.visited.iter().cloned().collect();
        visited.sort();
        visited
    }

    /// URL to title index, ordered by URL
    pub fn titles(&self) -> &BTreeMap<String, String> {
        &self.titles
    }
}
