//! Robots.txt parser implementation
//!
//! This module provides functionality for parsing robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, providing a
/// simplified interface for checking if URLs are allowed.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Returns true if this policy can never deny a URL
    pub fn is_permissive(&self) -> bool {
        self.allow_all || self.content.trim().is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The user agent string; only its product token is matched
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.is_permissive() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, &product_token(user_agent), url)
    }

    /// Gets the crawl delay (seconds) that applies to a user agent
    ///
    /// A group naming the agent wins over the `*` group. Consecutive
    /// `User-agent` lines share one group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        if self.is_permissive() {
            return None;
        }

        let agent = product_token(user_agent);
        let mut group: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut wildcard_delay = None;
        let mut agent_delay = None;

        for line in self.content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            if key == "user-agent" {
                if !group_open {
                    group.clear();
                    group_open = true;
                }
                group.push(value.to_ascii_lowercase());
                continue;
            }
            group_open = false;

            if key != "crawl-delay" {
                continue;
            }
            let Ok(delay) = value.parse::<f64>() else {
                continue;
            };
            if group.iter().any(|ua| ua != "*" && ua == &agent) {
                agent_delay = Some(delay);
            } else if group.iter().any(|ua| ua == "*") {
                wildcard_delay = Some(delay);
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

/// Lowercased product token of a user agent (`Bot/1.0 (+url)` -> `bot`)
fn product_token(user_agent: &str) -> String {
    user_agent
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect::<String>()
        .to_ascii_lowercase()
}
