//! Robots.txt handling module
//!
//! This module fetches the seed origin's robots.txt once per run and answers
//! fetch-permission queries for the configured user agent. When the policy
//! cannot be obtained the gate allows everything instead of blocking the crawl.

mod parser;

pub use parser::ParsedRobots;

use crate::config::MAX_DELAY_SECS;
use crate::crawler::fetch_page;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Permission gate in front of every page fetch and every enqueue decision
#[derive(Debug, Clone)]
pub struct RobotsGate {
    /// `None` when robots compliance is switched off
    policy: Option<ParsedRobots>,
    user_agent: String,
}

impl RobotsGate {
    /// A gate that never denies (robots compliance disabled)
    pub fn disabled(user_agent: &str) -> Self {
        Self {
            policy: None,
            user_agent: user_agent.to_string(),
        }
    }

    /// A gate evaluating an already-parsed policy
    pub fn with_policy(policy: ParsedRobots, user_agent: &str) -> Self {
        Self {
            policy: Some(policy),
            user_agent: user_agent.to_string(),
        }
    }

    /// Fetches robots.txt for the seed's origin and builds an enforcing gate
    ///
    /// Any failure (network error, timeout, non-success status) degrades to
    /// an allow-all policy.
    pub async fn fetch(client: &Client, seed: &Url, user_agent: &str, timeout: Duration) -> Self {
        let robots_url = match robots_url(seed) {
            Some(url) => url,
            None => {
                tracing::warn!("Cannot derive robots.txt location from {}", seed);
                return Self::with_policy(ParsedRobots::allow_all(), user_agent);
            }
        };

        tracing::debug!("Fetching robots.txt from {}", robots_url);
        let policy = match fetch_page(client, &robots_url, timeout).await {
            Ok(page) => {
                tracing::info!("Loaded robots.txt from {}", robots_url);
                ParsedRobots::from_content(&page.body)
            }
            Err(e) => {
                tracing::warn!("robots.txt unavailable ({}), allowing all URLs", e);
                ParsedRobots::allow_all()
            }
        };

        Self::with_policy(policy, user_agent)
    }

    /// Checks whether `url` may be fetched by the configured user agent
    pub fn can_fetch(&self, url: &Url) -> bool {
        match &self.policy {
            Some(policy) => policy.is_allowed(url.as_str(), &self.user_agent),
            None => true,
        }
    }

    /// Crawl delay declared for our agent, when compliance is enabled
    ///
    /// Negative or unparsable values are ignored; anything above
    /// [`MAX_DELAY_SECS`] is clamped to it.
    pub fn crawl_delay(&self) -> Option<Duration> {
        let secs = self
            .policy
            .as_ref()
            .and_then(|policy| policy.crawl_delay(&self.user_agent))?;

        if secs.is_nan() || secs < 0.0 {
            tracing::warn!("Ignoring invalid robots.txt crawl-delay {}", secs);
            return None;
        }
        if secs > MAX_DELAY_SECS {
            tracing::warn!(
                "robots.txt crawl-delay {} is too large, using {}",
                secs,
                MAX_DELAY_SECS
            );
            return Duration::try_from_secs_f64(MAX_DELAY_SECS).ok();
        }
        Duration::try_from_secs_f64(secs).ok()
    }
}

/// `<scheme>://<host[:port]>/robots.txt` for the given URL
pub fn robots_url(url: &Url) -> Option<Url> {
    let mut robots = url.clone();
    robots.set_path("/robots.txt");
    robots.set_query(None);
    robots.set_fragment(None);
    if robots.host_str().is_none() {
        return None;
    }
    Some(robots)
}
