// src/calendar/fetch.rs
use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use reqwest::Client;

use crate::error::FetchError;

/// Rotating pool of browser identities. One is picked per request so the
/// calendar host never sees a constant fingerprint from us.
const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/92.0.4515.159 Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
];

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANG: &str = "en-US,en;q=0.5";
const REFERER_URL: &str = "https://www.google.com/";

/// Default pre-request idle window in milliseconds.
const DEFAULT_DELAY_MS: RangeInclusive<u64> = 1000..=3000;

/// Anything that can produce the raw calendar document.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
    fn name(&self) -> &'static str;
}

/// Identity for one outbound request: which user-agent to present and how
/// long to idle before sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestIdentity {
    pub user_agent: &'static str,
    pub delay: Duration,
}

/// Draw a request identity from the pool. Factored over an injected `Rng` so
/// tests can seed it; callers should only rely on membership in the pool and
/// the delay bounds, never on a particular draw.
pub fn choose_identity<R: Rng + ?Sized>(
    rng: &mut R,
    delay_ms: &RangeInclusive<u64>,
) -> RequestIdentity {
    RequestIdentity {
        user_agent: USER_AGENTS[rng.random_range(0..USER_AGENTS.len())],
        delay: Duration::from_millis(rng.random_range(delay_ms.clone())),
    }
}

/// The configured user-agent pool.
pub fn user_agent_pool() -> &'static [&'static str] {
    &USER_AGENTS
}

/// HTTP fetcher for the remote calendar page. The only networked
/// [`DocumentSource`] implementation.
pub struct HttpFetcher {
    client: Client,
    url: String,
    timeout: Duration,
    delay_ms: RangeInclusive<u64>,
}

impl HttpFetcher {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
            delay_ms: DEFAULT_DELAY_MS,
        }
    }

    /// Override the pre-request idle window. `0..=0` disables it (tests).
    pub fn with_delay_ms(mut self, delay_ms: RangeInclusive<u64>) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    fn classify(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Request(e)
        }
    }
}

#[async_trait]
impl DocumentSource for HttpFetcher {
    async fn fetch(&self) -> Result<String, FetchError> {
        let identity = choose_identity(&mut rand::rng(), &self.delay_ms);
        if !identity.delay.is_zero() {
            tracing::debug!(
                delay_ms = identity.delay.as_millis() as u64,
                "idling before calendar request"
            );
            tokio::time::sleep(identity.delay).await;
        }

        let resp = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .header(USER_AGENT, identity.user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, ACCEPT_LANG)
            .header(REFERER, REFERER_URL)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        resp.text().await.map_err(|e| self.classify(e))
    }

    fn name(&self) -> &'static str {
        "forexfactory"
    }
}
