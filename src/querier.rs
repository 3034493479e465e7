//! Search orchestration.
//!
//! One search call moves through encode, fetch, classify, parse, enrich.
//! Any stage failure terminates the call; only the per-article enrichment
//! sub-fetches are best-effort.

use crate::article::Article;
use crate::config::ScholarConfig;
use crate::error::{Result, ScholarError};
use crate::fetch::Fetcher;
use crate::parser::{ArticleParser, ParseOutcome};
use crate::query::Query;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Phrases Scholar serves in place of results when it suspects a bot.
const CAPTCHA_MARKERS: [&str; 2] = [
    "please show you're not a robot",
    "Our systems have detected unusual traffic",
];

/// Drives searches against Google Scholar through an injected [`Fetcher`].
pub struct ScholarQuerier<F> {
    config: ScholarConfig,
    parser: ArticleParser,
    fetcher: F,
}

impl<F: Fetcher> ScholarQuerier<F> {
    /// Creates a querier for the given configuration and fetch capability.
    pub fn new(config: ScholarConfig, fetcher: F) -> Result<Self> {
        let parser = ArticleParser::new(&config.base_url)?;
        Ok(Self {
            config,
            parser,
            fetcher,
        })
    }

    /// The configuration this querier was built with.
    pub fn config(&self) -> &ScholarConfig {
        &self.config
    }

    /// Runs one full search: a single result-page fetch followed by a
    /// concurrent citation-export fetch for every article that advertises
    /// one. Enrichment failures leave the payload unset and never fail the
    /// search. Dropping the returned future cancels the page fetch and any
    /// in-flight enrichment fetches.
    pub async fn search(&self, query: &Query) -> Result<ParseOutcome> {
        let url = query.url(&self.config)?;
        info!(url = %url, "Searching Google Scholar");

        let bytes = self
            .fetcher
            .fetch(url.as_str())
            .await
            .map_err(ScholarError::Network)?;
        let html = String::from_utf8(bytes)
            .map_err(|e| ScholarError::Parse(format!("Response is not valid UTF-8: {}", e)))?;

        if CAPTCHA_MARKERS.iter().any(|marker| html.contains(marker)) {
            return Err(ScholarError::Captcha);
        }

        let mut outcome = self.parser.parse(&html)?;
        self.enrich(&mut outcome.articles).await;

        info!(
            count = outcome.articles.len(),
            total = ?outcome.result_count,
            "Search complete"
        );
        Ok(outcome)
    }

    /// Parses a result page without any network traffic.
    pub fn parse(&self, html: &str) -> Result<ParseOutcome> {
        self.parser.parse(html)
    }

    /// Fetches the citation-export payload for every article advertising
    /// one. Each fetch writes only its own article slot, so document order
    /// survives regardless of completion order.
    async fn enrich(&self, articles: &mut [Article]) {
        let semaphore = Arc::new(Semaphore::new(self.config.max_parallel_enrichments));

        let fetches: Vec<_> = articles
            .iter()
            .enumerate()
            .filter_map(|(index, article)| {
                let url = article.citation_export_url.clone()?;
                let semaphore = Arc::clone(&semaphore);
                Some(async move {
                    let _permit = semaphore.acquire().await.ok();
                    (index, self.fetch_payload(&url).await)
                })
            })
            .collect();

        if fetches.is_empty() {
            return;
        }
        debug!(count = fetches.len(), "Fetching citation exports");

        for (index, payload) in join_all(fetches).await {
            if let Some(payload) = payload {
                articles[index].citation_export_payload = Some(payload);
            }
        }
    }

    async fn fetch_payload(&self, url: &str) -> Option<String> {
        match self.fetcher.fetch(url).await {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(url, error = %e, "Citation export is not valid UTF-8");
                    None
                }
            },
            Err(e) => {
                warn!(url, error = %e, "Failed to fetch citation export");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::TransportError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MockFetcher {
        responses: HashMap<String, std::result::Result<Vec<u8>, String>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                responses: HashMap::new(),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn ok(mut self, url: &str, body: &str) -> Self {
            self.responses
                .insert(url.to_string(), Ok(body.as_bytes().to_vec()));
            self
        }

        fn bytes(mut self, url: &str, body: Vec<u8>) -> Self {
            self.responses.insert(url.to_string(), Ok(body));
            self
        }

        fn err(mut self, url: &str, message: &str) -> Self {
            self.responses
                .insert(url.to_string(), Err(message.to_string()));
            self
        }
    }

    #[async_trait]
    impl Fetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> std::result::Result<Vec<u8>, TransportError> {
            self.calls
                .lock()
                .expect("calls mutex poisoned")
                .push(url.to_string());
            match self.responses.get(url) {
                Some(Ok(bytes)) => Ok(bytes.clone()),
                Some(Err(message)) => Err(message.clone().into()),
                None => Err(format!("no response registered for {}", url).into()),
            }
        }
    }

    fn query() -> Query {
        Query {
            all_words: Some("foo".to_string()),
            ..Query::default()
        }
    }

    fn search_url(query: &Query) -> String {
        query
            .url(&ScholarConfig::default())
            .expect("Failed to build URL")
            .to_string()
    }

    const TWO_ARTICLE_PAGE: &str = r#"<html><body>
<div class="gs_r">
  <h3 class="gs_rt"><a href="http://example.org/first">First article</a></h3>
  <div class="gs_fl"><a href="/scholar.ris?export=1">Import into BibTeX</a></div>
</div>
<div class="gs_r">
  <h3 class="gs_rt"><a href="http://example.org/second">Second article</a></h3>
  <div class="gs_fl"><a href="/scholar.ris?export=2">Import into BibTeX</a></div>
</div>
</body></html>"#;

    #[tokio::test]
    async fn test_invalid_query_short_circuits() {
        let fetcher = MockFetcher::new();
        let calls = Arc::clone(&fetcher.calls);
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let result = querier.search(&Query::default()).await;
        assert!(matches!(result, Err(ScholarError::InvalidQuery(_))));
        assert!(calls.lock().expect("calls mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_captcha_page_is_terminal() {
        let query = query();
        let fetcher = MockFetcher::new().ok(
            &search_url(&query),
            "<html><body>To continue, please show you're not a robot.</body></html>",
        );
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let result = querier.search(&query).await;
        assert!(matches!(result, Err(ScholarError::Captcha)));
    }

    #[tokio::test]
    async fn test_unusual_traffic_page_is_terminal() {
        let query = query();
        let fetcher = MockFetcher::new().ok(
            &search_url(&query),
            "Our systems have detected unusual traffic from your computer network.",
        );
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let result = querier.search(&query).await;
        assert!(matches!(result, Err(ScholarError::Captcha)));
    }

    #[tokio::test]
    async fn test_network_failure_surfaces() {
        let query = query();
        let fetcher = MockFetcher::new().err(&search_url(&query), "connection refused");
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let result = querier.search(&query).await;
        assert!(matches!(result, Err(ScholarError::Network(_))));
    }

    #[tokio::test]
    async fn test_non_utf8_response_is_parse_failure() {
        let query = query();
        let fetcher = MockFetcher::new().bytes(&search_url(&query), vec![0xC0, 0xAF, 0xFF]);
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let result = querier.search(&query).await;
        assert!(matches!(result, Err(ScholarError::Parse(_))));
    }

    #[tokio::test]
    async fn test_enrichment_is_best_effort() {
        let query = query();
        let fetcher = MockFetcher::new()
            .ok(&search_url(&query), TWO_ARTICLE_PAGE)
            .err(
                "https://scholar.google.com/scholar.ris?export=1",
                "timed out",
            )
            .ok(
                "https://scholar.google.com/scholar.ris?export=2",
                "@article{second}",
            );
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let outcome = querier.search(&query).await.expect("Search failed");
        assert_eq!(outcome.articles.len(), 2);
        assert_eq!(outcome.articles[0].title.as_deref(), Some("First article"));
        assert_eq!(outcome.articles[1].title.as_deref(), Some("Second article"));
        assert!(outcome.articles[0].citation_export_payload.is_none());
        assert_eq!(
            outcome.articles[1].citation_export_payload.as_deref(),
            Some("@article{second}")
        );
    }

    #[tokio::test]
    async fn test_articles_without_export_links_skip_enrichment() {
        let query = query();
        let page = r#"<div class="gs_r">
            <h3 class="gs_rt"><a href="http://example.org/only">Only article</a></h3>
        </div>"#;
        let fetcher = MockFetcher::new().ok(&search_url(&query), page);
        let calls = Arc::clone(&fetcher.calls);
        let querier =
            ScholarQuerier::new(ScholarConfig::default(), fetcher).expect("Failed to build");

        let outcome = querier.search(&query).await.expect("Search failed");
        assert_eq!(outcome.articles.len(), 1);
        assert_eq!(calls.lock().expect("calls mutex poisoned").len(), 1);
    }

    #[tokio::test]
    async fn test_offline_parse() {
        let querier = ScholarQuerier::new(ScholarConfig::default(), MockFetcher::new())
            .expect("Failed to build");

        let outcome = querier.parse(TWO_ARTICLE_PAGE).expect("Parse failed");
        assert_eq!(outcome.articles.len(), 2);
        assert!(outcome.articles[0].citation_export_payload.is_none());
    }
}
