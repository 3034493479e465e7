//! Client configuration.
//!
//! Everything the original program kept in process-wide globals (base URL,
//! user agent, cookie path) is an explicit value here, passed into the
//! encoder and fetcher at construction time.

use std::path::PathBuf;

/// Default Google Scholar URL
pub const DEFAULT_BASE_URL: &str = "https://scholar.google.com";

/// Browser-like user agent attached to every request
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:27.0) Gecko/20100101 Firefox/27.0";

/// Configuration for query encoding and fetching.
#[derive(Debug, Clone)]
pub struct ScholarConfig {
    /// Base site URL, without a trailing slash (mirror sites supported)
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Optional path to a JSON cookie jar loaded by the fetcher
    pub cookie_file: Option<PathBuf>,
    /// Cap on concurrent citation-export fetches during enrichment
    pub max_parallel_enrichments: usize,
}

impl Default for ScholarConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cookie_file: None,
            max_parallel_enrichments: 3,
        }
    }
}

impl ScholarConfig {
    /// Configuration pointing at a custom base URL (e.g. a mirror site).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = ScholarConfig::with_base_url("https://mirror.example.org/");
        assert_eq!(config.base_url, "https://mirror.example.org");
    }
}
