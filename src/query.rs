//! Scholar query construction and URL encoding.
//!
//! A [`Query`] is built once (struct update syntax over [`Query::default`])
//! and encoded into a request URL with [`Query::url`]. Two mutually exclusive
//! modes exist: setting `cluster_id` requests one article cluster directly
//! and every other search field is ignored; otherwise the advanced-search
//! parameter set is emitted in a fixed order.

use crate::config::ScholarConfig;
use crate::error::{Result, ScholarError};
use std::borrow::Cow;
use std::fmt::Write;
use url::Url;

/// A single query against Google Scholar.
#[derive(Debug, Clone)]
pub struct Query {
    /// Words that all must be found in the results
    pub all_words: Option<String>,
    /// Words of which at least one must be found in the results
    pub any_words: Option<String>,
    /// Words of which none must be found in the results
    pub none_words: Option<String>,
    /// Phrase that must be found in the results exactly
    pub exact_phrase: Option<String>,
    /// Whether to search in the title only
    pub title_only: bool,
    /// Author names that must be on the result's author list
    pub author: Option<String>,
    /// Publication in which the result must be found
    pub publication: Option<String>,
    /// Results must have appeared in or after this year
    pub start_year: Option<i32>,
    /// Results must have appeared in or before this year
    pub end_year: Option<i32>,
    /// Whether to include patents in results
    pub include_patents: bool,
    /// Whether to include citation-only entries in results
    pub include_citations: bool,
    /// Maximum number of results to request
    pub result_limit: Option<u32>,
    /// Cluster ID for retrieving a specific article cluster; when set, all
    /// other search fields are ignored
    pub cluster_id: Option<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            all_words: None,
            any_words: None,
            none_words: None,
            exact_phrase: None,
            title_only: false,
            author: None,
            publication: None,
            start_year: None,
            end_year: None,
            include_patents: true,
            include_citations: true,
            result_limit: None,
            cluster_id: None,
        }
    }
}

impl Query {
    /// Returns a complete, submittable URL for this query.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` if no search field narrows the query, `InvalidFormat`
    /// if the configured base URL yields a malformed request URL.
    pub fn url(&self, config: &ScholarConfig) -> Result<Url> {
        let raw = if self.cluster_id.is_some() {
            self.cluster_url(config)
        } else {
            self.search_url(config)?
        };

        Url::parse(&raw).map_err(|e| ScholarError::InvalidFormat(format!("'{}': {}", raw, e)))
    }

    /// True if at least one field narrows a search-mode query.
    fn has_search_terms(&self) -> bool {
        self.all_words.is_some()
            || self.any_words.is_some()
            || self.none_words.is_some()
            || self.exact_phrase.is_some()
            || self.author.is_some()
            || self.publication.is_some()
            || self.start_year.is_some()
            || self.end_year.is_some()
    }

    fn cluster_url(&self, config: &ScholarConfig) -> String {
        let cluster_id = self.cluster_id.as_deref().unwrap_or_default();
        let mut url = format!(
            "{}/scholar?cluster={}",
            config.base_url,
            urlencoding::encode(cluster_id)
        );

        if let Some(limit) = self.result_limit {
            let _ = write!(url, "&num={}", limit);
        }

        url
    }

    fn search_url(&self, config: &ScholarConfig) -> Result<String> {
        if !self.has_search_terms() {
            return Err(ScholarError::InvalidQuery(
                "query does not have enough parameters".to_string(),
            ));
        }

        // Absent text fields still emit an empty value; parameter order is
        // fixed so the same query always yields the same URL string.
        let mut url = format!(
            "{}/scholar?as_q={}&as_epq={}&as_oq={}&as_eq={}&as_occt={}&as_sauthors={}&as_publication={}",
            config.base_url,
            encode(&self.all_words),
            encode(&self.exact_phrase),
            encode(&self.any_words),
            encode(&self.none_words),
            if self.title_only { "title" } else { "any" },
            encode(&self.author),
            encode(&self.publication),
        );

        if let Some(year) = self.start_year {
            let _ = write!(url, "&as_ylo={}", year);
        }
        if let Some(year) = self.end_year {
            let _ = write!(url, "&as_yhi={}", year);
        }

        url.push_str(if self.include_citations {
            "&as_vis=0"
        } else {
            "&as_vis=1"
        });
        url.push_str(if self.include_patents {
            "&as_sdt=0%2C5"
        } else {
            "&as_sdt=1%2C5"
        });
        url.push_str("&btnG=&hl=en");

        if let Some(limit) = self.result_limit {
            let _ = write!(url, "&num={}", limit);
        }

        Ok(url)
    }
}

/// Percent-encodes an optional query value, empty string if absent.
fn encode(field: &Option<String>) -> Cow<'_, str> {
    match field.as_deref() {
        Some(value) => urlencoding::encode(value),
        None => Cow::Borrowed(""),
    }
}
