//! Result-page extraction.
//!
//! Turns one Google Scholar results document into [`Article`] records.
//! Extraction is defensive: result pages come in several shapes (linked
//! articles, citation-only stubs, direct PDF hits) and absent elements simply
//! leave the corresponding field unset. Blocks without a recoverable title
//! are dropped as non-result noise.

use crate::article::Article;
use crate::error::{Result, ScholarError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

/// Articles extracted from one results page, plus the page's own claim of
/// how many results exist in total (independent of how many were parsed).
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// Parsed articles, in document order
    pub articles: Vec<Article>,
    /// Total result count advertised by the page
    pub result_count: Option<u64>,
}

/// Parser for Google Scholar result pages.
pub struct ArticleParser {
    base_url: Url,
    block: Selector,
    heading: Selector,
    heading_link: Selector,
    byline: Selector,
    link_row: Selector,
    link: Selector,
    snippet: Selector,
    summary: Selector,
    year_regex: Regex,
}

impl ArticleParser {
    /// Creates a parser resolving relative links against `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ScholarError::InvalidFormat(format!("Invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self {
            base_url,
            block: selector("div.gs_r")?,
            heading: selector("h3.gs_rt")?,
            heading_link: selector("h3.gs_rt a")?,
            byline: selector("div.gs_a")?,
            link_row: selector("div.gs_fl")?,
            link: selector("a")?,
            snippet: selector("div.gs_rs")?,
            summary: selector("div#gs_ab_md")?,
            year_regex: Regex::new(r"\b(19|20)\d{2}\b")
                .map_err(|e| ScholarError::Parse(e.to_string()))?,
        })
    }

    /// Parses a results document into articles and the result-count hint.
    ///
    /// Malformed markup is never an error; unrecognizable blocks just yield
    /// fewer or emptier articles.
    pub fn parse(&self, html: &str) -> Result<ParseOutcome> {
        let document = Html::parse_document(html);

        let result_count = self.parse_result_count(&document);

        let mut articles = Vec::new();
        for block in document.select(&self.block) {
            let article = self.parse_block(block);
            if article.title.as_deref().is_some_and(|t| !t.is_empty()) {
                articles.push(article);
            }
        }

        debug!(count = articles.len(), total = ?result_count, "Parsed result page");
        Ok(ParseOutcome {
            articles,
            result_count,
        })
    }

    /// Reads the results-summary element ("About 1,520 results ...").
    fn parse_result_count(&self, document: &Html) -> Option<u64> {
        let stats = document.select(&self.summary).next()?;
        let text = stats.text().collect::<String>();
        let token = text.split_whitespace().nth(1)?;
        token.replace(',', "").parse().ok()
    }

    /// Extracts one article from a result block.
    fn parse_block(&self, block: ElementRef<'_>) -> Article {
        let mut article = Article::default();

        if let Some(heading) = block.select(&self.heading).next() {
            if let Some(link) = block.select(&self.heading_link).next() {
                article.title = Some(link.text().collect::<String>().trim().to_string());
                let href = link.value().attr("href").unwrap_or("");
                article.result_url = self.absolute_url(href);
                if href.ends_with(".pdf") {
                    article.pdf_url = article.result_url.clone();
                }
            } else {
                // Citation-only stub: the heading carries bracketed span tags
                // ("[CITATION]", "[BOOK]") that are not part of the title.
                article.title = Some(text_without_spans(heading));
            }
        }

        if let Some(byline) = block.select(&self.byline).next() {
            let text = byline.text().collect::<String>();
            if let Some(m) = self.year_regex.find(&text) {
                article.year = m.as_str().parse().ok();
            }
        }

        if let Some(row) = block.select(&self.link_row).next() {
            self.parse_link_row(row, &mut article);
        }

        if let Some(snippet) = block.select(&self.snippet).next() {
            let text = snippet.text().collect::<String>();
            article.excerpt = Some(text.trim().replace('\n', ""));
        }

        article
    }

    /// Classifies the links in a block's link row. Duplicate matches within
    /// one category overwrite each other, so the last link in document order
    /// wins.
    fn parse_link_row(&self, row: ElementRef<'_>, article: &mut Article) {
        for link in row.select(&self.link) {
            let href = link.value().attr("href").unwrap_or("");
            let text = link.text().collect::<String>();

            if href.starts_with("/scholar?cites") {
                if let Some(rest) = text.strip_prefix("Cited by") {
                    if let Some(count) = rest.split_whitespace().last().and_then(|t| t.parse().ok())
                    {
                        article.citation_count = count;
                    }
                }
                article.citations_list_url = self
                    .absolute_url(href)
                    .map(|url| strip_query_param(&url, "num"));
                if let Some(url) = &article.citations_list_url {
                    article.cluster_id = cluster_id_from(url);
                }
            }

            if href.starts_with("/scholar?cluster") {
                if text.starts_with("All ") {
                    if let Some(count) = text.split_whitespace().nth(1).and_then(|t| t.parse().ok())
                    {
                        article.version_count = count;
                    }
                }
                article.versions_list_url = self
                    .absolute_url(href)
                    .map(|url| strip_query_param(&url, "num"));
            }

            if text.starts_with("Import") {
                article.citation_export_url = self.absolute_url(href);
            }
        }
    }

    /// Converts an href to its absolute form against the configured base.
    fn absolute_url(&self, href: &str) -> Option<String> {
        if href.is_empty() {
            return None;
        }
        match Url::parse(href) {
            Ok(url) => Some(url.to_string()),
            Err(_) => self.base_url.join(href).ok().map(|url| url.to_string()),
        }
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScholarError::Parse(e.to_string()))
}

/// Element text with `<span>` subtrees left out, whitespace-normalized.
fn text_without_spans(element: ElementRef<'_>) -> String {
    fn collect(element: ElementRef<'_>, out: &mut String) {
        for child in element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            } else if let Some(el) = ElementRef::wrap(child) {
                if el.value().name() != "span" {
                    collect(el, out);
                }
            }
        }
    }

    let mut out = String::new();
    collect(element, &mut out);
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strips one query parameter from a URL, leaving the rest untouched.
fn strip_query_param(url: &str, name: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let prefix = format!("{}=", name);
    let kept: Vec<&str> = query
        .split('&')
        .filter(|item| !item.starts_with(&prefix))
        .collect();
    format!("{}?{}", base, kept.join("&"))
}

/// Pulls the `cites=` identifier out of a citations-list URL.
fn cluster_id_from(url: &str) -> Option<String> {
    let query = url.splitn(2, '?').nth(1)?;
    query
        .split('&')
        .find_map(|item| item.strip_prefix("cites=").map(str::to_string))
}
