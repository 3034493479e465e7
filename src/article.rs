//! Article records extracted from Scholar result pages.

use serde::{Deserialize, Serialize};

/// A single bibliographic record from a Scholar results page.
///
/// The parser creates one per result block and fills in whatever the block
/// actually contains; absent elements leave the corresponding field unset.
/// `citation_export_payload` is populated later by the enrichment phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Article {
    /// Article title
    pub title: Option<String>,
    /// Direct URL to the article
    pub result_url: Option<String>,
    /// Publication year
    pub year: Option<i32>,
    /// Number of citations
    #[serde(default)]
    pub citation_count: u32,
    /// Number of known versions
    #[serde(default)]
    pub version_count: u32,
    /// Cluster ID identifying this article's version group
    pub cluster_id: Option<String>,
    /// Direct PDF link, when the result links straight to a PDF
    pub pdf_url: Option<String>,
    /// URL listing the articles citing this one
    pub citations_list_url: Option<String>,
    /// URL listing all versions of this article
    pub versions_list_url: Option<String>,
    /// Citation-manager export link (BibTeX, EndNote, ...)
    pub citation_export_url: Option<String>,
    /// Text snippet from the result
    pub excerpt: Option<String>,
    /// Raw citation-export payload, set by the enrichment phase
    pub citation_export_payload: Option<String>,
}

impl Article {
    /// Renders the article as aligned label/value lines, one per set field.
    pub fn as_text(&self) -> String {
        fn line(out: &mut Vec<String>, label: &str, value: impl std::fmt::Display) {
            out.push(format!("{:<16}{}", format!("{}:", label), value));
        }

        let mut out = Vec::new();
        if let Some(title) = &self.title {
            line(&mut out, "Title", title);
        }
        if let Some(url) = &self.result_url {
            line(&mut out, "URL", url);
        }
        if let Some(year) = self.year {
            line(&mut out, "Year", year);
        }
        if self.citation_count > 0 {
            line(&mut out, "Citations", self.citation_count);
        }
        if self.version_count > 0 {
            line(&mut out, "Versions", self.version_count);
        }
        if let Some(cluster_id) = &self.cluster_id {
            line(&mut out, "Cluster ID", cluster_id);
        }
        if let Some(pdf_url) = &self.pdf_url {
            line(&mut out, "PDF link", pdf_url);
        }
        if let Some(url) = &self.citations_list_url {
            line(&mut out, "Citations list", url);
        }
        if let Some(url) = &self.versions_list_url {
            line(&mut out, "Versions list", url);
        }
        if let Some(url) = &self.citation_export_url {
            line(&mut out, "Citation link", url);
        }
        if let Some(excerpt) = &self.excerpt {
            line(&mut out, "Excerpt", excerpt);
        }
        out.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_skips_unset_fields() {
        let article = Article {
            title: Some("Foo".to_string()),
            year: Some(2010),
            citation_count: 3,
            ..Article::default()
        };

        let text = article.as_text();
        assert!(text.contains("Title:"));
        assert!(text.contains("Foo"));
        assert!(text.contains("Year:"));
        assert!(text.contains("Citations:"));
        assert!(!text.contains("URL:"));
        assert!(!text.contains("Versions:"));
        assert!(!text.contains("Excerpt:"));
    }

    #[test]
    fn test_as_text_empty_article() {
        assert_eq!(Article::default().as_text(), "");
    }
}
