//! # rustscholar
//!
//! Google Scholar client library: builds advanced-search and cluster-lookup
//! URLs, scrapes result pages into structured article records, and enriches
//! each record with its citation-export payload.
//!
//! ## Modules
//!
//! - [`query`] - query construction and URL encoding
//! - [`parser`] - result-page HTML extraction
//! - [`querier`] - search orchestration and citation enrichment
//! - [`fetch`] - the injected fetch capability and its reqwest implementation
//! - [`article`] - the extracted article record
//! - [`cookies`] - cookie persistence
//! - [`config`] - client configuration
//! - [`error`] - error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rustscholar::{HttpFetcher, Query, ScholarConfig, ScholarQuerier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ScholarConfig::default();
//!     let fetcher = HttpFetcher::new(&config)?;
//!     let querier = ScholarQuerier::new(config, fetcher)?;
//!
//!     let query = Query {
//!         author: Some("Albert Einstein".to_string()),
//!         exact_phrase: Some("quantum theory".to_string()),
//!         ..Query::default()
//!     };
//!
//!     let outcome = querier.search(&query).await?;
//!     println!("Found {} articles", outcome.articles.len());
//!     Ok(())
//! }
//! ```

pub mod article;
pub mod config;
pub mod cookies;
pub mod error;
pub mod fetch;
pub mod parser;
pub mod query;
pub mod querier;

pub use article::Article;
pub use config::ScholarConfig;
pub use error::{Result, ScholarError};
pub use fetch::{Fetcher, HttpFetcher, TransportError};
pub use parser::ParseOutcome;
pub use query::Query;
pub use querier::ScholarQuerier;
