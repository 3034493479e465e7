//! rustscholar - command-line Google Scholar client.
//!
//! ## Usage
//!
//! ```bash
//! rustscholar "quantum computing" --author "J Preskill" --after 2015 -c 5
//! rustscholar --cluster-id 1275980731835430123 --format json
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rustscholar::{HttpFetcher, Query, ScholarConfig, ScholarQuerier};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Query Google Scholar and print the parsed results.
#[derive(Parser)]
#[command(name = "rustscholar")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Free-text keywords that all must match
    keywords: Option<String>,

    /// Author names that must be on the result's author list
    #[arg(short, long)]
    author: Option<String>,

    /// Exact phrase that must appear in the results
    #[arg(short, long)]
    phrase: Option<String>,

    /// Words of which at least one must appear
    #[arg(long)]
    some_words: Option<String>,

    /// Words of which none may appear
    #[arg(long)]
    none_words: Option<String>,

    /// Publication in which the result must have appeared
    #[arg(long)]
    publication: Option<String>,

    /// Search in the title only
    #[arg(short = 't', long)]
    title_only: bool,

    /// Results must have appeared in or after this year
    #[arg(long)]
    after: Option<i32>,

    /// Results must have appeared in or before this year
    #[arg(long)]
    before: Option<i32>,

    /// Exclude patents from the results
    #[arg(long)]
    no_patents: bool,

    /// Exclude citation-only entries from the results
    #[arg(long)]
    no_citations: bool,

    /// Maximum number of results to request
    #[arg(short = 'c', long)]
    count: Option<u32>,

    /// Look up one article cluster instead of searching
    #[arg(long)]
    cluster_id: Option<String>,

    /// Mirror site base URL
    #[arg(long)]
    mirror: Option<String>,

    /// Proxy URL (e.g. http://127.0.0.1:7890)
    #[arg(long)]
    proxy: Option<String>,

    /// JSON cookie jar to send with requests
    #[arg(long)]
    cookie_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Aligned label/value listing per article
    Text,
    /// JSON array of articles
    Json,
    /// CSV, one row per article
    Csv,
}

impl Cli {
    fn query(&self) -> Query {
        Query {
            all_words: self.keywords.clone(),
            any_words: self.some_words.clone(),
            none_words: self.none_words.clone(),
            exact_phrase: self.phrase.clone(),
            title_only: self.title_only,
            author: self.author.clone(),
            publication: self.publication.clone(),
            start_year: self.after,
            end_year: self.before,
            include_patents: !self.no_patents,
            include_citations: !self.no_citations,
            result_limit: self.count,
            cluster_id: self.cluster_id.clone(),
        }
    }

    fn config(&self) -> ScholarConfig {
        let mut config = match &self.mirror {
            Some(mirror) => ScholarConfig::with_base_url(mirror),
            None => ScholarConfig::default(),
        };
        config.cookie_file = self.cookie_file.clone();
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::WARN };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));
    fmt().with_env_filter(filter).with_target(true).init();

    if let (Some(start), Some(end)) = (cli.after, cli.before) {
        if start > end {
            bail!("--after {} is later than --before {}", start, end);
        }
    }

    let config = cli.config();
    let query = cli.query();

    let fetcher = HttpFetcher::with_proxy(&config, cli.proxy.as_deref())?;
    let querier = ScholarQuerier::new(config, fetcher)?;

    let outcome = querier.search(&query).await?;

    match cli.format {
        OutputFormat::Text => {
            for article in &outcome.articles {
                println!("----------------------------------------");
                println!("{}", article.as_text());
            }
            println!("----------------------------------------");
            println!("Articles on this page: {}", outcome.articles.len());
            if let Some(total) = outcome.result_count {
                println!("Total results found:   {}", total);
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&outcome.articles)
                .context("Failed to serialize articles")?;
            println!("{}", json);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for article in &outcome.articles {
                writer
                    .serialize(article)
                    .context("Failed to write CSV row")?;
            }
            writer.flush().context("Failed to flush CSV output")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_query_fields() {
        let cli = Cli::parse_from([
            "rustscholar",
            "deep learning",
            "--author",
            "Y LeCun",
            "--phrase",
            "convolutional networks",
            "--after",
            "2012",
            "--no-patents",
            "-c",
            "5",
            "-t",
        ]);

        let query = cli.query();
        assert_eq!(query.all_words.as_deref(), Some("deep learning"));
        assert_eq!(query.author.as_deref(), Some("Y LeCun"));
        assert_eq!(query.exact_phrase.as_deref(), Some("convolutional networks"));
        assert_eq!(query.start_year, Some(2012));
        assert!(query.end_year.is_none());
        assert!(!query.include_patents);
        assert!(query.include_citations);
        assert_eq!(query.result_limit, Some(5));
        assert!(query.title_only);
    }

    #[test]
    fn test_mirror_flag_sets_base_url() {
        let cli = Cli::parse_from(["rustscholar", "x", "--mirror", "https://mirror.example.org/"]);
        assert_eq!(cli.config().base_url, "https://mirror.example.org");
    }
}
