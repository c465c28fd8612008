use regex::Regex;
use reqwest::{Client, RequestBuilder};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::{ScraperConfig, SearchMode};
use crate::models::aspect::AspectRatio;
use crate::services::host::RatioLookup;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("title or year is missing")]
    MissingQuery,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no {0} found")]
    NotFound(&'static str),

    #[error("could not parse {0}")]
    ParseFailed(String),
}

/// Patterns scanned over search results and movie pages.
struct PageRegex {
    /// Result links follow `/movies/<slug>/<numeric id>/`; their class names do not.
    search_link: Regex,
    /// Only quoted items that are movie links; the endpoint also returns title arrays.
    quick_link: Regex,
    ratio: Regex,
}

impl PageRegex {
    fn get() -> Option<&'static Self> {
        static INSTANCE: OnceLock<Option<PageRegex>> = OnceLock::new();
        INSTANCE
            .get_or_init(|| {
                Some(Self {
                    search_link: Regex::new(
                        r#"<a [^>]*?href="((?:https?://[^"/]+)?/movies/[^"]+?/\d+/)""#,
                    )
                    .ok()?,
                    quick_link: Regex::new(
                        r#"new Array\([^)]*?['"]((?:https?://[^'"/]+)?/movies/[^'"]+)['"]"#,
                    )
                    .ok()?,
                    ratio: Regex::new(r"Aspect ratio:\s*(\d+\.\d{2}):1").ok()?,
                })
            })
            .as_ref()
    }
}

/// First movie link on a search results page.
#[must_use]
pub fn extract_search_link(html: &str) -> Option<String> {
    let re = PageRegex::get()?;
    re.search_link
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).to_string())
}

/// First movie URL inside a `new Array(...)` literal returned by the quick-search endpoint.
#[must_use]
pub fn extract_quicksearch_link(script: &str) -> Option<String> {
    let re = PageRegex::get()?;
    re.quick_link
        .captures(script)
        .and_then(|c| c.get(1))
        .map(|m| html_escape::decode_html_entities(m.as_str()).to_string())
}

fn find_ratio(html: &str) -> Result<AspectRatio, LookupError> {
    let re = PageRegex::get().ok_or(LookupError::NotFound("ratio pattern"))?;
    let raw = re
        .ratio
        .captures(html)
        .and_then(|c| c.get(1))
        .ok_or(LookupError::NotFound("aspect ratio on the movie page"))?
        .as_str();

    raw.parse::<f64>()
        .ok()
        .and_then(AspectRatio::new)
        .ok_or_else(|| LookupError::ParseFailed(format!("aspect ratio {raw:?}")))
}

/// The `D.DD` from an `Aspect ratio: D.DD:1` field.
#[must_use]
pub fn extract_ratio(html: &str) -> Option<AspectRatio> {
    find_ratio(html).ok()
}

#[derive(Debug, Clone)]
pub struct BluRayClient {
    client: Client,
    base_url: Url,
    mode: SearchMode,
    country: String,
}

impl BluRayClient {
    /// Creates a client that identifies as a browser and gives up after the configured timeout.
    ///
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &ScraperConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| anyhow::anyhow!("Invalid scraper base URL: {e}"))?;

        Ok(Self {
            client,
            base_url,
            mode: config.mode,
            country: config.country.clone(),
        })
    }

    fn search_url(&self, query: &str) -> Result<Url, LookupError> {
        let mut url = self
            .base_url
            .join("/search/")
            .map_err(|e| LookupError::ParseFailed(format!("search URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("quicksearch", "1")
            .append_pair("quicksearch_country", &self.country)
            .append_pair("quicksearch_keyword", query)
            .append_pair("section", "all");
        Ok(url)
    }

    fn quicksearch_url(&self) -> Result<Url, LookupError> {
        self.base_url
            .join("/search/quicksearch.php")
            .map_err(|e| LookupError::ParseFailed(format!("quick search URL: {e}")))
    }

    fn resolve(&self, link: &str) -> Result<Url, LookupError> {
        self.base_url
            .join(link)
            .map_err(|e| LookupError::ParseFailed(format!("movie link {link:?}: {e}")))
    }

    async fn fetch_text(request: RequestBuilder) -> Result<String, LookupError> {
        Ok(request.send().await?.error_for_status()?.text().await?)
    }

    async fn find_movie_page(&self, query: &str) -> Result<Url, LookupError> {
        let link = match self.mode {
            SearchMode::HtmlSearch => {
                let url = self.search_url(query)?;
                debug!("GET {url}");
                let html = Self::fetch_text(self.client.get(url)).await?;
                extract_search_link(&html)
            }
            SearchMode::QuickSearch => {
                let url = self.quicksearch_url()?;
                debug!("POST {url}");
                let form = [
                    ("section", "bluraymovies"),
                    ("userid", "-1"),
                    ("country", self.country.as_str()),
                    ("keyword", query),
                ];
                let script = Self::fetch_text(self.client.post(url).form(&form)).await?;
                extract_quicksearch_link(&script)
            }
        }
        .ok_or(LookupError::NotFound("movie link in search results"))?;

        self.resolve(&link)
    }
}

#[async_trait::async_trait]
impl RatioLookup for BluRayClient {
    async fn lookup(&self, title: &str, year: &str) -> Result<AspectRatio, LookupError> {
        if title.trim().is_empty() || year.trim().is_empty() {
            return Err(LookupError::MissingQuery);
        }

        let query = format!("{} {}", title.trim(), year.trim());
        info!("Searching online for aspect ratio of: {query}");

        let page = self.find_movie_page(&query).await?;
        info!("Found movie page link: {page}");

        let html = Self::fetch_text(self.client.get(page)).await?;
        let ratio = find_ratio(&html)?;

        info!("Successfully scraped aspect ratio: {}", ratio.value());
        Ok(ratio)
    }
}
