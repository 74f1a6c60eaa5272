//! Web search over DuckDuckGo's HTML endpoint.
//!
//! The results page is parsed with `scraper`. Sponsored entries are skipped
//! and DuckDuckGo's `/l/?uddg=` redirect links are unwrapped to the real
//! destination.

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use sommelier_config::AppConfig;
use sommelier_core::error::ToolError;
use sommelier_core::tool::WebSearch;
use std::time::Duration;
use tracing::{debug, warn};

const TOOL_NAME: &str = "web_search";
const SNIPPET_CHARS: usize = 200;

/// One organic search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub source_url: String,
}

/// DuckDuckGo HTML search client.
pub struct SearchClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_results: usize,
}

impl SearchClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ToolError> {
        Ok(Self {
            client: crate::http_client(TOOL_NAME, timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            max_results: 3,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ToolError> {
        Ok(Self::new(
            &config.search.base_url,
            Duration::from_secs(config.timeouts.tool_secs),
        )?
        .with_max_results(config.search.max_results))
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Result count used when the caller does not ask for one.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Fetch and parse up to `max_results` hits for `query`.
    pub async fn hits(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
        let url = format!("{}/html/", self.base_url);
        debug!(query = %query, max_results, "Searching the web");

        let response = self
            .client
            .get(&url)
            .query(&[("q", query)])
            .send()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::UpstreamStatus {
                tool_name: TOOL_NAME.into(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| crate::request_error(TOOL_NAME, self.timeout, e))?;

        parse_results(&body, max_results)
    }

    /// Results rendered as a numbered list; every failure becomes text.
    pub async fn search_text(&self, query: &str, max_results: usize) -> String {
        match self.hits(query, max_results).await {
            Ok(hits) => render(&hits),
            Err(e) => {
                warn!(error = %e, "Web search failed");
                format!("Web search error: {e}")
            }
        }
    }
}

#[async_trait]
impl WebSearch for SearchClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<String, ToolError> {
        Ok(self.search_text(query, max_results).await)
    }
}

/// Render hits under the `Web Search Results:` header.
pub fn render(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return "No search results found.".into();
    }

    let entries: Vec<String> = hits
        .iter()
        .enumerate()
        .map(|(i, hit)| {
            let snippet: String = hit.snippet.chars().take(SNIPPET_CHARS).collect();
            format!(
                "{}. {}\n   {}...\n   Source: {}\n",
                i + 1,
                hit.title,
                snippet,
                hit.source_url
            )
        })
        .collect();

    format!("Web Search Results:\n{}", entries.join("\n"))
}

fn selector(css: &str) -> Result<Selector, ToolError> {
    Selector::parse(css).map_err(|e| ToolError::Malformed {
        tool_name: TOOL_NAME.into(),
        reason: format!("bad selector {css}: {e:?}"),
    })
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_results(body: &str, max_results: usize) -> Result<Vec<SearchHit>, ToolError> {
    let document = Html::parse_document(body);
    let result_sel = selector("div.result")?;
    let title_sel = selector("a.result__a")?;
    let snippet_sel = selector(".result__snippet")?;

    let hits = document
        .select(&result_sel)
        .filter(|result| !result.value().classes().any(|c| c == "result--ad"))
        .filter_map(|result| {
            let link = result.select(&title_sel).next()?;
            let href = link.value().attr("href")?;
            let snippet = result
                .select(&snippet_sel)
                .next()
                .map(element_text)
                .unwrap_or_default();
            Some(SearchHit {
                title: element_text(link),
                snippet,
                source_url: resolve_link(href),
            })
        })
        .take(max_results)
        .collect();

    Ok(hits)
}

/// Unwrap `//duckduckgo.com/l/?uddg=<encoded>` into the destination URL.
fn resolve_link(href: &str) -> String {
    let absolute = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    reqwest::Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or(absolute)
}
