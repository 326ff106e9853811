use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use tracing::warn;

use crate::catalog;
use crate::error::{Error, Result};
use crate::models::{Filters, Product};
use crate::query;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Marker strings the upstream's anti-bot layer leaves in blocked
/// responses, lowercased for the comparison.
const BLOCK_MARKERS: &[&str] = &[
    "captcha",
    "access denied",
    "zugriff verweigert",
    "cf-browser-verification",
    "are you a robot",
];

/// One shared client for search and detail-page requests, built once per
/// process and passed by reference.
pub fn build_http_client() -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("de-DE,de;q=0.9,en;q=0.8"));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(Error::from)
}

/// What a search attempt produced: a live response body to normalize, or
/// one of the static catalogs to return verbatim.
#[derive(Debug)]
pub enum FetchOutcome {
    Live(serde_json::Value),
    Static(Vec<Product>),
}

pub struct ProductFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl ProductFetcher {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Runs the compiled search against the upstream. The floors flag
    /// short-circuits to the static catalog before anything is compiled;
    /// `limit`/`offset` do not apply on that path.
    pub async fn fetch(&self, filters: &Filters, limit: u32, offset: u32) -> Result<FetchOutcome> {
        if filters.is_floors_search {
            return Ok(FetchOutcome::Static(catalog::floors()));
        }

        let compiled = query::compile(filters, limit, offset);
        let url = compiled.request_url(&self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if looks_blocked(&body) {
                warn!("Upstream blocked the search (status {}), serving the static fallback catalog.", status);
                return Ok(FetchOutcome::Static(catalog::blocked_fallback()));
            }
            return Err(Error::Upstream {
                status: status.as_u16(),
                body: truncate(body),
            });
        }

        match serde_json::from_str::<serde_json::Value>(&body) {
            Ok(value) if has_search_shape(&value) && !looks_blocked(&body) => Ok(FetchOutcome::Live(value)),
            _ => {
                warn!("Upstream body is not a search result, serving the static fallback catalog.");
                Ok(FetchOutcome::Static(catalog::blocked_fallback()))
            }
        }
    }
}

fn looks_blocked(body: &str) -> bool {
    let lowered = body.to_lowercase();
    BLOCK_MARKERS.iter().any(|marker| lowered.contains(marker))
}

fn has_search_shape(value: &serde_json::Value) -> bool {
    value.get("data").and_then(|data| data.get("categories")).is_some()
}

fn truncate(mut body: String) -> String {
    if let Some((index, _)) = body.char_indices().nth(500) {
        body.truncate(index);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fetcher(base_url: &str) -> ProductFetcher {
        ProductFetcher::new(reqwest::Client::new(), base_url.to_string())
    }

    #[tokio::test]
    async fn floors_flag_bypasses_the_network() {
        // An unroutable base URL proves no request is made.
        let fetcher = fetcher("http://127.0.0.1:1");
        let filters = Filters {
            is_floors_search: true,
            ..Filters::default()
        };
        let outcome = fetcher.fetch(&filters, 10, 0).await.unwrap();
        match outcome {
            FetchOutcome::Static(products) => assert_eq!(products.len(), 5),
            FetchOutcome::Live(_) => panic!("floors search must not hit the live API"),
        }
    }

    #[tokio::test]
    async fn live_response_passes_through() {
        let mut server = mockito::Server::new_async().await;
        let body = json!({
            "data": {"categories": [{"categoryArticles": {"articles": []}}]}
        });
        let mock = server
            .mock("GET", "/graphql")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await;

        let outcome = fetcher(&server.url()).fetch(&Filters::default(), 10, 0).await.unwrap();
        mock.assert_async().await;
        assert!(matches!(outcome, FetchOutcome::Live(_)));
    }

    #[tokio::test]
    async fn blocked_body_degrades_to_the_fallback_catalog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/graphql")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("<html>Please solve this CAPTCHA to continue</html>")
            .create_async()
            .await;

        let outcome = fetcher(&server.url()).fetch(&Filters::default(), 10, 0).await.unwrap();
        match outcome {
            FetchOutcome::Static(products) => {
                assert!(!products.is_empty());
                assert!(products.iter().all(|p| p.dimensions.is_some()));
            }
            FetchOutcome::Live(_) => panic!("blocked responses must degrade"),
        }
    }

    #[tokio::test]
    async fn unparseable_success_body_degrades_to_the_fallback_catalog() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/graphql")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("<html>totally not json</html>")
            .create_async()
            .await;

        let outcome = fetcher(&server.url()).fetch(&Filters::default(), 10, 0).await.unwrap();
        assert!(matches!(outcome, FetchOutcome::Static(_)));
    }

    #[tokio::test]
    async fn plain_upstream_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/graphql")
            .match_query(mockito::Matcher::Any)
            .with_status(503)
            .with_body("maintenance window")
            .create_async()
            .await;

        let err = fetcher(&server.url()).fetch(&Filters::default(), 10, 0).await.unwrap_err();
        match err {
            Error::Upstream { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("maintenance"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
