//! Throttled page fetcher.
//!
//! The rate site serves windows-1251 encoded HTML. Decoding it as UTF-8
//! silently mangles every Cyrillic currency and country name, so the body
//! is always decoded as windows-1251 regardless of response headers.

use std::sync::Arc;
use std::time::Duration;

use encoding_rs::WINDOWS_1251;
use log::debug;
use reqwest::redirect::Policy;
use reqwest::Client;
use scraper::Html;

use super::rate_limiter::RateLimiter;
use crate::errors::MarketDataError;

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-request options.
#[derive(Clone, Copy, Debug, Default)]
pub struct FetchOptions {
    /// Follow 3xx responses. Off unless a caller asks for it.
    pub allow_redirects: bool,
}

/// Fetches pages from the rate site through a shared [`RateLimiter`].
///
/// A fetcher owns the HTTP connection pool of one synchronization pass and
/// is dropped with it.
pub struct PageFetcher {
    client: Client,
    redirecting_client: Client,
    limiter: Arc<RateLimiter>,
}

impl PageFetcher {
    /// Create a fetcher paced by `limiter`.
    pub fn new(limiter: Arc<RateLimiter>) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .redirect(Policy::none())
            .build()?;
        let redirecting_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            redirecting_client,
            limiter,
        })
    }

    /// Fetch `url` without following redirects and parse it.
    pub async fn fetch(&self, url: &str) -> Result<Html, MarketDataError> {
        self.fetch_with(url, FetchOptions::default()).await
    }

    /// Fetch `url` with explicit options and parse it.
    pub async fn fetch_with(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Html, MarketDataError> {
        let body = self.fetch_text(url, options).await?;
        Ok(Html::parse_document(&body))
    }

    /// Fetch `url` and return the decoded body.
    pub async fn fetch_text(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<String, MarketDataError> {
        if url.contains('{') || url.contains('}') {
            return Err(MarketDataError::UnformattedUrl(url.to_string()));
        }

        self.limiter.wait().await;
        debug!("GET {}", url);

        let client = if options.allow_redirects {
            &self.redirecting_client
        } else {
            &self.client
        };
        let response = client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        decode_page(url, &bytes)
    }
}

/// Decode a raw page body as windows-1251.
pub fn decode_page(url: &str, bytes: &[u8]) -> Result<String, MarketDataError> {
    let (text, _, had_errors) = WINDOWS_1251.decode(bytes);
    if had_errors {
        return Err(MarketDataError::Decode {
            url: url.to_string(),
            encoding: WINDOWS_1251.name(),
        });
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn fetcher() -> PageFetcher {
        PageFetcher::new(Arc::new(RateLimiter::new(Duration::ZERO))).unwrap()
    }

    fn cp1251(text: &str) -> Vec<u8> {
        let (bytes, _, _) = WINDOWS_1251.encode(text);
        bytes.into_owned()
    }

    #[test]
    fn test_decode_page_cyrillic() {
        let bytes = cp1251("Доллар США");
        assert_eq!(decode_page("x", &bytes).unwrap(), "Доллар США");
    }

    #[tokio::test]
    async fn test_fetch_decodes_windows_1251() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/currency/rates/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(cp1251(
                "<html><body><table><tbody><tr><td>USD</td><td>Доллар США</td></tr></tbody></table></body></html>",
            ))
            .create_async()
            .await;

        let url = format!("{}/currency/rates/", server.url());
        let document = fetcher().fetch(&url).await.unwrap();

        let td = Selector::parse("td").unwrap();
        let cells: Vec<String> = document
            .select(&td)
            .map(|cell| cell.text().collect())
            .collect();
        assert_eq!(cells, vec!["USD", "Доллар США"]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unformatted_url_is_rejected_before_request() {
        let result = fetcher()
            .fetch("http://127.0.0.1:1/currency/rates/?bd={day}")
            .await;
        assert!(matches!(result, Err(MarketDataError::UnformattedUrl(_))));
    }

    #[tokio::test]
    async fn test_redirects_not_followed_by_default() {
        let mut server = mockito::Server::new_async().await;
        let target = format!("{}/moved", server.url());
        server
            .mock("GET", "/old")
            .with_status(302)
            .with_header("location", &target)
            .create_async()
            .await;
        server
            .mock("GET", "/moved")
            .with_status(200)
            .with_body("<p>moved</p>")
            .create_async()
            .await;

        let url = format!("{}/old", server.url());
        let fetcher = fetcher();

        let result = fetcher.fetch(&url).await;
        assert!(matches!(
            result,
            Err(MarketDataError::HttpStatus { status: 302, .. })
        ));

        let body = fetcher
            .fetch_text(
                &url,
                FetchOptions {
                    allow_redirects: true,
                },
            )
            .await
            .unwrap();
        assert!(body.contains("moved"));
    }

    #[tokio::test]
    async fn test_server_error_is_reported() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/broken")
            .with_status(500)
            .create_async()
            .await;

        let url = format!("{}/broken", server.url());
        let result = fetcher().fetch(&url).await;
        assert!(matches!(
            result,
            Err(MarketDataError::HttpStatus { status: 500, .. })
        ));
    }
}
