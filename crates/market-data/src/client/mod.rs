//! HTTP access to the rate site: request pacing and page fetching.

mod fetcher;
mod rate_limiter;

pub use fetcher::{decode_page, FetchOptions, PageFetcher};
pub use rate_limiter::{RateLimiter, DEFAULT_REQUEST_DELAY};
