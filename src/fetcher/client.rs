use crate::fetcher::{
    errors::FetchError,
    pipeline::process_response,
    types::{FetchOptions, PageResponse},
};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS};
use reqwest::{Client, ClientBuilder};
use tracing::{debug, instrument};
use url::Url;

/// Build a client that presents itself like a desktop browser.
///
/// Idle connections are not kept: every fetch is a one-shot request.
pub fn build_client(options: &FetchOptions) -> Result<Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value(&options.accept)?);
    headers.insert(ACCEPT_LANGUAGE, header_value(&options.accept_language)?);
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    ClientBuilder::new()
        .connect_timeout(options.connect_timeout)
        .timeout(options.timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .pool_max_idle_per_host(0)
        .default_headers(headers)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| FetchError::Client(e.to_string()))
}

/// Single GET, no retries. Non-2xx statuses are errors.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch(client: &Client, url: &Url, max_body_size: u64) -> Result<PageResponse, FetchError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    // Check content length before downloading
    if let Some(content_length) = response.content_length()
        && content_length > max_body_size
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http { status });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !is_html(&content_type) {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Content-Length may be missing or wrong
    if body_bytes.len() as u64 > max_body_size {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    debug!(
        final_url = %final_url,
        %status,
        bytes = body_bytes.len(),
        "Fetched page"
    );

    Ok(process_response(final_url, status, content_type, body_bytes))
}

/// Media types are case-insensitive; parameters such as charset are ignored.
fn is_html(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    matches!(essence.as_str(), "text/html" | "application/xhtml+xml")
}
