pub mod errors;
pub mod images;
pub mod model;
pub mod reader;
pub mod reject;
pub mod source;

#[cfg(test)]
mod tests;

pub use errors::{ExtractionError, InsufficientReason};
pub use model::ExtractedArticle;
pub use reader::{ArticleParser, FallbackChain, RuleSpec, TextMode};
pub use source::SourcePolicy;

use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::fetcher::{FetchError, FetchOptions, build_client, fetch};

/// Pulls a readable article out of a single page on the supported platform.
///
/// One validated GET per call, no retries and no caching.
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    policy: SourcePolicy,
    client: Client,
    max_body_size: u64,
    parser: ArticleParser,
}

impl ContentExtractor {
    pub fn new(policy: SourcePolicy, options: FetchOptions) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(&options)?,
            max_body_size: options.max_body_size,
            policy,
            parser: ArticleParser::default(),
        })
    }

    pub fn policy(&self) -> &SourcePolicy {
        &self.policy
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn extract(&self, url: &str) -> Result<ExtractedArticle, ExtractionError> {
        let url = self.policy.validate(url).inspect_err(|e| {
            warn!(error = %e, "Rejected extraction source");
        })?;

        let page = fetch(&self.client, &url, self.max_body_size)
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to fetch article page");
                ExtractionError::from(e)
            })?;

        let article = self.parser.parse(&page.body_utf8).inspect_err(|e| {
            warn!(error = %e, final_url = %page.url_final, "Extraction yielded no usable article");
        })?;

        info!(
            title_chars = article.title.chars().count(),
            body_chars = article.body.chars().count(),
            images = article.images.len(),
            "Extracted article"
        );
        Ok(article)
    }
}
