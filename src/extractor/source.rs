use url::Url;

use crate::extractor::errors::ExtractionError;

pub const DEFAULT_ALLOWED_HOST: &str = "mp.weixin.qq.com";

/// Which URLs the extractor is willing to fetch: http(s) on exactly one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePolicy {
    allowed_host: String,
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ALLOWED_HOST)
    }
}

impl SourcePolicy {
    pub fn new(allowed_host: impl Into<String>) -> Self {
        Self {
            allowed_host: allowed_host.into().trim().to_ascii_lowercase(),
        }
    }

    pub fn allowed_host(&self) -> &str {
        &self.allowed_host
    }

    pub fn validate(&self, raw: &str) -> Result<Url, ExtractionError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ExtractionError::Validation("url is empty".to_string()));
        }

        let url = Url::parse(raw)
            .map_err(|e| ExtractionError::Validation(format!("malformed url: {}", e)))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ExtractionError::Validation(format!(
                "unsupported scheme: {}",
                url.scheme()
            )));
        }

        match url.host_str() {
            Some(host) if host.eq_ignore_ascii_case(&self.allowed_host) => Ok(url),
            Some(host) => Err(ExtractionError::Validation(format!(
                "unsupported host: {}",
                host
            ))),
            None => Err(ExtractionError::Validation("url has no host".to_string())),
        }
    }
}
