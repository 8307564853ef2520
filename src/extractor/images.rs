use scraper::{Html, Selector, node::Element};
use std::sync::LazyLock;
use url::Url;

static IMG_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());

/// `src` first, then the lazy-load attribute the platform uses.
const SOURCE_ATTRIBUTES: [&str; 2] = ["src", "data-src"];

/// Image URLs from every `<img>` in the document, in document order, capped at
/// `limit`. Images outside the content container count too.
pub fn collect_images(document: &Html, limit: usize) -> Vec<String> {
    document
        .select(&IMG_SELECTOR)
        .filter_map(|img| image_url(img.value()))
        .take(limit)
        .collect()
}

fn image_url(img: &Element) -> Option<String> {
    SOURCE_ATTRIBUTES
        .iter()
        .filter_map(|attr| img.attr(attr))
        .find_map(absolute_image_url)
}

/// Accepts absolute http(s) URLs as-is and rewrites protocol-relative ones to
/// https. Relative paths and other schemes (`data:`, `javascript:`) are dropped
/// rather than resolved.
pub fn absolute_image_url(src: &str) -> Option<String> {
    let src = src.trim();
    if src.is_empty() {
        return None;
    }

    let candidate = match src.strip_prefix("//") {
        Some(_) => format!("https:{}", src),
        None => src.to_string(),
    };

    let parsed = Url::parse(&candidate).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return None;
    }

    Some(candidate)
}
