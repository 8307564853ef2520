use crate::fetcher::types::PageResponse;
use bytes::Bytes;
use reqwest::StatusCode;
use tracing::warn;
use url::Url;

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    content_type: String,
    body_bytes: Bytes,
) -> PageResponse {
    let body_utf8 = decode_to_utf8(&body_bytes);

    PageResponse {
        url_final,
        status,
        content_type,
        body_raw: body_bytes,
        body_utf8,
    }
}

/// Always decodes as UTF-8, ignoring any charset the server or the markup
/// declares; the source platform is known to mis-declare it. Malformed
/// sequences become U+FFFD and a leading UTF-8 BOM is dropped.
pub fn decode_to_utf8(body_bytes: &[u8]) -> String {
    let (decoded, had_errors) = encoding_rs::UTF_8.decode_with_bom_removal(body_bytes);

    if had_errors {
        warn!(
            bytes = body_bytes.len(),
            "Response body is not valid UTF-8; malformed sequences replaced"
        );
    }

    decoded.into_owned()
}
