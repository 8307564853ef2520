use std::fs;

use crate::extractor::{
    ArticleParser, ExtractionError, InsufficientReason,
    model::{MAX_BODY_CHARS, MAX_IMAGES},
};

fn parse_fixture(name: &str) -> Result<crate::extractor::ExtractedArticle, ExtractionError> {
    let html = fs::read_to_string(format!("src/extractor/tests/fixtures/{}", name))
        .expect("Failed to read test fixture");
    ArticleParser::default().parse(&html)
}

#[test]
fn test_extract_platform_article() {
    let article = parse_fixture("wechat_article.html").unwrap();

    assert_eq!(article.title, "我们的第一次马拉松：四十二公里的记录");
    assert_eq!(
        article.body,
        "清晨五点半，我们在起点集合。 天气很冷， 但是 大家的情绪都很高。 三十公里之后是最艰难的一段路。 最后我们一起冲过了终点线！"
    );
    assert!(!article.body.contains("msg_title"));
    assert!(!article.body.contains("跑步日记"));

    // Images outside the content container count; relative paths are dropped.
    assert_eq!(
        article.images,
        vec![
            "https://mmbiz.qpic.cn/avatar/head.png",
            "https://mmbiz.qpic.cn/mmbiz_jpg/start.jpg",
            "https://mmbiz.qpic.cn/qrcode/footer.png",
        ]
    );
}

#[test]
fn test_extract_generic_article_via_fallbacks() {
    let article = parse_fixture("generic_article.html").unwrap();

    assert_eq!(article.title, "Reading Notes");
    assert_eq!(
        article.body,
        "This week I finished two books about distributed systems. The second one had a great chapter on consensus."
    );
    assert!(article.images.is_empty());
}

#[test]
fn test_reject_login_wall() {
    let result = parse_fixture("login_wall.html");

    assert!(matches!(
        result,
        Err(ExtractionError::InsufficientContent(
            InsufficientReason::TooShort {
                title_chars: 2,
                body_chars: 10
            }
        ))
    ));
}

#[test]
fn test_reject_empty_page() {
    let result = parse_fixture("empty.html");

    assert!(matches!(
        result,
        Err(ExtractionError::InsufficientContent(
            InsufficientReason::NothingFound
        ))
    ));
}

#[test]
fn test_short_title_and_body_at_boundary() {
    let html = r#"<html><body><h1>abc</h1><div id="js_content">0123456789</div></body></html>"#;
    let result = ArticleParser::default().parse(html);

    assert!(matches!(
        result,
        Err(ExtractionError::InsufficientContent(
            InsufficientReason::TooShort {
                title_chars: 3,
                body_chars: 10
            }
        ))
    ));
}

#[test]
fn test_long_body_is_truncated_not_rejected() {
    let html = format!(
        r#"<html><body><h1 id="activity-name">A long read</h1><div id="js_content"><p>{}</p></div></body></html>"#,
        "x".repeat(3000)
    );
    let article = ArticleParser::default().parse(&html).unwrap();

    assert_eq!(article.title, "A long read");
    assert_eq!(article.body.chars().count(), MAX_BODY_CHARS);
}

#[test]
fn test_long_title_is_truncated() {
    let html = format!(
        r#"<html><body><h1 id="activity-name">{}</h1></body></html>"#,
        "标".repeat(450)
    );
    let article = ArticleParser::default().parse(&html).unwrap();

    assert_eq!(article.title.chars().count(), 200);
    assert!(article.body.is_empty());
}

#[test]
fn test_image_list_capped_in_document_order() {
    let images: String = (0..15)
        .map(|i| format!(r#"<img data-src="https://mmbiz.qpic.cn/{i}.png">"#))
        .collect();
    let html = format!(
        r#"<html><body><h1 id="activity-name">Photo essay</h1><div id="js_content"><p>Some words about the photos below.</p>{}</div></body></html>"#,
        images
    );
    let article = ArticleParser::default().parse(&html).unwrap();

    assert_eq!(article.images.len(), MAX_IMAGES);
    assert_eq!(article.images[0], "https://mmbiz.qpic.cn/0.png");
    assert_eq!(article.images[9], "https://mmbiz.qpic.cn/9.png");
}

#[test]
fn test_malformed_html() {
    let html = "<html><head><title>Broken page</title><body><article><p>Unclosed tags<div>More content here";
    let article = ArticleParser::default().parse(html).unwrap();

    assert_eq!(article.title, "Broken page");
    assert!(article.body.contains("Unclosed tags"));
    assert!(article.body.contains("More content here"));
}

#[cfg(feature = "fuzz")]
mod fuzz {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_parse_never_panics(html in ".*") {
            let _ = ArticleParser::default().parse(&html);
        }

        #[test]
        fn test_success_respects_limits(body in "[a-z ]{0,3000}") {
            let html = format!(
                r#"<h1 id="activity-name">Title here</h1><div id="js_content">{}</div>"#,
                body
            );
            if let Ok(article) = ArticleParser::default().parse(&html) {
                prop_assert!(article.title.chars().count() <= 200);
                prop_assert!(article.body.chars().count() <= MAX_BODY_CHARS);
                prop_assert!(article.images.len() <= MAX_IMAGES);
            }
        }
    }
}
