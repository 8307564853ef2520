#![no_main]

use libfuzzer_sys::fuzz_target;

use annals::extractor::ArticleParser;
use annals::fetcher::pipeline::decode_to_utf8;

fuzz_target!(|data: &[u8]| {
    let html = decode_to_utf8(data);

    // Any outcome is fine as long as parsing never panics and limits hold.
    if let Ok(article) = ArticleParser::default().parse(&html) {
        assert!(article.title.chars().count() <= 200);
        assert!(article.body.chars().count() <= 1000);
        assert!(article.images.len() <= 10);
    }
});
