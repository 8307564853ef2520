//! Title and body recovery through ordered fallback selector chains.
//!
//! Each chain is a list of rules tried in order; the first rule that yields
//! non-blank text wins. Adding a selector means adding a rule, not a branch.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

use crate::extractor::{
    errors::ExtractionError,
    images,
    model::{ExtractedArticle, MAX_IMAGES, collapse_inline},
    reject,
};

/// Most specific article-title markers first, generic tags after them. The
/// `og:title` meta tag is only consulted when no heading or `<title>` has text.
pub const TITLE_RULES: &[RuleSpec] = &[
    RuleSpec::Text("h1#activity-name"),
    RuleSpec::Text("h1.rich_media_title"),
    RuleSpec::Text("h2#activity-name"),
    RuleSpec::Text("h2.rich_media_title"),
    RuleSpec::Text(".rich_media_title"),
    RuleSpec::Text("h1"),
    RuleSpec::Text("title"),
    RuleSpec::MetaContent("meta[property='og:title']"),
];

/// Main content containers first, generic article/content containers last.
pub const BODY_RULES: &[RuleSpec] = &[
    RuleSpec::Text("#js_content"),
    RuleSpec::Text(".rich_media_content"),
    RuleSpec::Text("#img-content"),
    RuleSpec::Text(".rich_media_area_primary"),
    RuleSpec::Text("article"),
    RuleSpec::Text(".content"),
];

static DEFAULT_TITLE_CHAIN: LazyLock<FallbackChain> = LazyLock::new(|| {
    FallbackChain::build(TextMode::Inline, TITLE_RULES).expect("built-in title selectors parse")
});

static DEFAULT_BODY_CHAIN: LazyLock<FallbackChain> = LazyLock::new(|| {
    FallbackChain::build(TextMode::Separated, BODY_RULES).expect("built-in body selectors parse")
});

/// Never descended into when flattening text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe", "svg"];

/// Declarative form of a rule, compiled by [`FallbackChain::build`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSpec {
    Text(&'static str),
    MetaContent(&'static str),
}

impl RuleSpec {
    pub fn css(&self) -> &'static str {
        match self {
            Self::Text(css) | Self::MetaContent(css) => *css,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SelectorRule {
    /// Flattened text of the first matching element whose text is not blank.
    Text(Selector),
    /// `content` attribute of the first matching element that has a non-blank one.
    MetaContent(Selector),
}

/// How the text nodes under a matched element are joined. Either way the
/// result is one line with whitespace runs collapsed to single spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Text nodes concatenated as they appear.
    Inline,
    /// Every text node is its own piece, so `a<b>b</b>c` reads `a b c`.
    Separated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: String,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct FallbackChain {
    mode: TextMode,
    rules: Vec<(String, SelectorRule)>,
}

impl FallbackChain {
    pub fn build(mode: TextMode, specs: &[RuleSpec]) -> Result<Self, String> {
        let rules = specs
            .iter()
            .map(|spec| {
                let css = spec.css();
                let selector = Selector::parse(css)
                    .map_err(|e| format!("invalid selector {:?}: {}", css, e))?;
                let rule = match spec {
                    RuleSpec::Text(_) => SelectorRule::Text(selector),
                    RuleSpec::MetaContent(_) => SelectorRule::MetaContent(selector),
                };
                Ok((css.to_string(), rule))
            })
            .collect::<Result<Vec<_>, String>>()?;

        Ok(Self { mode, rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn first_match(&self, document: &Html) -> Option<RuleMatch> {
        self.rules.iter().find_map(|(css, rule)| {
            self.apply(rule, document).map(|text| RuleMatch {
                rule: css.clone(),
                text,
            })
        })
    }

    fn apply(&self, rule: &SelectorRule, document: &Html) -> Option<String> {
        match rule {
            SelectorRule::Text(selector) => document
                .select(selector)
                .map(|element| self.element_text(element))
                .find(|text| !text.is_empty()),
            SelectorRule::MetaContent(selector) => document
                .select(selector)
                .filter_map(|element| element.value().attr("content"))
                .map(collapse_inline)
                .find(|text| !text.is_empty()),
        }
    }

    fn element_text(&self, element: ElementRef<'_>) -> String {
        let mut pieces = Vec::new();
        text_nodes(element, &mut pieces);
        let separator = match self.mode {
            TextMode::Inline => "",
            TextMode::Separated => " ",
        };
        collapse_inline(&pieces.join(separator))
    }
}

fn text_nodes<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            if SKIPPED_TAGS.contains(&child.value().name()) {
                continue;
            }
            text_nodes(child, out);
        }
    }
}

/// Turns an HTML document into an [`ExtractedArticle`] or a typed failure.
#[derive(Debug, Clone)]
pub struct ArticleParser {
    title: FallbackChain,
    body: FallbackChain,
}

impl Default for ArticleParser {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE_CHAIN.clone(), DEFAULT_BODY_CHAIN.clone())
    }
}

impl ArticleParser {
    pub fn new(title: FallbackChain, body: FallbackChain) -> Self {
        Self { title, body }
    }

    pub fn parse(&self, html: &str) -> Result<ExtractedArticle, ExtractionError> {
        let document = Html::parse_document(html);

        let title = self.title.first_match(&document);
        let body = self.body.first_match(&document);
        debug!(
            title_rule = ?title.as_ref().map(|m| m.rule.as_str()),
            body_rule = ?body.as_ref().map(|m| m.rule.as_str()),
            "Fallback chains evaluated"
        );

        let title = title.map(|m| m.text).unwrap_or_default();
        let body = body.map(|m| m.text).unwrap_or_default();
        reject::check_sufficient(&title, &body)?;

        let images = images::collect_images(&document, MAX_IMAGES);
        Ok(ExtractedArticle::new(&title, &body, images))
    }
}
