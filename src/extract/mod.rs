//! Main-content extraction
//!
//! Turns a raw HTML page into the plain text of its main article, or reports
//! that no main-content block could be found. There is no fallback to dumping
//! the whole page: a page without a recognizable article is skipped.
//!
//! # Heuristic
//!
//! 1. Try well-known content containers in order (`article`, `main`,
//!    `[role=main]`, `#content`, ...). The first one whose text reaches the
//!    minimum length wins.
//! 2. Otherwise score every element by the text of the paragraphs directly
//!    inside it (and half of that for its parent) and take the best one.
//! 3. Render the chosen element to text, dropping navigation, scripts, forms
//!    and similar chrome. Block elements become paragraph breaks.

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

/// Containers that usually hold the main article, in order of preference
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#content",
    "#main-content",
    ".post-content",
    ".entry-content",
    ".article-body",
];

/// Elements whose content is never part of the extracted text
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "header", "footer", "aside", "form", "iframe", "svg",
    "button", "template", "select", "textarea",
];

/// Elements that start a new paragraph
const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "blockquote",
    "br",
    "dd",
    "div",
    "dl",
    "dt",
    "figcaption",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "hr",
    "li",
    "main",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Paragraphs shorter than this do not count towards a container's score
const MIN_PARAGRAPH_CHARS: usize = 25;

/// Text extracted from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// Page title, if one was found
    pub title: Option<String>,
    /// Main-content plaintext, paragraphs separated by blank lines
    pub text: String,
}

/// Extracts the main article text from an HTML page
///
/// # Arguments
///
/// * `html` - The raw HTML
/// * `min_chars` - Minimum number of characters the main text must have
///
/// # Returns
///
/// * `Some(Extracted)` - Title and main-content text
/// * `None` - No main-content block was found, or it was too short
///
/// # Example
///
/// ```
/// use corpus_scraper::extract::extract_main_text;
///
/// let html = "<html><head><title>Doc</title></head><body>\
///             <nav>Home | About</nav>\
///             <article><p>The main story is here.</p></article></body></html>";
/// let extracted = extract_main_text(html, 10).unwrap();
/// assert_eq!(extracted.title.as_deref(), Some("Doc"));
/// assert_eq!(extracted.text, "The main story is here.");
/// ```
pub fn extract_main_text(html: &str, min_chars: usize) -> Option<Extracted> {
    let document = Html::parse_document(html);

    let text = container_text(&document, min_chars)
        .or_else(|| densest_block_text(&document))
        .filter(|text| text.chars().count() >= min_chars.max(1))?;

    Some(Extracted {
        title: extract_title(&document),
        text,
    })
}

/// Extracts the page title: `og:title`, then `<title>`, then the first `<h1>`
pub fn extract_title(document: &Html) -> Option<String> {
    let og_title = Selector::parse("meta[property='og:title']").ok().and_then(|sel| {
        document
            .select(&sel)
            .filter_map(|meta| meta.value().attr("content"))
            .map(collapse_whitespace)
            .find(|t| !t.is_empty())
    });

    og_title
        .or_else(|| first_text(document, "title"))
        .or_else(|| first_text(document, "h1"))
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

/// Text of the first well-known container that is long enough
fn container_text(document: &Html, min_chars: usize) -> Option<String> {
    for selector in CONTENT_SELECTORS {
        let Ok(parsed) = Selector::parse(selector) else {
            continue;
        };

        let best = document
            .select(&parsed)
            .filter(|element| !inside_skipped(element))
            .map(render_text)
            .max_by_key(|text| text.chars().count());

        if let Some(text) = best {
            if text.chars().count() >= min_chars.max(1) {
                tracing::trace!("Main content found via '{}'", selector);
                return Some(text);
            }
        }
    }
    None
}

/// Text of the element carrying the most paragraph text
fn densest_block_text(document: &Html) -> Option<String> {
    let selector = Selector::parse("p").ok()?;
    let mut scores: HashMap<_, usize> = HashMap::new();

    for paragraph in document.select(&selector) {
        if inside_skipped(&paragraph) {
            continue;
        }

        let len = collapse_whitespace(&paragraph.text().collect::<String>())
            .chars()
            .count();
        if len < MIN_PARAGRAPH_CHARS {
            continue;
        }

        if let Some(parent) = paragraph.parent() {
            *scores.entry(parent.id()).or_default() += len;
            if let Some(grandparent) = parent.parent() {
                *scores.entry(grandparent.id()).or_default() += len / 2;
            }
        }
    }

    let (best_id, _) = scores.into_iter().max_by_key(|(_, score)| *score)?;
    let best = document.tree.get(best_id).and_then(ElementRef::wrap)?;
    let text = render_text(best);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn inside_skipped(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .is_some_and(|e| SKIPPED_TAGS.contains(&e.name()))
    })
}

/// Renders an element to plain text
pub fn render_text(element: ElementRef) -> String {
    let mut builder = TextBuilder::default();
    walk(element, &mut builder);
    builder.finish()
}

fn walk(element: ElementRef, builder: &mut TextBuilder) {
    let name = element.value().name();
    if SKIPPED_TAGS.contains(&name) {
        return;
    }

    let is_block = BLOCK_TAGS.contains(&name);
    if is_block {
        builder.break_paragraph();
    }
    if name == "li" {
        builder.push_raw("- ");
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => builder.push_text(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    walk(child, builder);
                }
            }
            _ => {}
        }
    }

    if is_block {
        builder.break_paragraph();
    }
}

/// Accumulates text runs into whitespace-collapsed paragraphs
#[derive(Debug, Default)]
struct TextBuilder {
    paragraphs: Vec<String>,
    current: String,
    pending_space: bool,
}

impl TextBuilder {
    fn push_text(&mut self, text: &str) {
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }

        for (i, word) in text.split_whitespace().enumerate() {
            let needs_space = i > 0 || self.pending_space;
            if needs_space && !self.current.is_empty() && !self.current.ends_with(' ') {
                self.current.push(' ');
            }
            self.current.push_str(word);
            self.pending_space = false;
        }

        if text.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    fn push_raw(&mut self, text: &str) {
        self.current.push_str(text);
        self.pending_space = false;
    }

    fn break_paragraph(&mut self) {
        let paragraph = self.current.trim();
        // A list marker with no item text is dropped
        if !paragraph.is_empty() && paragraph != "-" {
            self.paragraphs.push(paragraph.to_string());
        }
        self.current.clear();
        self.pending_space = false;
    }

    fn finish(mut self) -> String {
        self.break_paragraph();
        self.paragraphs.join("\n\n")
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
