//! Text content

use std::sync::OnceLock;

use pulldown_cmark::{html, Options, Parser};
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// A post element that contains formatted text.
///
/// The markup is produced by whatever edit session authored the text and is
/// stored verbatim; rendering returns it unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(default)]
    markup: String,
}

impl TextElement {
    /// Create a text element from already formatted markup
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Create a text element by rendering markdown to markup
    pub fn from_markdown(markdown: &str) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(markdown, options);
        let mut markup = String::new();
        html::push_html(&mut markup, parser);
        Self { markup }
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn set_markup(&mut self, markup: impl Into<String>) {
        self.markup = markup.into();
    }

    /// Plain text of the markup with trailing whitespace removed
    pub fn text(&self) -> String {
        markup_to_text(&self.markup).trim_end().to_string()
    }

    pub fn render(&self) -> String {
        self.markup.clone()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

struct TextPatterns {
    whitespace: Regex,
    line_break: Regex,
    block_end: Regex,
    tag: Regex,
    numeric_entity: Regex,
}

fn patterns() -> &'static TextPatterns {
    static PATTERNS: OnceLock<TextPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| TextPatterns {
        whitespace: Regex::new(r"\s+").expect("whitespace pattern"),
        line_break: Regex::new(r"(?i)<br\s*/?>").expect("line break pattern"),
        block_end: Regex::new(r"(?i)</(p|div|h[1-6]|li|blockquote)\s*>")
            .expect("block end pattern"),
        tag: Regex::new(r"<[^>]*>").expect("tag pattern"),
        numeric_entity: Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("entity pattern"),
    })
}

/// Flatten markup into the text a reader would see
fn markup_to_text(markup: &str) -> String {
    let p = patterns();

    let text = p.whitespace.replace_all(markup, " ");
    let text = p.line_break.replace_all(&text, "\n");
    let text = p.block_end.replace_all(&text, "\n\n");
    let text = p.tag.replace_all(&text, "");
    let text = p.numeric_entity.replace_all(&text, |caps: &Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_default()
    });

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
