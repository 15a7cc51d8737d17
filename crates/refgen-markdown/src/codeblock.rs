//! Fenced code block and code span extraction.
//!
//! Code is pulled out of the text before any other rewrite runs and kept in a
//! [`Stash`] behind opaque placeholders, so headings, bold, links, lists and
//! tables never see (or corrupt) the contents of a code block. The stash is
//! restored as the very last step of the pipeline.

use std::sync::LazyLock;

use regex::{Captures, Regex};

const BLOCK_OPEN: char = '\u{E000}';
const BLOCK_CLOSE: char = '\u{E001}';
const SPAN_OPEN: char = '\u{E002}';
const SPAN_CLOSE: char = '\u{E003}';

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(\w+)?\n(.*?)```").expect("Invalid fence regex")
});

static SPAN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`\n]+)`").expect("Invalid code span regex"));

static BLOCK_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E000}(\d+)\x{E001}").expect("Invalid block placeholder regex")
});

static SPAN_PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x{E002}(\d+)\x{E003}").expect("Invalid span placeholder regex")
});

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the opening fence, if any
    pub language: Option<String>,

    /// Everything between the opening fence line and the closing fence
    pub source: String,
}

impl CodeBlock {
    fn from_captures(caps: &Captures<'_>) -> Self {
        Self {
            language: caps.get(1).map(|m| m.as_str().to_string()),
            source: caps
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        }
    }

    /// Render as `<pre><code class="language-X">`. The source is not escaped.
    pub fn to_html(&self) -> String {
        format!(
            "<pre><code class=\"language-{}\">{}</code></pre>",
            self.language.as_deref().unwrap_or(""),
            self.source
        )
    }
}

/// Find every fenced code block in `markdown`, in document order.
pub fn find_code_blocks(markdown: &str) -> Vec<CodeBlock> {
    FENCE_RE
        .captures_iter(markdown)
        .map(|caps| CodeBlock::from_captures(&caps))
        .collect()
}

/// Remove fenced code blocks from `markdown` entirely.
pub(crate) fn strip_code_blocks(markdown: &str) -> String {
    FENCE_RE.replace_all(markdown, "").into_owned()
}

/// Rendered code held aside while the rest of the document is rewritten.
#[derive(Debug, Default)]
pub(crate) struct Stash {
    blocks: Vec<String>,
    spans: Vec<String>,
}

impl Stash {
    /// Replace fenced code blocks with block placeholders.
    pub fn code_blocks(&mut self, text: &str) -> String {
        FENCE_RE
            .replace_all(text, |caps: &Captures<'_>| {
                let html = CodeBlock::from_captures(caps).to_html();
                let id = self.blocks.len();
                self.blocks.push(html);
                format!("{BLOCK_OPEN}{id}{BLOCK_CLOSE}")
            })
            .into_owned()
    }

    /// Replace inline code spans with span placeholders.
    pub fn code_spans(&mut self, text: &str) -> String {
        SPAN_RE
            .replace_all(text, |caps: &Captures<'_>| {
                let id = self.spans.len();
                self.spans.push(format!("<code>{}</code>", &caps[1]));
                format!("{SPAN_OPEN}{id}{SPAN_CLOSE}")
            })
            .into_owned()
    }

    /// Put every stashed fragment back in place of its placeholder.
    pub fn restore(&self, text: &str) -> String {
        let text = SPAN_PLACEHOLDER_RE.replace_all(text, |caps: &Captures<'_>| {
            lookup(&self.spans, caps)
        });

        BLOCK_PLACEHOLDER_RE
            .replace_all(&text, |caps: &Captures<'_>| lookup(&self.blocks, caps))
            .into_owned()
    }
}

fn lookup(stored: &[String], caps: &Captures<'_>) -> String {
    caps[1]
        .parse::<usize>()
        .ok()
        .and_then(|id| stored.get(id))
        .cloned()
        .unwrap_or_else(|| caps[0].to_string())
}

/// Whether a line starts with a stashed code block.
pub(crate) fn is_block_placeholder(line: &str) -> bool {
    line.trim_start().starts_with(BLOCK_OPEN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_blocks_with_and_without_language() {
        let source = "```php\n$a = 1;\n```\n\ntext\n\n```\nplain\n```\n";

        let blocks = find_code_blocks(source);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].language.as_deref(), Some("php"));
        assert_eq!(blocks[0].source, "$a = 1;\n");
        assert_eq!(blocks[1].language, None);
        assert_eq!(blocks[1].source, "plain\n");
    }

    #[test]
    fn renders_block_without_escaping() {
        let block = CodeBlock {
            language: Some("html".to_string()),
            source: "<b>hi</b>\n".to_string(),
        };

        assert_eq!(
            block.to_html(),
            "<pre><code class=\"language-html\"><b>hi</b>\n</code></pre>"
        );
    }

    #[test]
    fn empty_language_class_when_untagged() {
        let block = CodeBlock {
            language: None,
            source: "x\n".to_string(),
        };

        assert!(block.to_html().starts_with("<pre><code class=\"language-\">"));
    }

    #[test]
    fn stash_round_trips_blocks_and_spans() {
        let mut stash = Stash::default();
        let text = "see `a**b**c`\n```\n# not a heading\n```\n";

        let hidden = stash.code_blocks(text);
        let hidden = stash.code_spans(&hidden);

        assert!(!hidden.contains('`'));
        assert!(!hidden.contains("# not a heading"));

        let restored = stash.restore(&hidden);
        assert_eq!(
            restored,
            "see <code>a**b**c</code>\n<pre><code class=\"language-\"># not a heading\n</code></pre>\n"
        );
    }

    #[test]
    fn unclosed_fence_is_left_alone() {
        let mut stash = Stash::default();
        let text = "```rust\nfn main() {}\n";

        assert_eq!(stash.code_blocks(text), text);
        assert!(find_code_blocks(text).is_empty());
    }

    #[test]
    fn unknown_placeholder_is_kept() {
        let stash = Stash::default();
        let text = format!("{BLOCK_OPEN}7{BLOCK_CLOSE}");

        assert_eq!(stash.restore(&text), text);
    }

    #[test]
    fn detects_block_placeholder_lines() {
        let mut stash = Stash::default();
        let hidden = stash.code_blocks("```\nx\n```");

        assert!(is_block_placeholder(&hidden));
        assert!(!is_block_placeholder("plain text"));
    }
}
