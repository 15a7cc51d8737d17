//! Paragraph wrapping.
//!
//! Walks the partially converted text line by line. Runs of plain text lines
//! become a single `<p>`; block-level HTML produced by the earlier rewrites is
//! passed through untouched. Block tracking is a two-state machine so a
//! multi-line `<ul>` or `<table>` is never split into paragraphs.

use std::sync::LazyLock;

use regex::Regex;

use crate::codeblock::is_block_placeholder;

static LEADING_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<(/?)([a-zA-Z][a-zA-Z0-9]*)").expect("Invalid tag regex"));

/// Tags that may start a line of running text.
const INLINE_TAGS: &[&str] = &["a", "b", "code", "em", "i", "span", "strong"];

/// Block-level elements whose interior is emitted verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Pre,
    UnorderedList,
    OrderedList,
    Table,
    Heading(u8),
    Div,
    BlockQuote,
}

impl BlockKind {
    fn from_tag(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "pre" => Self::Pre,
            "ul" => Self::UnorderedList,
            "ol" => Self::OrderedList,
            "table" => Self::Table,
            "div" => Self::Div,
            "blockquote" => Self::BlockQuote,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            _ => return None,
        };
        Some(kind)
    }

    fn tag(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::UnorderedList => "ul",
            Self::OrderedList => "ol",
            Self::Table => "table",
            Self::Div => "div",
            Self::BlockQuote => "blockquote",
            Self::Heading(1) => "h1",
            Self::Heading(2) => "h2",
            Self::Heading(3) => "h3",
            Self::Heading(4) => "h4",
            Self::Heading(5) => "h5",
            Self::Heading(_) => "h6",
        }
    }

    /// Net nesting change contributed by one line.
    fn depth_delta(self, line: &str) -> isize {
        let tag = self.tag();
        let open = format!("<{tag}");
        let close = format!("</{tag}>");

        let opens = line
            .match_indices(&open)
            .filter(|(at, _)| {
                matches!(
                    line[at + open.len()..].chars().next(),
                    Some('>' | ' ' | '\t' | '/')
                )
            })
            .count();
        let closes = line.matches(&close).count();

        opens as isize - closes as isize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    Inside { kind: BlockKind, depth: isize },
}

/// How a line outside any block should be treated.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Blank,
    Text(&'a str),
    Markup(Option<BlockKind>),
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Line::Blank;
    }

    if is_block_placeholder(trimmed) {
        return Line::Markup(None);
    }

    if !trimmed.starts_with('<') {
        return Line::Text(trimmed);
    }

    if trimmed.starts_with("<!") {
        return Line::Markup(None);
    }

    match LEADING_TAG_RE.captures(trimmed) {
        Some(caps) if !caps[1].is_empty() => Line::Markup(None),
        Some(caps) => {
            let name = caps[2].to_ascii_lowercase();
            if INLINE_TAGS.contains(&name.as_str()) {
                Line::Text(trimmed)
            } else {
                Line::Markup(BlockKind::from_tag(&name))
            }
        }
        None => Line::Text(trimmed),
    }
}

struct Wrapper<'a> {
    out: Vec<String>,
    paragraph: Vec<&'a str>,
    state: State,
}

impl<'a> Wrapper<'a> {
    fn new() -> Self {
        Self {
            out: Vec::new(),
            paragraph: Vec::new(),
            state: State::Outside,
        }
    }

    fn flush(&mut self) {
        if !self.paragraph.is_empty() {
            self.out.push(format!("<p>{}</p>", self.paragraph.join(" ")));
            self.paragraph.clear();
        }
    }

    fn push_line(&mut self, line: &'a str) {
        match self.state {
            State::Inside { kind, depth } => {
                self.out.push(line.to_string());
                let depth = depth + kind.depth_delta(line);
                self.state = if depth > 0 {
                    State::Inside { kind, depth }
                } else {
                    State::Outside
                };
            }
            State::Outside => match classify(line) {
                Line::Blank => {
                    self.flush();
                    self.out.push(String::new());
                }
                Line::Text(text) => self.paragraph.push(text),
                Line::Markup(kind) => {
                    self.flush();
                    self.out.push(line.to_string());
                    if let Some(kind) = kind {
                        let depth = kind.depth_delta(line);
                        if depth > 0 {
                            self.state = State::Inside { kind, depth };
                        }
                    }
                }
            },
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.out.join("\n")
    }
}

/// Wrap runs of plain text lines in `<p>` elements.
pub(crate) fn wrap_paragraphs(text: &str) -> String {
    let mut wrapper = Wrapper::new();
    for line in text.split('\n') {
        wrapper.push_line(line);
    }
    wrapper.finish()
}
