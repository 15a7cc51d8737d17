//! Markdown to HTML rewrite pipeline.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::codeblock::Stash;
use crate::paragraph::wrap_paragraphs;
use crate::table::convert_tables;

static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(#{1,4}) (.*)$").expect("Invalid heading regex"));

static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"));

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^- (.*)$").expect("Invalid list item regex"));

static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));

/// Convert a Markdown document into an HTML fragment.
///
/// The conversion is a fixed sequence of rewrites: code blocks and code spans
/// are set aside first, then headings, bold, links, lists, tables and
/// paragraphs are rewritten, blank line runs are collapsed, and finally the
/// code is put back. Input that matches no rule ends up in a `<p>`; this
/// function never fails.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut stash = Stash::default();

    let text = markdown.replace("\r\n", "\n");
    let text = stash.code_blocks(&text);
    let text = stash.code_spans(&text);
    let text = rewrite_headings(&text);
    let text = rewrite_bold(&text);
    let text = rewrite_links(&text);
    let text = rewrite_lists(&text);
    let text = convert_tables(&text);
    let text = wrap_paragraphs(&text);
    let text = collapse_blank_lines(&text);

    stash.restore(&text)
}

fn rewrite_headings(text: &str) -> String {
    HEADING_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let level = caps[1].len();
            format!("<h{level}>{}</h{level}>", caps[2].trim())
        })
        .into_owned()
}

fn rewrite_bold(text: &str) -> String {
    BOLD_RE
        .replace_all(text, "<strong>$1</strong>")
        .into_owned()
}

fn rewrite_links(text: &str) -> String {
    LINK_RE
        .replace_all(text, |caps: &Captures<'_>| {
            format!("<a href=\"{}\">{}</a>", link_target(&caps[2]), &caps[1])
        })
        .into_owned()
}

/// Point links at sibling Markdown documents to their generated pages.
fn link_target(target: &str) -> String {
    match target.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html"),
        None => target.to_string(),
    }
}

fn rewrite_lists(text: &str) -> String {
    let items = LIST_ITEM_RE.replace_all(text, "<li>$1</li>");

    let mut out: Vec<&str> = Vec::new();
    let mut in_list = false;

    for line in items.split('\n') {
        let is_item = line.starts_with("<li>") && line.ends_with("</li>");
        if is_item && !in_list {
            out.push("<ul>");
            in_list = true;
        } else if !is_item && in_list {
            out.push("</ul>");
            in_list = false;
        }
        out.push(line);
    }

    if in_list {
        out.push("</ul>");
    }

    out.join("\n")
}

fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN_RE.replace_all(text, "\n\n").into_owned()
}
