//! Markdown to HTML conversion for API reference documents.
//!
//! This crate turns one Markdown document into an HTML fragment through a
//! fixed sequence of pattern rewrites (code blocks, headings, bold, inline
//! code, links, lists, tables, paragraphs). It covers the subset of Markdown
//! used by hand-written reference pages and never fails on malformed input.

pub mod codeblock;
pub mod document;
mod paragraph;
pub mod render;
mod table;

pub use codeblock::{find_code_blocks, CodeBlock};
pub use document::{extract_title, Document};
pub use render::markdown_to_html;
