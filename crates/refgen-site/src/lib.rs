//! Static page generation for API reference docs.
//!
//! Wraps converted Markdown in the shared site layout (sidebar navigation,
//! stylesheet, footer script) and writes one HTML page per document.

pub mod builder;
pub mod navigation;
pub mod templates;

pub use builder::{BuildConfig, BuildError, BuildResult, PageError, PageFailure, StaticBuilder};
pub use navigation::{NavEntry, NavSection, Navigation};
pub use templates::{Page, SiteInfo, TemplateEngine};
pub use refgen_markdown::{markdown_to_html, Document};
