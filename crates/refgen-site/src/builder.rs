//! Static site builder.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use refgen_markdown::Document;

use crate::navigation::Navigation;
use crate::templates::{SiteInfo, TemplateEngine};

/// Configuration for building the reference pages.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory holding the `*.md` sources
    pub input_dir: PathBuf,

    /// Directory receiving the `*.html` pages
    pub output_dir: PathBuf,

    /// Site name, tagline and asset paths
    pub site: SiteInfo,

    /// Sidebar navigation shared by every page
    pub navigation: Navigation,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("docs/api-reference"),
            output_dir: PathBuf::from("docs/html/api-reference"),
            site: SiteInfo::default(),
            navigation: Navigation::default(),
        }
    }
}

/// A document that could not be turned into a page.
#[derive(Debug)]
pub struct PageFailure {
    /// Source file path
    pub source_path: PathBuf,

    /// What went wrong
    pub error: PageError,
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages written
    pub pages: usize,

    /// Documents that failed, in processing order
    pub failures: Vec<PageFailure>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

impl BuildResult {
    /// Number of documents discovered.
    pub fn total(&self) -> usize {
        self.pages + self.failures.len()
    }
}

/// Errors that stop the whole build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read docs directory: {0}")]
    ReadError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Errors that affect a single page.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("Failed to read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Failed to write {path}: {source}")]
    Write { path: String, source: io::Error },
}

/// Builds one HTML page per Markdown document.
pub struct StaticBuilder {
    config: BuildConfig,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Convert every document in the input directory.
    ///
    /// Documents are processed one at a time in file name order. A document
    /// that fails is logged and recorded in [`BuildResult::failures`]; the
    /// remaining documents are still built.
    pub fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.input_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Docs directory not found: {}",
                self.config.input_dir.display()
            )));
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let sources = self.discover_sources();

        let mut pages = 0;
        let mut failures = Vec::new();

        if sources.is_empty() {
            tracing::warn!(
                "No markdown files found in {}",
                self.config.input_dir.display()
            );
        } else {
            tracing::info!("Found {} markdown files", sources.len());
        }

        for source_path in sources {
            tracing::info!("Processing {}...", display_name(&source_path));

            match self.build_page(&source_path) {
                Ok(output_path) => {
                    tracing::info!("Generated {}", display_name(&output_path));
                    pages += 1;
                }
                Err(error) => {
                    tracing::error!(
                        "Error processing {}: {}",
                        display_name(&source_path),
                        error
                    );
                    failures.push(PageFailure { source_path, error });
                }
            }
        }

        Ok(BuildResult {
            pages,
            failures,
            duration_ms: start.elapsed().as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    /// Markdown files directly inside the input directory, sorted by name.
    fn discover_sources(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.config.input_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("md"))
            .collect()
    }

    /// Read, convert, assemble and write a single page.
    fn build_page(&self, source_path: &Path) -> Result<PathBuf, PageError> {
        let doc = Document::from_path(source_path).map_err(|source| PageError::Read {
            path: source_path.display().to_string(),
            source,
        })?;

        let page = self
            .templates
            .assemble(&doc, &self.config.site, &self.config.navigation)?;

        let output_path = self.config.output_dir.join(page.file_name());
        fs::write(&output_path, &page.html).map_err(|source| PageError::Write {
            path: output_path.display().to_string(),
            source,
        })?;

        Ok(output_path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
