//! Source documents and title extraction.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::codeblock::strip_code_blocks;
use crate::render::markdown_to_html;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^# (.+)$").expect("Invalid title regex"));

/// A Markdown document identified by its base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// File name without extension, e.g. `DataStore`
    pub name: String,

    /// Raw Markdown text
    pub source: String,
}

impl Document {
    /// Create a document from a name and its Markdown text.
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Read a document from disk. The base name is the file stem.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("No usable file name: {}", path.display()),
                )
            })?
            .to_string();

        let source = fs::read_to_string(path)?;

        Ok(Self { name, source })
    }

    /// Page title: the first level-1 heading, or the base name.
    pub fn title(&self) -> String {
        extract_title(&self.source).unwrap_or_else(|| self.name.clone())
    }

    /// Render the document body as an HTML fragment.
    pub fn to_html(&self) -> String {
        markdown_to_html(&self.source)
    }
}

/// Find the text of the first `# ` heading line, ignoring fenced code.
pub fn extract_title(markdown: &str) -> Option<String> {
    let markdown = markdown.replace("\r\n", "\n");
    let text = strip_code_blocks(&markdown);

    TITLE_RE
        .captures_iter(&text)
        .map(|caps| caps[1].trim().to_string())
        .find(|title| !title.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn title_from_first_h1() {
        let source = "intro\n## Not this\n# CoreCache\n# Second\n";

        assert_eq!(extract_title(source), Some("CoreCache".to_string()));
    }

    #[test]
    fn title_skips_code_blocks() {
        let source = "```bash\n# install it\n```\n# Buckets\n";

        assert_eq!(extract_title(source), Some("Buckets".to_string()));
        assert_eq!(
            extract_title(&source.replace('\n', "\r\n")),
            Some("Buckets".to_string())
        );
    }

    #[test]
    fn crlf_title_agrees_with_body() {
        let doc = Document::new("Buckets", "```bash\r\n# install it\r\n```\r\n# Buckets\r\n");

        assert_eq!(doc.title(), "Buckets");
        assert!(doc.to_html().contains("<code class=\"language-bash\"># install it\n</code>"));
    }

    #[test]
    fn title_falls_back_to_name() {
        let doc = Document::new("PubSub", "## Only a subheading\n");

        assert_eq!(doc.title(), "PubSub");
    }

    #[test]
    fn title_is_trimmed() {
        let doc = Document::new("x", "#   Spaced Out   \r\n");

        assert_eq!(doc.title(), "Spaced Out");
    }

    #[test]
    fn reads_from_path() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Email.md");
        fs::write(&path, "# Email\n\nSend mail.\n").unwrap();

        let doc = Document::from_path(&path).unwrap();

        assert_eq!(doc.name, "Email");
        assert_eq!(doc.title(), "Email");
        assert_eq!(doc.to_html(), "<h1>Email</h1>\n\n<p>Send mail.</p>\n");
    }

    #[test]
    fn missing_file_is_an_error() {
        let temp = tempdir().unwrap();

        assert!(Document::from_path(&temp.path().join("Nope.md")).is_err());
    }
}
