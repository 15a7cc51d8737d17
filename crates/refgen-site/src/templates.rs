//! Page assembly using minijinja.

use minijinja::{context, Environment, Value};
use refgen_markdown::Document;
use serde::{Deserialize, Serialize};

use crate::navigation::Navigation;

/// Site-wide settings shown on every page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SiteInfo {
    /// Site name, shown in the sidebar logo and the `<title>` suffix
    pub name: String,
    /// Tagline below the site name
    pub tagline: String,
    /// Stylesheet href, relative to the output directory
    pub stylesheet: String,
    /// Footer script src, relative to the output directory
    pub script: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "CloudFramework".to_string(),
            tagline: "Backend Core PHP8".to_string(),
            stylesheet: "../css/styles.css".to_string(),
            script: "../js/main.js".to_string(),
        }
    }
}

/// A fully assembled HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Base name of the source document
    pub name: String,
    /// Title shown in `<title>`
    pub title: String,
    /// Complete HTML document
    pub html: String,
}

impl Page {
    /// Output file name, `<name>.html`.
    pub fn file_name(&self) -> String {
        format!("{}.html", self.name)
    }
}

/// Template engine using minijinja.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in templates.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("href", escape_attr);

        env.add_template("base.html", BASE_TEMPLATE)
            .expect("Failed to add base template");
        env.add_template("page.html", PAGE_TEMPLATE)
            .expect("Failed to add page template");
        env.add_template("nav.html", NAV_TEMPLATE)
            .expect("Failed to add nav template");

        Self { env }
    }

    /// Wrap an HTML fragment in the site layout.
    ///
    /// `page_id` selects the navigation entry to mark active. The fragment is
    /// embedded as-is; the title is escaped.
    pub fn render_page(
        &self,
        site: &SiteInfo,
        navigation: &Navigation,
        title: &str,
        content: &str,
        page_id: &str,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template("page.html")?;

        tmpl.render(context! {
            title => title,
            content => content,
            site => site,
            nav => navigation.view(page_id),
        })
    }

    /// Convert a document and wrap it into a complete page.
    pub fn assemble(
        &self,
        doc: &Document,
        site: &SiteInfo,
        navigation: &Navigation,
    ) -> Result<Page, minijinja::Error> {
        let title = doc.title();
        let content = doc.to_html();
        let html = self.render_page(site, navigation, &title, &content, &doc.name)?;

        Ok(Page {
            name: doc.name.clone(),
            title,
            html,
        })
    }
}

/// Escape a value for a double-quoted attribute. Unlike the default HTML
/// escaping, `/` is left alone so relative paths stay readable.
fn escape_attr(value: String) -> Value {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    Value::from_safe_string(out)
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="description" content="{{ title }} - {{ site.name }} {{ site.tagline }} API reference">
    <title>{{ title }} - {{ site.name }} {{ site.tagline }}</title>
    <link rel="stylesheet" href="{{ site.stylesheet | href }}">
</head>
<body>
    <div class="container">
        <aside class="sidebar">
            <div class="logo">
                <h2>{{ site.name }}</h2>
                <p>{{ site.tagline }}</p>
            </div>
            <nav>
{% include "nav.html" %}
            </nav>
        </aside>
        <main class="content">
{% block content %}{% endblock %}
        </main>
    </div>
    <script src="{{ site.script | href }}"></script>
</body>
</html>
"##;

const PAGE_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block content %}
{{ content | safe }}
{% endblock %}
"##;

const NAV_TEMPLATE: &str = r##"                <a href="{{ nav.home_href | href }}">{{ nav.home_label }}</a>
{% for section in nav.sections %}
                <h3>{{ section.title }}</h3>
{% for item in section.items %}
                <a href="{{ item.path | href }}"{% if item.active %} class="active"{% endif %}>{{ item.title }}</a>
{% endfor %}
{% endfor %}
"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn render(title: &str, content: &str, page_id: &str) -> String {
        TemplateEngine::new()
            .render_page(
                &SiteInfo::default(),
                &Navigation::default(),
                title,
                content,
                page_id,
            )
            .unwrap()
    }

    #[test]
    fn renders_basic_page() {
        let html = render("DataStore", "<p>Hello world</p>", "DataStore");

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>DataStore - CloudFramework Backend Core PHP8</title>"));
        assert!(html.contains(
            "<meta name=\"description\" content=\"DataStore - CloudFramework Backend Core PHP8 API reference\">"
        ));
        assert!(html.contains("<main class=\"content\">\n<p>Hello world</p>\n        </main>"));
        assert!(html.contains("<link rel=\"stylesheet\" href=\"../css/styles.css\">"));
        assert!(html.contains("<script src=\"../js/main.js\"></script>"));
    }

    #[test]
    fn marks_active_entry_once() {
        let html = render("Buckets", "", "Buckets");

        assert_eq!(html.matches("class=\"active\"").count(), 1);
        assert!(html.contains("<a href=\"Buckets.html\" class=\"active\">Buckets</a>"));
        assert!(html.contains("<a href=\"DataStore.html\">DataStore</a>"));
    }

    #[test]
    fn no_active_entry_for_unlisted_page() {
        let html = render("Other", "", "Other");

        assert!(!html.contains("class=\"active\""));
    }

    #[test]
    fn renders_sections_in_order() {
        let html = render("x", "", "x");

        let core = html.find("<h3>Core Classes</h3>").unwrap();
        let storage = html.find("<h3>Data Storage</h3>").unwrap();
        let gcp = html.find("<h3>GCP Integration</h3>").unwrap();
        assert!(core < storage && storage < gcp);
        assert!(html.contains("<a href=\"../index.html\">Home</a>"));
        assert!(html.contains("<h3>Configuration &amp; Security</h3>"));
    }

    #[test]
    fn nav_lines_are_not_run_together() {
        let html = render("x", "", "x");

        assert!(html.contains("\n                <a href=\"Core7.html\">Core7</a>\n"));
        assert!(html.contains("<a href=\"PubSub.html\">PubSub</a>\n            </nav>"));
    }

    #[test]
    fn escapes_title_but_not_content() {
        let html = render("A <b> & C", "<em>raw</em>", "x");

        assert!(html.contains("<title>A &lt;b&gt; &amp; C - "));
        assert!(html.contains("<em>raw</em>"));
    }

    #[test]
    fn uses_custom_site_info() {
        let site = SiteInfo {
            name: "Acme".to_string(),
            tagline: "SDK".to_string(),
            stylesheet: "style.css".to_string(),
            script: "app.js".to_string(),
        };

        let html = TemplateEngine::new()
            .render_page(&site, &Navigation::default(), "T", "", "T")
            .unwrap();

        assert!(html.contains("<title>T - Acme SDK</title>"));
        assert!(html.contains("<h2>Acme</h2>"));
        assert!(html.contains("<script src=\"app.js\"></script>"));
    }

    #[test]
    fn escapes_quotes_in_hrefs() {
        let site = SiteInfo {
            stylesheet: "a\"b.css".to_string(),
            ..SiteInfo::default()
        };
        let mut navigation = Navigation::default();
        navigation.home_href = "../index.html?a=1&b=\"x\"".to_string();

        let html = TemplateEngine::new()
            .render_page(&site, &navigation, "T", "", "T")
            .unwrap();

        assert!(html.contains("href=\"a&quot;b.css\""));
        assert!(html.contains("<a href=\"../index.html?a=1&amp;b=&quot;x&quot;\">Home</a>"));
        assert!(html.contains("<a href=\"Core7.html\">Core7</a>"));
    }

    #[test]
    fn assembles_document() {
        let doc = Document::new("CloudSQL", "# CloudSQL\n\nSee [DataSQL](DataSQL.md).\n");

        let page = TemplateEngine::new()
            .assemble(&doc, &SiteInfo::default(), &Navigation::default())
            .unwrap();

        assert_eq!(page.title, "CloudSQL");
        assert_eq!(page.file_name(), "CloudSQL.html");
        assert!(page.html.contains("<h1>CloudSQL</h1>"));
        assert!(page.html.contains("<a href=\"DataSQL.html\">DataSQL</a>"));
        assert!(page.html.contains("<a href=\"CloudSQL.html\" class=\"active\">CloudSQL</a>"));
    }

    #[test]
    fn assembly_is_deterministic() {
        let engine = TemplateEngine::new();
        let doc = Document::new("Email", "# Email\n\n- send\n- queue\n");

        let first = engine
            .assemble(&doc, &SiteInfo::default(), &Navigation::default())
            .unwrap();
        let second = engine
            .assemble(&doc, &SiteInfo::default(), &Navigation::default())
            .unwrap();

        assert_eq!(first, second);
    }
}
