//! Sidebar navigation.
//!
//! The navigation is a fixed, ordered list of sections built once per run and
//! shared read-only by every page. Rendering a page produces a separate
//! [`NavView`] with the current page's entry marked active; the
//! [`Navigation`] itself is never modified.

use serde::{Deserialize, Serialize};

/// A single sidebar link to a generated page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavEntry {
    /// Link text
    pub label: String,
    /// Base name of the target page, without extension
    pub target: String,
}

impl NavEntry {
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }

    /// Link to the generated page.
    pub fn href(&self) -> String {
        format!("{}.html", self.target)
    }
}

/// A named group of entries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NavSection {
    pub title: String,
    #[serde(default)]
    pub entries: Vec<NavEntry>,
}

impl NavSection {
    fn new(title: &str, targets: &[&str]) -> Self {
        Self {
            title: title.to_string(),
            entries: targets.iter().map(|t| NavEntry::new(*t, *t)).collect(),
        }
    }
}

/// The complete sidebar structure.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Navigation {
    /// Label of the leading home link
    pub home_label: String,
    /// Href of the leading home link (never marked active)
    pub home_href: String,
    /// Sections in display order
    pub sections: Vec<NavSection>,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            home_label: "Home".to_string(),
            home_href: "../index.html".to_string(),
            sections: vec![
                NavSection::new("Core Classes", &["Core7", "RESTful", "Scripts2020"]),
                NavSection::new(
                    "Configuration & Security",
                    &["CoreConfig", "CoreCache", "CoreSession", "CoreSecurity"],
                ),
                NavSection::new(
                    "Data Storage",
                    &[
                        "DataStore",
                        "Buckets",
                        "DataBQ",
                        "CloudSQL",
                        "DataSQL",
                        "DataMongoDB",
                    ],
                ),
                NavSection::new("Utilities", &["Email", "DataValidation", "WorkFlows"]),
                NavSection::new("GCP Integration", &["GoogleSecrets", "PubSub"]),
            ],
        }
    }
}

impl Navigation {
    /// All entries across sections, in display order.
    pub fn entries(&self) -> impl Iterator<Item = &NavEntry> {
        self.sections.iter().flat_map(|s| s.entries.iter())
    }

    /// Whether any entry links to `target`.
    pub fn contains(&self, target: &str) -> bool {
        self.entries().any(|e| e.target == target)
    }

    /// Build the per-page view, marking the first entry whose target is
    /// `active` as the current page.
    pub fn view(&self, active: &str) -> NavView {
        let mut found = false;

        let sections = self
            .sections
            .iter()
            .map(|section| SectionView {
                title: section.title.clone(),
                items: section
                    .entries
                    .iter()
                    .map(|entry| {
                        let is_active = !found && entry.target == active;
                        found |= is_active;
                        NavItem {
                            title: entry.label.clone(),
                            path: entry.href(),
                            active: is_active,
                        }
                    })
                    .collect(),
            })
            .collect();

        NavView {
            home_label: self.home_label.clone(),
            home_href: self.home_href.clone(),
            sections,
        }
    }
}

/// A navigation item as rendered for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title
    pub title: String,
    /// URL path
    pub path: String,
    /// Whether this is the active page
    pub active: bool,
}

/// A section as rendered for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionView {
    pub title: String,
    pub items: Vec<NavItem>,
}

/// The navigation as rendered for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavView {
    pub home_label: String,
    pub home_href: String,
    pub sections: Vec<SectionView>,
}

impl NavView {
    /// Items marked active (at most one).
    pub fn active_items(&self) -> Vec<&NavItem> {
        self.sections
            .iter()
            .flat_map(|s| s.items.iter())
            .filter(|i| i.active)
            .collect()
    }
}
