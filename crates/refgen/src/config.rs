//! Configuration file (refgen.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use refgen_site::{BuildConfig, Navigation, SiteInfo};
use serde::Deserialize;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub docs: DocsConfig,
    #[serde(default)]
    pub site: SiteInfo,
    #[serde(default)]
    pub nav: Navigation,
}

#[derive(Debug, Deserialize)]
pub struct DocsConfig {
    #[serde(default = "default_input")]
    pub input: String,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output: default_output(),
        }
    }
}

fn default_input() -> String {
    "docs/api-reference".to_string()
}
fn default_output() -> String {
    "docs/html/api-reference".to_string()
}

/// Relative `[docs]` paths are resolved against the config file's directory.
fn base_dir(config_path: &Path) -> &Path {
    config_path.parent().unwrap_or(Path::new(""))
}

impl ConfigFile {
    /// Markdown source directory for the config at `config_path`.
    pub fn input_dir(&self, config_path: &Path) -> PathBuf {
        base_dir(config_path).join(&self.docs.input)
    }

    /// HTML output directory for the config at `config_path`.
    pub fn output_dir(&self, config_path: &Path) -> PathBuf {
        base_dir(config_path).join(&self.docs.output)
    }

    /// Build settings with optional CLI overrides applied.
    ///
    /// Overrides are taken as given, relative to the working directory.
    pub fn build_config(
        self,
        config_path: &Path,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
    ) -> BuildConfig {
        let input_dir = input.unwrap_or_else(|| self.input_dir(config_path));
        let output_dir = output.unwrap_or_else(|| self.output_dir(config_path));

        BuildConfig {
            input_dir,
            output_dir,
            site: self.site,
            navigation: self.nav,
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        return Ok(config);
    }
    tracing::debug!("No config at {}, using defaults", path.display());
    Ok(ConfigFile::default())
}

/// Written by `refgen init`.
pub const DEFAULT_CONFIG: &str = r#"# refgen configuration

[docs]
input = "docs/api-reference"
output = "docs/html/api-reference"

[site]
name = "CloudFramework"
tagline = "Backend Core PHP8"
stylesheet = "../css/styles.css"
script = "../js/main.js"

[nav]
home_label = "Home"
home_href = "../index.html"

[[nav.sections]]
title = "Core Classes"
entries = [
    { label = "Core7", target = "Core7" },
    { label = "RESTful", target = "RESTful" },
    { label = "Scripts2020", target = "Scripts2020" },
]

[[nav.sections]]
title = "Configuration & Security"
entries = [
    { label = "CoreConfig", target = "CoreConfig" },
    { label = "CoreCache", target = "CoreCache" },
    { label = "CoreSession", target = "CoreSession" },
    { label = "CoreSecurity", target = "CoreSecurity" },
]

[[nav.sections]]
title = "Data Storage"
entries = [
    { label = "DataStore", target = "DataStore" },
    { label = "Buckets", target = "Buckets" },
    { label = "DataBQ", target = "DataBQ" },
    { label = "CloudSQL", target = "CloudSQL" },
    { label = "DataSQL", target = "DataSQL" },
    { label = "DataMongoDB", target = "DataMongoDB" },
]

[[nav.sections]]
title = "Utilities"
entries = [
    { label = "Email", target = "Email" },
    { label = "DataValidation", target = "DataValidation" },
    { label = "WorkFlows", target = "WorkFlows" },
]

[[nav.sections]]
title = "GCP Integration"
entries = [
    { label = "GoogleSecrets", target = "GoogleSecrets" },
    { label = "PubSub", target = "PubSub" },
]
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_config_matches_builtin_defaults() {
        let config: ConfigFile = toml::from_str(DEFAULT_CONFIG).unwrap();

        assert_eq!(config.docs.input, "docs/api-reference");
        assert_eq!(config.site, SiteInfo::default());
        assert_eq!(config.nav, Navigation::default());
    }

    #[test]
    fn missing_file_uses_defaults() {
        let temp = tempdir().unwrap();

        let config = load_config(&temp.path().join("refgen.toml")).unwrap();

        assert_eq!(config.docs.output, "docs/html/api-reference");
        assert_eq!(config.nav, Navigation::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("refgen.toml");
        fs::write(&path, "[docs]\ninput = \"md\"\n\n[site]\nname = \"Acme\"\n").unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.docs.input, "md");
        assert_eq!(config.docs.output, "docs/html/api-reference");
        assert_eq!(config.site.name, "Acme");
        assert_eq!(config.site.tagline, "Backend Core PHP8");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("refgen.toml");
        fs::write(&path, "[docs\ninput = ").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn cli_overrides_win() {
        let config = ConfigFile::default().build_config(
            Path::new("refgen.toml"),
            Some(PathBuf::from("in")),
            None,
        );

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_dir, PathBuf::from("docs/html/api-reference"));
    }

    #[test]
    fn docs_paths_follow_config_location() {
        let config = ConfigFile::default().build_config(Path::new("sub/refgen.toml"), None, None);

        assert_eq!(config.input_dir, PathBuf::from("sub/docs/api-reference"));
        assert_eq!(config.output_dir, PathBuf::from("sub/docs/html/api-reference"));
    }
}
