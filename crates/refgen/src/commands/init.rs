//! Initialize a reference docs project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::{load_config, DEFAULT_CONFIG};

/// Run the init command.
pub fn run(config_path: &Path, yes: bool) -> Result<()> {
    tracing::info!("Initializing refgen...");

    if config_path.exists() && !yes {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    let config = load_config(config_path)?;
    let input_dir = config.input_dir(config_path);
    fs::create_dir_all(&input_dir).context("Failed to create docs directory")?;

    let sample_path = input_dir.join("Core7.md");
    if !sample_path.exists() || yes {
        fs::write(&sample_path, SAMPLE_DOC).context("Failed to write Core7.md")?;
        tracing::info!("Created {}", sample_path.display());
    }

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'refgen build' to generate the HTML pages.");

    Ok(())
}

const SAMPLE_DOC: &str = r#"# Core7

Entry point of the framework. Every request creates one **Core7** instance.

## Properties

| Property | Type | Description |
|----------|------|-------------|
| `config` | CoreConfig | Configuration values |
| `cache` | CoreCache | Cache layer |

## Methods

### getConfig

Returns the active configuration.

```php
$value = $this->core->config->get('core.version');
```

## See also

- [RESTful](RESTful.md)
- [CoreConfig](CoreConfig.md)
"#;
