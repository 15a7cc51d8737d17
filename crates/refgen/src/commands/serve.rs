//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::ServeDir;

use crate::config::load_config;

/// Run the serve command.
pub async fn run(
    config_path: &Path,
    port: u16,
    dir: Option<PathBuf>,
    open_browser: bool,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => default_serve_dir(&load_config(config_path)?.output_dir(config_path)),
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'refgen build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if open_browser {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Pages link to `../css` and `../js`, so serve the output's parent.
fn default_serve_dir(output: &Path) -> PathBuf {
    output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}
