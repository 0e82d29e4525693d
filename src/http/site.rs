//! Page documents and static content.
//!
//! # Responsibilities
//! - Serve the landing, confirmation and error documents as `text/html`
//! - Resolve other GET paths to files under the base directory
//! - Infer a Content-Type from the file name, `text/plain` when unknown
//!
//! # Design Decisions
//! - The base directory is canonicalized once at startup
//! - Every resolved path is canonicalized and must stay inside the base
//!   directory; anything else (traversal, symlinks out, directories) is
//!   treated as not found

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::config::SiteConfig;

const TEXT_HTML: &str = "text/html";
const TEXT_PLAIN: &str = "text/plain";

/// A page document served by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Index,
    Message,
    Error,
}

/// Content rooted at a base directory.
#[derive(Debug)]
pub struct Site {
    base_dir: PathBuf,
    index_page: String,
    message_page: String,
    error_page: String,
}

impl Site {
    /// Fails when the base directory does not exist.
    pub fn from_config(config: &SiteConfig) -> std::io::Result<Self> {
        let base_dir = std::fs::canonicalize(&config.base_dir)?;
        Ok(Self {
            base_dir,
            index_page: config.index_page.clone(),
            message_page: config.message_page.clone(),
            error_page: config.error_page.clone(),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Serve a page document with `status`.
    pub async fn page(&self, page: Page, status: StatusCode) -> Response {
        let name = match page {
            Page::Index => &self.index_page,
            Page::Message => &self.message_page,
            Page::Error => &self.error_page,
        };
        let path = self.base_dir.join(name);

        match tokio::fs::read(&path).await {
            Ok(contents) => with_content_type(status, TEXT_HTML, contents),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Page document unavailable");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }

    /// Serve the file at `request_path`, or the error page with 404.
    pub async fn static_file(&self, request_path: &str) -> Response {
        let Some(path) = self.resolve(request_path).await else {
            tracing::debug!(path = %request_path, "No such resource");
            return self.page(Page::Error, StatusCode::NOT_FOUND).await;
        };

        match tokio::fs::read(&path).await {
            Ok(contents) => with_content_type(StatusCode::OK, content_type_for(&path), contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Static resource unreadable");
                self.page(Page::Error, StatusCode::NOT_FOUND).await
            }
        }
    }

    /// Map a URL path to a regular file inside the base directory.
    pub async fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(request_path).decode_utf8().ok()?;
        let relative = decoded.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        let candidate = tokio::fs::canonicalize(self.base_dir.join(relative))
            .await
            .ok()?;
        if !candidate.starts_with(&self.base_dir) {
            tracing::warn!(path = %request_path, "Rejected path outside base directory");
            return None;
        }

        let metadata = tokio::fs::metadata(&candidate).await.ok()?;
        metadata.is_file().then_some(candidate)
    }
}

/// Media type guessed from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    mime_guess::from_path(path).first_raw().unwrap_or(TEXT_PLAIN)
}

fn with_content_type(status: StatusCode, content_type: &'static str, contents: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(contents));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("front");
        std::fs::create_dir_all(base.join("assets")).unwrap();
        for (name, contents) in files {
            std::fs::write(base.join(name), contents).unwrap();
        }
        std::fs::write(dir.path().join("secret.txt"), "outside").unwrap();

        let config = SiteConfig {
            base_dir: base.to_string_lossy().into_owned(),
            ..SiteConfig::default()
        };
        let site = Site::from_config(&config).unwrap();
        (dir, site)
    }

    #[test]
    fn content_types_are_inferred() {
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("page.html")), "text/html");
        assert_eq!(content_type_for(Path::new("README")), "text/plain");
    }

    #[tokio::test]
    async fn resolves_files_inside_base() {
        let (_dir, site) = site_with(&[("style.css", "body{}"), ("assets/app.js", "")]);

        assert!(site.resolve("/style.css").await.is_some());
        assert!(site.resolve("/assets/app.js").await.is_some());
        assert!(site.resolve("/missing.css").await.is_none());
    }

    #[tokio::test]
    async fn rejects_traversal_and_directories() {
        let (_dir, site) = site_with(&[("style.css", "body{}")]);

        assert!(site.resolve("/../secret.txt").await.is_none());
        assert!(site.resolve("/%2E%2E/secret.txt").await.is_none());
        assert!(site.resolve("/assets").await.is_none());
        assert!(site.resolve("/").await.is_none());
    }

    #[tokio::test]
    async fn missing_page_document_is_server_error() {
        let (_dir, site) = site_with(&[]);
        let response = site.page(Page::Index, StatusCode::OK).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn missing_resource_serves_error_page() {
        let (_dir, site) = site_with(&[("error.html", "<h1>404</h1>")]);
        let response = site.static_file("/nope.xyz").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    }
}
