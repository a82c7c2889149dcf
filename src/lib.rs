//! Filmworks
//!
//! Client-side core of a car wrap film studio website: a typed client for
//! the headless content API, and the page controllers that sit on top of it.
//!
//! # Features
//!
//! - **Works gallery**: filter state kept in step with the page URL, facet
//!   options resolved from live data with static fallbacks, and list fetches
//!   where only the most recently requested result is ever shown
//! - **Work detail**: single work lookup by slug with a distinct not-found
//! - **Support**: FAQ categories, per-category questions, paginated search
//!
//! # Example
//!
//! ```no_run
//! use filmworks::{ClientConfig, MemoryHistory, StrapiClient, WorksGallery};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = StrapiClient::new(ClientConfig::from_env()?)?;
//! let history = MemoryHistory::new("/works?filmType=ppf");
//! let gallery = WorksGallery::open(client, history, "/works?filmType=ppf");
//! gallery.settled().await;
//! for work in &gallery.view().works {
//!     println!("{}", work.name);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;

pub mod error;
pub use error::{Error, Result};

pub mod client;
pub mod detail;
pub mod filters;
pub mod gallery;
pub mod model;
pub mod options;
pub mod query;
pub mod support;
pub mod url_sync;

pub use client::{ContentSource, StrapiClient};
pub use filters::{Facet, FilterState, FILM_TYPE_ALL};
pub use gallery::{GalleryView, WorksGallery};
pub use options::{FacetOption, FacetOptionSet};
pub use query::{Constraint, Operator, Predicate, Query};
pub use url_sync::{build_url, parse_filters, MemoryHistory, Navigator, UrlSynchronizer};

/// Environment variable holding the content API origin
pub const BASE_URL_ENV: &str = "STRAPI_API_BASE_URL";
/// Optional request timeout override in milliseconds
pub const TIMEOUT_ENV: &str = "FILMWORKS_TIMEOUT_MS";
/// Path of the works gallery page
pub const GALLERY_PATH: &str = "/works";

/// Configuration for the content API client
///
/// `base_url` has no usable default: the site cannot function without it,
/// so [`ClientConfig::from_env`] fails when it is missing.
///
/// # Examples
///
/// ```
/// let cfg = filmworks::ClientConfig {
///     base_url: "https://shop.strapiapp.com".into(),
///     ..Default::default()
/// };
/// assert_eq!(cfg.api_root(), "https://shop.strapiapp.com/api");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Origin of the CMS, without the `/api` suffix
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Custom HTTP headers
    pub headers: HashMap<String, String>,
    /// Page size used for gallery list fetches
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: 30000,
            user_agent: format!("filmworks/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
            page_size: 25,
        }
    }
}

impl ClientConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!("Environment variable {} is not defined.", BASE_URL_ENV))
            })?;

        let mut cfg = ClientConfig {
            base_url,
            ..Default::default()
        };
        if let Ok(raw) = std::env::var(TIMEOUT_ENV) {
            cfg.timeout_ms = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{} must be a number, got {:?}", TIMEOUT_ENV, raw)))?;
        }
        Ok(cfg)
    }

    /// `{base_url}/api` with any trailing slash removed first
    pub fn api_root(&self) -> String {
        format!("{}/api", self.base_url.trim_end_matches('/'))
    }

    /// Host serving uploaded media for a Strapi Cloud project.
    ///
    /// `https://foo.strapiapp.com` serves images from
    /// `foo.media.strapiapp.com`; self-hosted instances keep their own host.
    pub fn media_host(&self) -> String {
        let host = self
            .base_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/');
        host.replace(".strapiapp.com", ".media.strapiapp.com")
    }

    /// Absolute URL for a media path returned by the API. Cloud uploads are
    /// already absolute; self-hosted uploads are relative to the origin.
    pub fn media_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.base_url.is_empty());
        assert_eq!(config.timeout_ms, 30000);
        assert_eq!(config.page_size, 25);
        assert!(config.user_agent.starts_with("filmworks/"));
    }

    #[test]
    fn test_media_host() {
        let config = ClientConfig {
            base_url: "https://bright-wrap-1234.strapiapp.com/".into(),
            ..Default::default()
        };
        assert_eq!(config.media_host(), "bright-wrap-1234.media.strapiapp.com");

        let local = ClientConfig {
            base_url: "http://localhost:1337".into(),
            ..Default::default()
        };
        assert_eq!(local.media_host(), "localhost:1337");
    }

    #[test]
    fn test_media_url() {
        let config = ClientConfig {
            base_url: "http://localhost:1337".into(),
            ..Default::default()
        };
        assert_eq!(config.media_url("/uploads/a.jpg"), "http://localhost:1337/uploads/a.jpg");
        assert_eq!(config.media_url("https://cdn/x.jpg"), "https://cdn/x.jpg");
    }
}
