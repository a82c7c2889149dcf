//! Single work page (`/works/{slug}`)

use crate::client::{ContentSource, WORKS_ENDPOINT};
use crate::model::WorkModel;
use crate::query::{Constraint, Query};
use crate::{Error, Result};

/// Fetch a work by slug.
///
/// An empty slug is rejected before any request is made, and a lookup that
/// matches nothing is reported as [`Error::NotFound`] so callers can tell it
/// apart from a transport failure.
pub async fn load_work<S>(source: &S, slug: &str) -> Result<WorkModel>
where
    S: ContentSource + ?Sized,
{
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(Error::InvalidSlug);
    }

    let query = Query::new()
        .filter(Constraint::eq(&["slug"], slug))
        .populate("*");
    let resp = source.list_works(&query).await.map_err(|e| {
        log::error!("failed to fetch {} {}: {}", WORKS_ENDPOINT, slug, e);
        e
    })?;

    resp.data
        .into_iter()
        .next()
        .ok_or_else(|| Error::NotFound("Work".into()))
}

/// Message shown in place of the page body for a failed load
pub fn error_message(err: &Error) -> &'static str {
    match err {
        Error::InvalidSlug => "Invalid slug",
        e if e.is_not_found() => "Work not found",
        _ => "Failed to fetch work details",
    }
}

/// Text rendering of a work page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDetail {
    pub title: String,
    /// `label: value` badges, only for attributes that are set
    pub badges: Vec<String>,
    pub image_urls: Vec<String>,
}

impl WorkDetail {
    pub fn from_work(work: &WorkModel) -> Self {
        let mut badges = Vec::new();
        if let Some(v) = &work.film_type {
            badges.push(format!("膜類型: {}", v));
        }
        if let Some(v) = &work.gloss_effect {
            badges.push(format!("表面效果: {}", v));
        }
        if let Some(v) = &work.brightness {
            badges.push(format!("亮度: {}", v));
        }

        Self {
            title: work.name.clone(),
            badges,
            image_urls: work.images().iter().map(|i| i.url.clone()).collect(),
        }
    }
}
