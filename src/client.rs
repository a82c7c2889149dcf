//! HTTP client for the headless content API.
//!
//! All requests are `GET {base_url}/api/{endpoint}?{query}`. Failures are
//! logged here, at the call site, and returned as typed [`Error`]s so the
//! page controllers can turn them into local error state.

use crate::model::{
    CarModel, ColorCategory, Faq, FaqCategory, FilmBrand, ListResponse, SingleResponse, WorkModel,
};
use crate::query::{Constraint, Query};
use crate::{ClientConfig, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const WORKS_ENDPOINT: &str = "works";
pub const FILM_BRANDS_ENDPOINT: &str = "film-brands";
pub const COLOR_CATEGORIES_ENDPOINT: &str = "color-categories";
pub const CAR_MODELS_ENDPOINT: &str = "car-models";
pub const FAQ_CATEGORIES_ENDPOINT: &str = "faq-categories";
pub const FAQS_ENDPOINT: &str = "faqs";

/// Remote collections the page controllers read from.
///
/// `StrapiClient` is the production implementation; tests substitute
/// in-memory sources to control response timing.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn list_works(&self, query: &Query) -> Result<ListResponse<WorkModel>>;
    async fn film_brands(&self) -> Result<Vec<FilmBrand>>;
    async fn color_categories(&self) -> Result<Vec<ColorCategory>>;
    async fn car_models(&self) -> Result<Vec<CarModel>>;
    async fn faq_categories(&self) -> Result<ListResponse<FaqCategory>>;
    async fn faqs(&self, query: &Query) -> Result<ListResponse<Faq>>;
}

/// Content API client backed by `reqwest`
#[derive(Clone)]
pub struct StrapiClient {
    http: Client,
    config: ClientConfig,
}

impl StrapiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::Config("base URL is empty".into()));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        for (k, v) in &config.headers {
            let name = reqwest::header::HeaderName::from_bytes(k.as_bytes())
                .map_err(|e| Error::Config(format!("bad header name {}: {}", k, e)))?;
            let value = reqwest::header::HeaderValue::from_str(v)
                .map_err(|e| Error::Config(format!("bad header value for {}: {}", k, e)))?;
            headers.insert(name, value);
        }

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full request URL for an endpoint and query
    pub fn endpoint_url(&self, endpoint: &str, query: &Query) -> String {
        let base = format!("{}/{}", self.config.api_root(), endpoint.trim_start_matches('/'));
        let qs = query.to_query_string();
        if qs.is_empty() {
            base
        } else {
            format!("{}?{}", base, qs)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("GET {}", url);
        let res = self.http.get(url).send().await.map_err(|e| {
            log::error!("request to {} failed: {}", url, e);
            Error::from(e)
        })?;

        let status = res.status();
        if !status.is_success() {
            log::error!("content API returned {} for {}", status, url);
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = res.text().await.map_err(|e| {
            log::error!("failed to read body from {}: {}", url, e);
            Error::from(e)
        })?;
        serde_json::from_str(&body).map_err(|e| {
            log::error!("failed to decode body from {}: {}", url, e);
            Error::from(e)
        })
    }

    /// Fetch one page of a collection
    pub async fn fetch_collection<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &Query,
    ) -> Result<ListResponse<T>> {
        let url = self.endpoint_url(endpoint, query);
        self.get_json(&url).await
    }

    /// Fetch a single item by id or document id
    pub async fn fetch_single<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        id: &str,
    ) -> Result<SingleResponse<T>> {
        let url = format!("{}/{}/{}", self.config.api_root(), endpoint, id);
        self.get_json(&url).await.map_err(|e| match e {
            Error::Status { status: 404, .. } => Error::NotFound(format!("{} {}", endpoint, id)),
            other => other,
        })
    }

    /// Look up a work by slug. An empty result is `NotFound`, not an error
    /// from the transport.
    pub async fn fetch_work_by_slug(&self, slug: &str) -> Result<WorkModel> {
        crate::detail::load_work(self, slug).await
    }

    /// Questions belonging to one FAQ category
    pub async fn fetch_questions_by_category(&self, category_id: &str) -> Result<ListResponse<Faq>> {
        self.faqs(&category_query(category_id)).await
    }

    /// Case-insensitive search over question and answer text
    pub async fn search_questions(&self, term: &str, page: u32, page_size: u32) -> Result<ListResponse<Faq>> {
        self.faqs(&search_query(term, page, page_size)).await
    }
}

/// Query for the questions of one FAQ category
pub fn category_query(category_id: &str) -> Query {
    Query::new()
        .filter(Constraint::eq(&["category", "id"], category_id))
        .populate("*")
}

/// Query for a FAQ text search; an empty term only paginates
pub fn search_query(term: &str, page: u32, page_size: u32) -> Query {
    let mut query = Query::new().populate("*");
    if !term.is_empty() {
        query = query
            .filter(Constraint::contains_i(&["question"], term))
            .filter(Constraint::contains_i(&["answer"], term));
    }
    query.pagination(page, page_size)
}

#[async_trait]
impl ContentSource for StrapiClient {
    async fn list_works(&self, query: &Query) -> Result<ListResponse<WorkModel>> {
        self.fetch_collection(WORKS_ENDPOINT, query).await
    }

    async fn film_brands(&self) -> Result<Vec<FilmBrand>> {
        let resp: ListResponse<FilmBrand> =
            self.fetch_collection(FILM_BRANDS_ENDPOINT, &Query::new()).await?;
        Ok(resp.data)
    }

    async fn color_categories(&self) -> Result<Vec<ColorCategory>> {
        let resp: ListResponse<ColorCategory> =
            self.fetch_collection(COLOR_CATEGORIES_ENDPOINT, &Query::new()).await?;
        Ok(resp.data)
    }

    async fn car_models(&self) -> Result<Vec<CarModel>> {
        let resp: ListResponse<CarModel> =
            self.fetch_collection(CAR_MODELS_ENDPOINT, &Query::new()).await?;
        Ok(resp.data)
    }

    async fn faq_categories(&self) -> Result<ListResponse<FaqCategory>> {
        self.fetch_collection(FAQ_CATEGORIES_ENDPOINT, &Query::new().populate("*"))
            .await
    }

    async fn faqs(&self, query: &Query) -> Result<ListResponse<Faq>> {
        self.fetch_collection(FAQS_ENDPOINT, query).await
    }
}
