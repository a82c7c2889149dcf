//! Support section: FAQ categories, per-category questions and search.

use crate::client::{category_query, search_query, ContentSource};
use crate::model::{Faq, FaqCategory, Pagination};
use crate::Result;

/// Shown to visitors whenever a support request fails
pub const SUPPORT_ERROR_MESSAGE: &str = "發生錯誤，請稍後再試";

/// Breadcrumb label used before a category's questions are known
pub const CATEGORY_PLACEHOLDER: &str = "類別";

/// State behind the `/support` page
pub struct FaqDirectory<S: ContentSource> {
    source: S,
    pub categories: Vec<FaqCategory>,
    pub faqs: Vec<Faq>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub pagination: Pagination,
}

impl<S: ContentSource> FaqDirectory<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            categories: Vec::new(),
            faqs: Vec::new(),
            loading: false,
            error: None,
            search: String::new(),
            pagination: Pagination::default(),
        }
    }

    /// Fetch the category list (initial page state)
    pub async fn load(&mut self) {
        self.loading = true;
        match self.source.faq_categories().await {
            Ok(resp) => {
                self.categories = resp.data;
                if let Some(p) = resp.meta.pagination {
                    self.pagination = p;
                }
                self.error = None;
            }
            Err(e) => self.fail("FAQ categories", e),
        }
        self.loading = false;
    }

    /// Start a new search from page one. An empty term fetches nothing.
    pub async fn search(&mut self, term: &str) {
        self.search = term.trim().to_string();
        self.pagination.page = 1;
        if !self.search.is_empty() {
            self.fetch_results().await;
        }
    }

    pub async fn change_page(&mut self, page: u32) {
        self.pagination.page = page.max(1);
        if !self.search.is_empty() {
            self.fetch_results().await;
        }
    }

    /// Drop the search and go back to the category list
    pub async fn clear_search(&mut self) {
        self.search.clear();
        self.loading = true;
        match self.source.faq_categories().await {
            Ok(resp) => {
                self.categories = resp.data;
                self.faqs.clear();
                if let Some(p) = resp.meta.pagination {
                    self.pagination = p;
                }
                self.error = None;
            }
            Err(e) => self.fail("FAQ categories", e),
        }
        self.loading = false;
    }

    /// Nothing to show and no error: the "no matching questions" state
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.categories.is_empty() && self.faqs.is_empty()
    }

    /// Page buttons to render; none for a single page
    pub fn page_numbers(&self) -> Vec<u32> {
        if self.pagination.page_count > 1 {
            (1..=self.pagination.page_count).collect()
        } else {
            Vec::new()
        }
    }

    async fn fetch_results(&mut self) {
        self.loading = true;
        let query = search_query(&self.search, self.pagination.page, self.pagination.page_size);
        match self.source.faqs(&query).await {
            Ok(resp) => {
                self.faqs = resp.data;
                self.categories.clear();
                if let Some(p) = resp.meta.pagination {
                    self.pagination = p;
                }
                self.error = None;
            }
            Err(e) => self.fail("FAQ search", e),
        }
        self.loading = false;
    }

    fn fail(&mut self, what: &str, err: crate::Error) {
        log::error!("error fetching {}: {}", what, err);
        self.error = Some(SUPPORT_ERROR_MESSAGE.to_string());
    }
}

/// Questions of one category (`/support/category/{id}`). An empty id yields
/// an empty list without a request.
pub async fn category_faqs<S>(source: &S, category_id: &str) -> Result<Vec<Faq>>
where
    S: ContentSource + ?Sized,
{
    if category_id.trim().is_empty() {
        return Ok(Vec::new());
    }
    let resp = source.faqs(&category_query(category_id)).await.map_err(|e| {
        log::error!("error fetching FAQs for category {}: {}", category_id, e);
        e
    })?;
    Ok(resp.data)
}

/// Breadcrumb label for a category page
pub fn category_title(faqs: &[Faq]) -> &str {
    faqs.first()
        .and_then(|f| f.category.as_ref())
        .map(|c| c.title.as_str())
        .unwrap_or(CATEGORY_PLACEHOLDER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_title_without_faqs() {
        assert_eq!(category_title(&[]), "類別");
    }

    #[test]
    fn title_from_embedded_category() {
        let faq: Faq = serde_json::from_value(serde_json::json!({
            "id": 1, "question": "Q", "answer": "<p>A</p>",
            "category": {"id": 2, "title": "保養"}
        }))
        .unwrap();
        assert_eq!(category_title(&[faq]), "保養");
    }
}
