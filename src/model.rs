//! Content API entities.
//!
//! These mirror the JSON documents the headless CMS returns. They are
//! read-only from this crate's point of view: nothing here is ever sent back.
//! Unknown fields are ignored so schema additions on the CMS side don't
//! break decoding.

use serde::{Deserialize, Serialize};

/// Envelope for collection endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Meta,
}

/// Envelope for single-item endpoints
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SingleResponse<T> {
    pub data: T,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Page bookkeeping returned alongside every collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub page_count: u32,
    pub total: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            page_count: 1,
            total: 0,
        }
    }
}

/// One rendition of an uploaded image
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageFormat {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub mime: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImageFormats {
    pub thumbnail: Option<ImageFormat>,
    pub small: Option<ImageFormat>,
    pub medium: Option<ImageFormat>,
    pub large: Option<ImageFormat>,
}

/// Uploaded media
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub alternative_text: Option<String>,
    pub caption: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub formats: Option<ImageFormats>,
    pub url: String,
}

impl Image {
    /// Smallest rendition suitable for a card, falling back to the original.
    pub fn thumbnail_url(&self) -> &str {
        self.formats
            .as_ref()
            .and_then(|f| f.thumbnail.as_ref().or(f.small.as_ref()))
            .map(|f| f.url.as_str())
            .unwrap_or(&self.url)
    }
}

/// Anything the facet option resolver can turn into a `{label, value}` pair.
pub trait NamedItem {
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmBrand {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorCategory {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub name: String,
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub is_display_color: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CarModel {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub name: String,
}

impl NamedItem for FilmBrand {
    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedItem for ColorCategory {
    fn name(&self) -> &str {
        &self.name
    }
}

impl NamedItem for CarModel {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A finished wrap job shown in the works gallery
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkModel {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub name: String,
    pub slug: String,
    pub film_type: Option<String>,
    pub gloss_effect: Option<String>,
    pub film_brand: Option<FilmBrand>,
    pub brightness: Option<String>,
    #[serde(default)]
    pub color_categories: Option<Vec<ColorCategory>>,
    pub car_model: Option<CarModel>,
    pub thumbnail: Option<Image>,
    #[serde(default)]
    pub images: Option<Vec<Image>>,
}

impl WorkModel {
    pub fn images(&self) -> &[Image] {
        self.images.as_deref().unwrap_or(&[])
    }

    pub fn color_names(&self) -> Vec<&str> {
        self.color_categories
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqCategory {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<Image>,
    /// Present when the category was fetched with `populate=*`
    #[serde(default)]
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: u64,
    #[serde(default)]
    pub document_id: String,
    pub question: String,
    #[serde(default)]
    pub slug: String,
    /// HTML fragment authored in the CMS
    pub answer: String,
    pub category: Option<FaqCategoryRef>,
}

/// Category relation as embedded in a FAQ (no nested faqs)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqCategoryRef {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_work_list_with_nulls() {
        let body = r##"{
            "data": [{
                "id": 3, "documentId": "abc", "name": "Model Y satin black",
                "slug": "model-y-satin-black", "filmType": "others",
                "glossEffect": "satin", "filmBrand": {"id": 1, "name": "3M"},
                "brightness": null, "colorCategories": [{"id": 9, "name": "黑", "hex": "#000"}],
                "carModel": null, "thumbnail": null, "images": null,
                "createdAt": "2025-01-01T00:00:00.000Z"
            }],
            "meta": {"pagination": {"page": 1, "pageSize": 25, "pageCount": 1, "total": 1}}
        }"##;
        let resp: ListResponse<WorkModel> = serde_json::from_str(body).unwrap();
        let work = &resp.data[0];
        assert_eq!(work.film_brand.as_ref().unwrap().name(), "3M");
        assert_eq!(work.color_names(), vec!["黑"]);
        assert!(work.images().is_empty());
        assert_eq!(resp.meta.pagination.unwrap().total, 1);
    }

    #[test]
    fn missing_meta_defaults() {
        let resp: ListResponse<CarModel> =
            serde_json::from_str(r#"{"data": [{"id": 1, "name": "BMW"}]}"#).unwrap();
        assert!(resp.meta.pagination.is_none());
        assert_eq!(resp.data[0].name(), "BMW");
    }

    #[test]
    fn thumbnail_prefers_smallest_format() {
        let img: Image = serde_json::from_str(
            r#"{"id": 1, "url": "/o.jpg", "alternativeText": null, "caption": null,
                "formats": {"small": {"name": "s", "url": "/s.jpg"}}}"#,
        )
        .unwrap();
        assert_eq!(img.thumbnail_url(), "/s.jpg");
    }
}
