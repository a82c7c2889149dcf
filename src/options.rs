//! Selectable options for each gallery facet.
//!
//! Film type, gloss effect and brightness are fixed vocabularies. Brand,
//! color category and car model are loaded from the content API once per
//! page view; until that load returns something, the static lists below are
//! shown instead.

use crate::client::ContentSource;
use crate::filters::{Facet, FilterState};
use crate::model::NamedItem;
use crate::Result;
use std::sync::Mutex;

/// One entry in a filter control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOption {
    pub label: String,
    pub value: String,
}

impl FacetOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

fn static_options(pairs: &[(&str, &str)]) -> Vec<FacetOption> {
    pairs.iter().map(|(l, v)| FacetOption::new(*l, *v)).collect()
}

pub fn film_type_options() -> Vec<FacetOption> {
    static_options(&[("全部", "all"), ("犀牛皮 PPF", "ppf"), ("其他膜類型", "others")])
}

pub fn gloss_effect_options() -> Vec<FacetOption> {
    static_options(&[
        ("亮面(高亮)", "glossy"),
        ("緞面(絲綢)", "satin"),
        ("消光(啞光)", "matte"),
    ])
}

pub fn film_brand_fallback() -> Vec<FacetOption> {
    static_options(&[
        ("3M", "3m"),
        ("Suntek", "suntek"),
        ("Stek", "stek"),
        ("Rodim", "rodim"),
        ("米其林", "michelin"),
        ("國產品牌", "domestic"),
    ])
}

pub fn brightness_options() -> Vec<FacetOption> {
    static_options(&[("淺色", "light"), ("深色", "dark")])
}

pub fn color_category_fallback() -> Vec<FacetOption> {
    static_options(&[
        ("紅", "red"),
        ("粉", "pink"),
        ("橙", "orange"),
        ("黃", "yellow"),
        ("綠", "green"),
        ("藍", "blue"),
        ("紫", "purple"),
        ("彩色", "rainbow"),
        ("黑", "black"),
        ("灰", "gray"),
        ("白", "white"),
        ("黑白漸層", "black-white-gradient"),
    ])
}

pub fn car_model_fallback() -> Vec<FacetOption> {
    static_options(&[
        ("Tesla Model 3", "tesla-model-3"),
        ("Tesla Model Y", "tesla-model-y"),
        ("Tesla Model S", "tesla-model-s"),
        ("Tesla Model X", "tesla-model-x"),
        ("AUDI", "audi"),
        ("BMW", "bmw"),
        ("BENZ", "benz"),
        ("PORSCHE", "porsche"),
        ("Range Rover", "range-rover"),
        ("HYUNDAI", "hyundai"),
        ("SKODA", "skoda"),
    ])
}

/// Where a facet's option list came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    Static,
    Fallback,
    Remote,
}

/// Option list for one facet plus provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOptions {
    pub options: Vec<FacetOption>,
    pub source: OptionSource,
    /// Set when the remote load failed and the fallback is being shown
    pub error: Option<String>,
}

impl FacetOptions {
    fn fixed(options: Vec<FacetOption>) -> Self {
        Self {
            options,
            source: OptionSource::Static,
            error: None,
        }
    }

    fn fallback(options: Vec<FacetOption>) -> Self {
        Self {
            options,
            source: OptionSource::Fallback,
            error: None,
        }
    }
}

/// Map remote items to options, value and label both being the item name.
/// An empty remote list yields the fallback.
pub fn resolve<T: NamedItem>(remote: &[T], fallback: Vec<FacetOption>) -> FacetOptions {
    if remote.is_empty() {
        return FacetOptions::fallback(fallback);
    }
    FacetOptions {
        options: remote
            .iter()
            .map(|item| FacetOption::new(item.name(), item.name()))
            .collect(),
        source: OptionSource::Remote,
        error: None,
    }
}

/// Apply a remote load outcome to a slot. Failures keep the fallback and
/// record the message; they never empty the list.
fn settle<T: NamedItem>(facet: Facet, outcome: Result<Vec<T>>, fallback: Vec<FacetOption>) -> FacetOptions {
    match outcome {
        Ok(items) => resolve(&items, fallback),
        Err(e) => {
            log::warn!("failed to load {} options, using fallback: {}", facet.key(), e);
            FacetOptions {
                options: fallback,
                source: OptionSource::Fallback,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Option lists for every facet on the gallery page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetOptionSet {
    pub film_type: FacetOptions,
    pub gloss_effect: FacetOptions,
    pub film_brand: FacetOptions,
    pub brightness: FacetOptions,
    pub color_category: FacetOptions,
    pub car_model: FacetOptions,
}

impl Default for FacetOptionSet {
    fn default() -> Self {
        Self {
            film_type: FacetOptions::fixed(film_type_options()),
            gloss_effect: FacetOptions::fixed(gloss_effect_options()),
            film_brand: FacetOptions::fallback(film_brand_fallback()),
            brightness: FacetOptions::fixed(brightness_options()),
            color_category: FacetOptions::fallback(color_category_fallback()),
            car_model: FacetOptions::fallback(car_model_fallback()),
        }
    }
}

impl FacetOptionSet {
    pub fn get(&self, facet: Facet) -> &FacetOptions {
        match facet {
            Facet::FilmType => &self.film_type,
            Facet::GlossEffect => &self.gloss_effect,
            Facet::FilmBrand => &self.film_brand,
            Facet::Brightness => &self.brightness,
            Facet::ColorCategory => &self.color_category,
            Facet::CarModel => &self.car_model,
        }
    }

    /// Facets whose controls are shown for the given state. Brightness and
    /// color category only apply to non-PPF color films.
    pub fn visible_facets(filters: &FilterState) -> Vec<Facet> {
        Facet::ALL
            .into_iter()
            .filter(|f| match f {
                Facet::Brightness | Facet::ColorCategory => filters.film_type == "others",
                _ => true,
            })
            .collect()
    }

    pub fn label_for(&self, facet: Facet, value: &str) -> Option<&str> {
        self.get(facet)
            .options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// Load the three remote-backed lists concurrently. Each list is written
/// into `target` as soon as its own request settles, independent of the
/// other two.
pub async fn load_remote_options<S>(source: &S, target: &Mutex<FacetOptionSet>)
where
    S: ContentSource + ?Sized,
{
    let brands = async {
        let resolved = settle(Facet::FilmBrand, source.film_brands().await, film_brand_fallback());
        if let Ok(mut set) = target.lock() {
            set.film_brand = resolved;
        }
    };
    let colors = async {
        let resolved = settle(
            Facet::ColorCategory,
            source.color_categories().await,
            color_category_fallback(),
        );
        if let Ok(mut set) = target.lock() {
            set.color_category = resolved;
        }
    };
    let models = async {
        let resolved = settle(Facet::CarModel, source.car_models().await, car_model_fallback());
        if let Ok(mut set) = target.lock() {
            set.car_model = resolved;
        }
    };
    futures::join!(brands, colors, models);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilmBrand;

    fn brand(name: &str) -> FilmBrand {
        FilmBrand {
            id: 1,
            document_id: String::new(),
            name: name.to_string(),
        }
    }

    #[test]
    fn empty_remote_falls_back() {
        let resolved = resolve::<FilmBrand>(&[], film_brand_fallback());
        assert_eq!(resolved.source, OptionSource::Fallback);
        assert_eq!(resolved.options, film_brand_fallback());
        assert!(!resolved.options.is_empty());
    }

    #[test]
    fn remote_items_use_name_for_label_and_value() {
        let resolved = resolve(&[brand("XPEL"), brand("3M")], film_brand_fallback());
        assert_eq!(resolved.source, OptionSource::Remote);
        assert_eq!(
            resolved.options,
            vec![FacetOption::new("XPEL", "XPEL"), FacetOption::new("3M", "3M")]
        );
    }

    #[test]
    fn failed_load_keeps_fallback_and_records_error() {
        let out = settle::<FilmBrand>(
            Facet::FilmBrand,
            Err(crate::Error::Network("refused".into())),
            film_brand_fallback(),
        );
        assert_eq!(out.options, film_brand_fallback());
        assert!(out.error.unwrap().contains("refused"));
    }

    #[test]
    fn color_facets_only_visible_for_other_films() {
        let all = FacetOptionSet::visible_facets(&FilterState::default());
        assert!(!all.contains(&Facet::Brightness));
        assert!(!all.contains(&Facet::ColorCategory));

        let others = FacetOptionSet::visible_facets(&FilterState::default().with_film_type("others"));
        assert_eq!(others.len(), 6);
    }

    #[test]
    fn labels_resolve_from_values() {
        let set = FacetOptionSet::default();
        assert_eq!(set.label_for(Facet::FilmType, "ppf"), Some("犀牛皮 PPF"));
        assert_eq!(set.label_for(Facet::GlossEffect, "nope"), None);
    }
}
