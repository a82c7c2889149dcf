//! Works-gallery filter state and its translation into an API predicate.

use crate::query::{Constraint, Predicate};

/// Sentinel film type meaning "no film type constraint"
pub const FILM_TYPE_ALL: &str = "all";

/// One filterable dimension of the works gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    FilmType,
    GlossEffect,
    FilmBrand,
    Brightness,
    ColorCategory,
    CarModel,
}

impl Facet {
    /// All facets in display order
    pub const ALL: [Facet; 6] = [
        Facet::FilmType,
        Facet::GlossEffect,
        Facet::FilmBrand,
        Facet::Brightness,
        Facet::ColorCategory,
        Facet::CarModel,
    ];

    /// Multi-select facets in URL emission order
    pub const MULTI: [Facet; 5] = [
        Facet::GlossEffect,
        Facet::FilmBrand,
        Facet::Brightness,
        Facet::ColorCategory,
        Facet::CarModel,
    ];

    /// Query-string key on the gallery page
    pub fn key(&self) -> &'static str {
        match self {
            Facet::FilmType => "filmType",
            Facet::GlossEffect => "glossEffect",
            Facet::FilmBrand => "filmBrand",
            Facet::Brightness => "brightness",
            Facet::ColorCategory => "colorCategory",
            Facet::CarModel => "carModel",
        }
    }

    pub fn from_key(key: &str) -> Option<Facet> {
        Facet::ALL.into_iter().find(|f| f.key() == key)
    }

    pub fn is_multi(&self) -> bool {
        !matches!(self, Facet::FilmType)
    }

    /// Field path on the work entity this facet constrains.
    ///
    /// Relations are matched by display name, so renaming a brand in the CMS
    /// breaks existing deep links that use the old name.
    pub fn field_path(&self) -> &'static [&'static str] {
        match self {
            Facet::FilmType => &["filmType"],
            Facet::GlossEffect => &["glossEffect"],
            Facet::FilmBrand => &["filmBrand", "name"],
            Facet::Brightness => &["brightness"],
            Facet::ColorCategory => &["colorCategories", "name"],
            Facet::CarModel => &["carModel", "name"],
        }
    }

    /// Heading shown above the facet's control
    pub fn title(&self) -> &'static str {
        match self {
            Facet::FilmType => "膜類型",
            Facet::GlossEffect => "光澤效果",
            Facet::FilmBrand => "膜料廠牌",
            Facet::Brightness => "深淺色調",
            Facet::ColorCategory => "色系",
            Facet::CarModel => "車種",
        }
    }
}

/// Currently selected filter values for one gallery page view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub film_type: String,
    pub gloss_effect: Vec<String>,
    pub film_brand: Vec<String>,
    pub brightness: Vec<String>,
    pub color_category: Vec<String>,
    pub car_model: Vec<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            film_type: FILM_TYPE_ALL.to_string(),
            gloss_effect: Vec::new(),
            film_brand: Vec::new(),
            brightness: Vec::new(),
            color_category: Vec::new(),
            car_model: Vec::new(),
        }
    }
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == FilterState::default()
    }

    pub fn film_type_is_all(&self) -> bool {
        self.film_type == FILM_TYPE_ALL
    }

    /// Values for a facet. The single-select facet yields its one value.
    pub fn values(&self, facet: Facet) -> &[String] {
        match facet {
            Facet::FilmType => std::slice::from_ref(&self.film_type),
            Facet::GlossEffect => &self.gloss_effect,
            Facet::FilmBrand => &self.film_brand,
            Facet::Brightness => &self.brightness,
            Facet::ColorCategory => &self.color_category,
            Facet::CarModel => &self.car_model,
        }
    }

    fn values_mut(&mut self, facet: Facet) -> Option<&mut Vec<String>> {
        match facet {
            Facet::FilmType => None,
            Facet::GlossEffect => Some(&mut self.gloss_effect),
            Facet::FilmBrand => Some(&mut self.film_brand),
            Facet::Brightness => Some(&mut self.brightness),
            Facet::ColorCategory => Some(&mut self.color_category),
            Facet::CarModel => Some(&mut self.car_model),
        }
    }

    /// Copy of this state with one facet replaced.
    ///
    /// For `FilmType` the first value wins and an empty list resets to `"all"`.
    pub fn with_values(&self, facet: Facet, values: Vec<String>) -> FilterState {
        let mut next = self.clone();
        match next.values_mut(facet) {
            Some(slot) => *slot = values,
            None => {
                next.film_type = values
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| FILM_TYPE_ALL.to_string())
            }
        }
        next
    }

    /// Append a value in place. The film type is overwritten instead.
    pub fn push(&mut self, facet: Facet, value: String) {
        match self.values_mut(facet) {
            Some(slot) => slot.push(value),
            None => self.film_type = value,
        }
    }

    pub fn with_film_type(&self, value: impl Into<String>) -> FilterState {
        FilterState {
            film_type: value.into(),
            ..self.clone()
        }
    }

    /// Add the value if absent, remove it if present. The film type is
    /// single-valued: toggling the selected one goes back to `"all"`.
    pub fn toggle(&self, facet: Facet, value: &str) -> FilterState {
        if facet == Facet::FilmType {
            return if self.film_type == value {
                self.with_film_type(FILM_TYPE_ALL)
            } else {
                self.with_film_type(value)
            };
        }
        let mut values = self.values(facet).to_vec();
        if let Some(pos) = values.iter().position(|v| v == value) {
            values.remove(pos);
        } else {
            values.push(value.to_string());
        }
        self.with_values(facet, values)
    }

    /// Translate into the API predicate: equality for the film type unless
    /// it is `"all"`, membership for every non-empty multi facet.
    pub fn predicate(&self) -> Predicate {
        let mut constraints = Vec::new();
        if !self.film_type_is_all() {
            constraints.push(Constraint::eq(
                Facet::FilmType.field_path(),
                self.film_type.clone(),
            ));
        }
        for facet in Facet::MULTI {
            let values = self.values(facet);
            if !values.is_empty() {
                constraints.push(Constraint::is_in(facet.field_path(), values));
            }
        }
        Predicate(constraints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;

    #[test]
    fn default_state_has_empty_predicate() {
        let f = FilterState::default();
        assert!(f.is_default());
        assert!(f.predicate().is_empty());
    }

    #[test]
    fn ppf_glossy_builds_two_constraints() {
        let f = FilterState {
            film_type: "ppf".into(),
            gloss_effect: vec!["glossy".into()],
            ..Default::default()
        };
        let p = f.predicate();
        assert_eq!(p.len(), 2);

        let film = p.get("filmType").unwrap();
        assert_eq!(film.op, Operator::Eq);
        assert_eq!(film.values, vec!["ppf"]);

        let gloss = p.get("glossEffect").unwrap();
        assert_eq!(gloss.op, Operator::In);
        assert_eq!(gloss.values, vec!["glossy"]);

        for absent in ["filmBrand.name", "brightness", "colorCategories.name", "carModel.name"] {
            assert!(p.get(absent).is_none(), "{} should be absent", absent);
        }
    }

    #[test]
    fn relation_facets_match_by_name() {
        let f = FilterState::default()
            .with_values(Facet::CarModel, vec!["BMW".into(), "AUDI".into()]);
        let c = f.predicate().get("carModel.name").cloned().unwrap();
        assert_eq!(c.values, vec!["BMW", "AUDI"]);
    }

    #[test]
    fn film_type_facet_resets_to_all_when_emptied() {
        let f = FilterState::default().with_film_type("ppf");
        assert_eq!(f.values(Facet::FilmType), ["ppf".to_string()]);
        let f = f.with_values(Facet::FilmType, vec![]);
        assert!(f.film_type_is_all());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let f = FilterState::default().toggle(Facet::FilmBrand, "3M");
        assert_eq!(f.film_brand, vec!["3M"]);
        let f = f.toggle(Facet::FilmBrand, "3M");
        assert!(f.film_brand.is_empty());
    }

    #[test]
    fn toggle_film_type_selects_then_resets() {
        let f = FilterState::default().toggle(Facet::FilmType, "ppf");
        assert_eq!(f.film_type, "ppf");
        let f = f.toggle(Facet::FilmType, "others");
        assert_eq!(f.film_type, "others");
        let f = f.toggle(Facet::FilmType, "others");
        assert!(f.film_type_is_all());
    }

    #[test]
    fn facet_keys_round_trip() {
        for facet in Facet::ALL {
            assert_eq!(Facet::from_key(facet.key()), Some(facet));
        }
        assert_eq!(Facet::from_key("colorTone"), None);
    }
}
