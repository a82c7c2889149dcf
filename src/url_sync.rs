//! Two-way mapping between the gallery filter state and the page URL.
//!
//! Filter changes replace the current history entry instead of pushing a
//! new one, so back/forward skips over individual checkbox clicks while the
//! address bar stays deep-linkable.

use crate::filters::{Facet, FilterState, FILM_TYPE_ALL};
use std::sync::Mutex;
use url::form_urlencoded;

/// Decode filter state from a query string (with or without leading `?`).
///
/// `filmType` takes the first value present, defaulting to `"all"`. Multi
/// facets collect every value for their key in order. Unknown keys and
/// values outside the known option sets are kept as-is.
pub fn parse_filters(query: &str) -> FilterState {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut state = FilterState::default();
    let mut film_type: Option<String> = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match Facet::from_key(&key) {
            Some(Facet::FilmType) => {
                if film_type.is_none() {
                    film_type = Some(value.into_owned());
                }
            }
            Some(facet) => state.push(facet, value.into_owned()),
            None => {}
        }
    }

    if let Some(ft) = film_type {
        state.film_type = ft;
    }
    state
}

/// Encode filter state as `path?query`, or the bare path when nothing is
/// selected.
pub fn build_url(path: &str, filters: &FilterState) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut any = false;

    if filters.film_type != FILM_TYPE_ALL {
        serializer.append_pair(Facet::FilmType.key(), &filters.film_type);
        any = true;
    }
    for facet in Facet::MULTI {
        for token in filters.values(facet) {
            serializer.append_pair(facet.key(), token);
            any = true;
        }
    }

    if any {
        format!("{}?{}", path, serializer.finish())
    } else {
        path.to_string()
    }
}

/// Split an incoming location (`/works?filmType=ppf#top`) into path and
/// query. Fragments are dropped.
pub fn split_location(location: &str) -> (&str, &str) {
    let location = location.split('#').next().unwrap_or(location);
    match location.split_once('?') {
        Some((path, query)) => (path, query),
        None => (location, ""),
    }
}

/// Browser history surface used by page controllers
pub trait Navigator: Send + Sync {
    /// Replace the current entry without adding history
    fn replace(&self, url: &str);

    /// Navigate and add a history entry
    fn push(&self, url: &str);

    /// URL of the current entry
    fn current(&self) -> String;
}

/// In-memory history stack. Used by the CLI and in tests.
pub struct MemoryHistory {
    entries: Mutex<Vec<String>>,
}

impl MemoryHistory {
    pub fn new(initial: &str) -> Self {
        MemoryHistory {
            entries: Mutex::new(vec![initial.to_string()]),
        }
    }

    /// Snapshot of every entry, oldest first
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryHistory {
    fn replace(&self, url: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            match entries.last_mut() {
                Some(last) => *last = url.to_string(),
                None => entries.push(url.to_string()),
            }
        }
    }

    fn push(&self, url: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(url.to_string());
        }
    }

    fn current(&self) -> String {
        self.entries
            .lock()
            .ok()
            .and_then(|e| e.last().cloned())
            .unwrap_or_default()
    }
}

/// Keeps the address bar in step with a page's filter state
pub struct UrlSynchronizer<N: Navigator> {
    path: String,
    navigator: N,
}

impl<N: Navigator> UrlSynchronizer<N> {
    pub fn new(path: impl Into<String>, navigator: N) -> Self {
        Self {
            path: path.into(),
            navigator,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Replace the current URL with the encoding of `filters`. Does not
    /// trigger any fetching.
    pub fn apply(&self, filters: &FilterState) -> String {
        let url = build_url(&self.path, filters);
        log::debug!("replacing location with {}", url);
        self.navigator.replace(&url);
        url
    }

    /// Navigate to the bare path as a new history entry. Used to recover
    /// from a failed page load.
    pub fn reload(&self) -> FilterState {
        log::debug!("reloading {}", self.path);
        self.navigator.push(&self.path);
        FilterState::default()
    }

    /// Reset to the default state and the bare path
    pub fn clear(&self) -> FilterState {
        let filters = FilterState::default();
        self.navigator.replace(&self.path);
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FilterState {
        FilterState {
            film_type: "others".into(),
            gloss_effect: vec!["satin".into(), "matte".into()],
            film_brand: vec!["3M".into()],
            brightness: vec!["dark".into()],
            color_category: vec!["黑白漸層".into()],
            car_model: vec!["Tesla Model 3".into(), "BMW".into()],
        }
    }

    #[test]
    fn decode_defaults_without_params() {
        assert_eq!(parse_filters(""), FilterState::default());
        assert_eq!(parse_filters("?"), FilterState::default());
    }

    #[test]
    fn decode_deep_link() {
        let f = parse_filters("?filmType=ppf&carModel=BMW&carModel=AUDI");
        assert_eq!(f.film_type, "ppf");
        assert_eq!(f.car_model, vec!["BMW", "AUDI"]);
        assert!(f.gloss_effect.is_empty());
        assert!(f.film_brand.is_empty());
        assert!(f.brightness.is_empty());
        assert!(f.color_category.is_empty());
    }

    #[test]
    fn decode_keeps_unknown_tokens_and_ignores_unknown_keys() {
        let f = parse_filters("glossEffect=sparkly&utm_source=x&filmType=a&filmType=b");
        assert_eq!(f.gloss_effect, vec!["sparkly"]);
        assert_eq!(f.film_type, "a");
    }

    #[test]
    fn encode_default_is_bare_path() {
        assert_eq!(build_url("/works", &FilterState::default()), "/works");
    }

    #[test]
    fn encode_omits_all_and_repeats_keys() {
        let f = FilterState::default().with_values(Facet::GlossEffect, vec!["glossy".into(), "satin".into()]);
        assert_eq!(build_url("/works", &f), "/works?glossEffect=glossy&glossEffect=satin");
    }

    #[test]
    fn round_trip_preserves_state() {
        for f in [FilterState::default(), sample(), FilterState::default().with_film_type("ppf")] {
            let url = build_url("/works", &f);
            let (_, query) = split_location(&url);
            assert_eq!(parse_filters(query), f);
        }
    }

    #[test]
    fn split_location_handles_fragments() {
        assert_eq!(split_location("/works?filmType=ppf#grid"), ("/works", "filmType=ppf"));
        assert_eq!(split_location("/works"), ("/works", ""));
    }

    #[test]
    fn apply_replaces_without_growing_history() {
        let sync = UrlSynchronizer::new("/works", MemoryHistory::new("/works"));
        sync.apply(&sample());
        sync.apply(&FilterState::default().with_film_type("ppf"));
        assert_eq!(sync.navigator().len(), 1);
        assert_eq!(sync.navigator().current(), "/works?filmType=ppf");
    }

    #[test]
    fn reload_pushes_bare_path() {
        let sync = UrlSynchronizer::new("/works", MemoryHistory::new("/works?filmType=ppf"));
        assert_eq!(sync.reload(), FilterState::default());
        assert_eq!(
            sync.navigator().entries(),
            vec!["/works?filmType=ppf".to_string(), "/works".to_string()]
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let sync = UrlSynchronizer::new("/works", MemoryHistory::new("/works?filmType=ppf"));
        let a = sync.clear();
        let url_a = sync.navigator().current();
        let b = sync.clear();
        assert_eq!(a, b);
        assert_eq!(a, FilterState::default());
        assert_eq!(url_a, "/works");
        assert_eq!(sync.navigator().current(), "/works");
    }
}
