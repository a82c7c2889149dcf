//! Query construction for the content API.
//!
//! The CMS accepts a bracketed query-string dialect:
//!
//! ```text
//! filters[filmType][$eq]=ppf
//! filters[carModel][name][$in]=BMW&filters[carModel][name][$in]=AUDI
//! pagination[page]=1&pagination[pageSize]=25
//! populate=*
//! ```
//!
//! Keys are emitted literally and only values are percent-encoded, so the
//! produced URLs stay readable in logs. Array values repeat the key once per
//! element.

use url::form_urlencoded::byte_serialize;

/// Comparison operator understood by the filter dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    In,
    ContainsI,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::In => "$in",
            Operator::ContainsI => "$containsi",
        }
    }
}

/// A single `field op value(s)` filter entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Field path; relations are walked with one segment per hop
    pub path: Vec<String>,
    pub op: Operator,
    pub values: Vec<String>,
}

impl Constraint {
    pub fn eq(path: &[&str], value: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            op: Operator::Eq,
            values: vec![value.into()],
        }
    }

    pub fn is_in(path: &[&str], values: &[String]) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            op: Operator::In,
            values: values.to_vec(),
        }
    }

    pub fn contains_i(path: &[&str], value: impl Into<String>) -> Self {
        Self {
            path: path.iter().map(|s| s.to_string()).collect(),
            op: Operator::ContainsI,
            values: vec![value.into()],
        }
    }

    /// Dotted field path, e.g. `carModel.name`
    pub fn field(&self) -> String {
        self.path.join(".")
    }

    fn key(&self) -> String {
        let mut key = String::from("filters");
        for segment in &self.path {
            key.push('[');
            key.push_str(segment);
            key.push(']');
        }
        key.push('[');
        key.push_str(self.op.as_str());
        key.push(']');
        key
    }
}

/// Conjunction of constraints. Empty means "no filtering".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate(pub Vec<Constraint>);

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.0
    }

    /// Look up the constraint on a dotted field path
    pub fn get(&self, field: &str) -> Option<&Constraint> {
        self.0.iter().find(|c| c.field() == field)
    }
}

/// Builder for a collection request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    populate: Option<String>,
    filters: Vec<Constraint>,
    pagination: Option<(u32, u32)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the API to inline nested relations (`*` for all)
    pub fn populate(mut self, directive: impl Into<String>) -> Self {
        self.populate = Some(directive.into());
        self
    }

    pub fn filter(mut self, constraint: Constraint) -> Self {
        self.filters.push(constraint);
        self
    }

    pub fn predicate(mut self, predicate: Predicate) -> Self {
        self.filters.extend(predicate.0);
        self
    }

    pub fn pagination(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some((page, page_size));
        self
    }

    pub fn filters(&self) -> &[Constraint] {
        &self.filters
    }

    /// Key/value pairs in emission order, values not yet encoded
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for c in &self.filters {
            let key = c.key();
            for v in &c.values {
                out.push((key.clone(), v.clone()));
            }
        }
        if let Some(directive) = &self.populate {
            out.push(("populate".to_string(), directive.clone()));
        }
        if let Some((page, size)) = self.pagination {
            out.push(("pagination[page]".to_string(), page.to_string()));
            out.push(("pagination[pageSize]".to_string(), size.to_string()));
        }
        out
    }

    /// Serialize without the leading `?`; empty when nothing is set
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, byte_serialize(v.as_bytes()).collect::<String>()))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_serializes_to_nothing() {
        assert_eq!(Query::new().to_query_string(), "");
    }

    #[test]
    fn membership_repeats_key_per_value() {
        let q = Query::new().filter(Constraint::is_in(
            &["carModel", "name"],
            &["BMW".to_string(), "AUDI".to_string()],
        ));
        assert_eq!(
            q.to_query_string(),
            "filters[carModel][name][$in]=BMW&filters[carModel][name][$in]=AUDI"
        );
    }

    #[test]
    fn values_are_encoded_keys_are_not() {
        let q = Query::new()
            .filter(Constraint::eq(&["category", "id"], "7"))
            .filter(Constraint::contains_i(&["question"], "膜 保養"))
            .populate("*")
            .pagination(2, 10);
        let s = q.to_query_string();
        assert!(s.starts_with("filters[category][id][$eq]=7&filters[question][$containsi]="));
        assert!(!s.contains("膜"));
        assert!(s.ends_with("populate=*&pagination[page]=2&pagination[pageSize]=10"));
    }

    #[test]
    fn predicate_lookup_by_dotted_field() {
        let p = Predicate(vec![Constraint::eq(&["filmType"], "ppf")]);
        assert_eq!(p.get("filmType").unwrap().op, Operator::Eq);
        assert!(p.get("glossEffect").is_none());
    }
}
