//! Record schemas.
//!
//! Each entity type implements [`Record`], which doubles as its schema
//! descriptor: the storage key it lives under, the fields it requires, how a
//! set of raw [`Fields`] becomes a validated record, and how an edit behaves.

mod destination;
mod experience;
mod package;
mod review;
mod route;

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::DisplayConfig;
use crate::error::{Error, Result};

pub use destination::Destination;
pub use experience::{Experience, ExperienceKind};
pub use package::Package;
pub use review::Review;
pub use route::Route;

/// How a save behaves when it targets an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Replace the record at its current position, keeping its id.
    InPlace,
    /// Drop the old record and append a new one under a fresh id.
    Recreate,
}

/// A validated, storable entity.
pub trait Record:
    Clone + PartialEq + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Storage key holding the whole collection.
    const KEY: &'static str;

    /// Collection name used in messages and on the command line.
    const NAME: &'static str;

    /// Fields that must be non-empty after trimming.
    const REQUIRED: &'static [&'static str];

    /// Edit behaviour for this schema.
    const EDIT_MODE: EditMode = EditMode::InPlace;

    /// The record's identifier.
    fn id(&self) -> &str;

    /// Validate `fields` and build a record carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] listing every rejected field.
    fn from_fields(id: String, fields: &Fields) -> Result<Self>;

    /// Current values as editable fields (without the id).
    fn to_fields(&self) -> Fields;

    /// One-line rendering for listings.
    fn render(&self, _display: &DisplayConfig) -> String {
        self.to_string()
    }
}

/// Raw field input keyed by field name, as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    /// Create an empty set of fields.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, returning `self` for chaining.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Raw value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Trimmed value of a field; missing fields read as empty.
    #[must_use]
    pub fn trimmed(&self, name: &str) -> &str {
        self.get(name).map_or("", str::trim)
    }

    /// Overlay every field of `other` onto `self`.
    pub fn merge(&mut self, other: &Fields) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of fields present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no fields are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `name=value` pairs, e.g. from the command line.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming every pair without an `=` or with an
    /// empty name.
    pub fn parse_pairs<S: AsRef<str>>(collection: &'static str, pairs: &[S]) -> Result<Self> {
        let mut fields = Self::new();
        let mut problems = Vec::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((name, value)) if !name.trim().is_empty() => {
                    fields.set(name.trim(), value);
                }
                _ => problems.push(format!("expected name=value, got '{pair}'")),
            }
        }
        if problems.is_empty() {
            Ok(fields)
        } else {
            Err(Error::Validation {
                collection,
                problems,
            })
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Collects validation problems for one record so they are reported together.
#[derive(Debug)]
pub(crate) struct Checker<'a> {
    collection: &'static str,
    fields: &'a Fields,
    problems: Vec<String>,
}

impl<'a> Checker<'a> {
    /// Start checking input for `R`, recording every blank field named in
    /// [`Record::REQUIRED`].
    pub(crate) fn for_record<R: Record>(fields: &'a Fields) -> Self {
        let problems = R::REQUIRED
            .iter()
            .filter(|name| fields.trimmed(name).is_empty())
            .map(|name| format!("{name} is required"))
            .collect();
        Self {
            collection: R::NAME,
            fields,
            problems,
        }
    }

    /// Trimmed value, empty if absent.
    pub(crate) fn value(&self, name: &str) -> String {
        self.fields.trimmed(name).to_string()
    }

    pub(crate) fn problem(&mut self, message: impl Into<String>) {
        self.problems.push(message.into());
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T> {
        if self.problems.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation {
                collection: self.collection,
                problems: self.problems,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_trimmed() {
        let fields = Fields::new().with("name", "  Paris \n");
        assert_eq!(fields.trimmed("name"), "Paris");
        assert_eq!(fields.trimmed("missing"), "");
        assert_eq!(fields.get("name"), Some("  Paris \n"));
    }

    #[test]
    fn test_fields_merge_overrides() {
        let mut draft = Fields::new().with("name", "Paris").with("city", "Paris");
        draft.merge(&Fields::new().with("city", "Lyon"));

        assert_eq!(draft.get("name"), Some("Paris"));
        assert_eq!(draft.get("city"), Some("Lyon"));
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_fields_from_iter() {
        let fields: Fields = [("a", "1"), ("b", "2")].into_iter().collect();
        let pairs: Vec<_> = fields.iter().collect();
        assert_eq!(pairs, vec![("a", "1"), ("b", "2")]);
    }

    #[test]
    fn test_parse_pairs() {
        let fields = Fields::parse_pairs("routes", &["name=Coast", "time=10:30", "date="]).unwrap();
        assert_eq!(fields.get("name"), Some("Coast"));
        assert_eq!(fields.get("time"), Some("10:30"));
        assert_eq!(fields.get("date"), Some(""));
    }

    #[test]
    fn test_parse_pairs_value_may_contain_equals() {
        let fields = Fields::parse_pairs("experiences", &["tip=a=b"]).unwrap();
        assert_eq!(fields.get("tip"), Some("a=b"));
    }

    #[test]
    fn test_parse_pairs_rejects_malformed() {
        let err = Fields::parse_pairs("routes", &["name", "=x"]).unwrap_err();
        match err {
            Error::Validation { problems, .. } => assert_eq!(problems.len(), 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_checker_collects_all_problems() {
        let fields = Fields::new().with("name", "   ");
        let err = Checker::for_record::<Destination>(&fields)
            .finish(())
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "invalid destinations: name is required; country is required; city is required"
        );
    }

    fn blank_each_required<R: Record>(valid: &Fields) {
        assert!(R::from_fields("1".to_string(), valid).is_ok(), "{}", R::NAME);
        for name in R::REQUIRED {
            let mut fields = valid.clone();
            fields.set(*name, "  ");
            let err = R::from_fields("1".to_string(), &fields).unwrap_err();
            assert!(err.is_validation(), "{}.{name}", R::NAME);
            assert!(
                err.to_string().contains(&format!("{name} is required")),
                "{}.{name}: {err}",
                R::NAME
            );
        }
    }

    #[test]
    fn test_every_required_field_rejects_blank_input() {
        blank_each_required::<Destination>(
            &Fields::new()
                .with("name", "Paris")
                .with("country", "France")
                .with("city", "Paris"),
        );
        blank_each_required::<Package>(&Fields::new().with("name", "Beach").with("value", "10"));
        blank_each_required::<Route>(
            &Fields::new()
                .with("name", "Coast")
                .with("date", "12/05")
                .with("time", "10:30"),
        );
        blank_each_required::<Experience>(&Fields::new().with("name", "Sunset walk"));
        blank_each_required::<Review>(
            &Fields::new()
                .with("text", "Nice")
                .with("stars", "4")
                .with("location", "Porto"),
        );
    }
}
