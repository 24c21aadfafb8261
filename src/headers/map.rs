//! Case-insensitive, insertion-ordered header multimap.

use indexmap::IndexMap;

use crate::headers::error::Error;
use crate::headers::validate::{valid_name, valid_value};

/// Conversion into an ordered list of header values.
///
/// A single string becomes a one-element list.
pub trait IntoHeaderValues {
    fn into_header_values(self) -> Vec<String>;
}

impl IntoHeaderValues for &str {
    fn into_header_values(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl IntoHeaderValues for String {
    fn into_header_values(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoHeaderValues for &String {
    fn into_header_values(self) -> Vec<String> {
        vec![self.clone()]
    }
}

impl IntoHeaderValues for Vec<String> {
    fn into_header_values(self) -> Vec<String> {
        self
    }
}

impl IntoHeaderValues for Vec<&str> {
    fn into_header_values(self) -> Vec<String> {
        self.into_iter().map(str::to_string).collect()
    }
}

impl IntoHeaderValues for &[&str] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().map(|v| v.to_string()).collect()
    }
}

impl IntoHeaderValues for &[String] {
    fn into_header_values(self) -> Vec<String> {
        self.to_vec()
    }
}

impl<const N: usize> IntoHeaderValues for [&str; N] {
    fn into_header_values(self) -> Vec<String> {
        self.iter().map(|v| v.to_string()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    values: Vec<String>,
}

/// HTTP headers keyed case-insensitively.
///
/// Each header keeps the case of the name that first set it and an ordered list of
/// values. Every mutation validates its input before touching the map, so a failed
/// call leaves the headers unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    entries: IndexMap<String, Entry>,
}

impl HeaderMap {
    /// Create an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a header map from `(name, values)` pairs, in order.
    ///
    /// A later pair replaces an earlier one with a case-insensitively equal name.
    pub fn from_pairs<I, N, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: IntoHeaderValues,
    {
        let mut headers = Self::new();
        for (name, values) in pairs {
            headers.insert(name.as_ref(), values)?;
        }
        Ok(headers)
    }

    /// Check if a header exists (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    /// Get the values of a header, or an empty slice if it is absent.
    pub fn get(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
            .unwrap_or_default()
    }

    /// Get the values of a header joined with `", "`.
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).join(", ")
    }

    /// The name of a header in the case it is stored with.
    pub fn stored_name(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.name.as_str())
    }

    /// Iterate over `(name, values)` in insertion order, names in stored case.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace a header.
    ///
    /// Any case-insensitive match is removed first, so the case of `name` becomes
    /// the stored case.
    pub fn insert(&mut self, name: &str, values: impl IntoHeaderValues) -> Result<(), Error> {
        let name = valid_name(name)?;
        let values = valid_values(values)?;
        self.insert_trusted(name, values);
        Ok(())
    }

    /// Append values to a header, keeping the stored case of its name.
    ///
    /// Behaves like [`insert`](Self::insert) when the header is absent.
    pub fn append(&mut self, name: &str, values: impl IntoHeaderValues) -> Result<(), Error> {
        let name = valid_name(name)?;
        let values = valid_values(values)?;
        match self.entries.get_mut(&name.to_ascii_lowercase()) {
            Some(entry) => entry.values.extend(values),
            None => self.insert_trusted(name, values),
        }
        Ok(())
    }

    /// Remove a header (case-insensitive), returning its values if it was present.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries
            .shift_remove(&name.to_ascii_lowercase())
            .map(|entry| entry.values)
    }

    // Values built by the crate itself from already validated components
    pub(crate) fn insert_trusted(&mut self, name: &str, values: Vec<String>) {
        let index = name.to_ascii_lowercase();
        self.entries.shift_remove(&index);
        self.entries.insert(
            index,
            Entry {
                name: name.to_string(),
                values,
            },
        );
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = (&'a str, &'a [String]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

fn valid_values(values: impl IntoHeaderValues) -> Result<Vec<String>, Error> {
    let values = values.into_header_values();
    for value in &values {
        valid_value(value)?;
    }
    Ok(values)
}
