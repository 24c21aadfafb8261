//! Privileged header lookup.

use std::collections::HashMap;

use indexmap::IndexMap;

/// Headers a web server exposes outside of the environment variables.
///
/// Some servers keep `Authorization` out of the environment and only hand it out
/// through a separate call. Lookups are case-sensitive.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<String>;
}

impl HeaderSource for IndexMap<String, String> {
    fn header(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl HeaderSource for HashMap<String, String> {
    fn header(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
