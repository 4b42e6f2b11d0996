//! Ordered multi-valued form and query values.

use indexmap::IndexMap;
use url::form_urlencoded;

/// A multi-map of form values keyed by parameter name.
///
/// Names keep their first-seen order and each name keeps every value in
/// arrival order. [`encode`](Self::encode) sorts names so the encoded form is
/// independent of insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    values: IndexMap<String, Vec<String>>,
}

impl FormValues {
    /// Creates an empty set of values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` string.
    ///
    /// Parsing is lenient: malformed escapes are kept literally.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut values = Self::new();
        values.append_encoded(input);
        values
    }

    /// Appends every pair of an encoded string to the existing values.
    pub fn append_encoded(&mut self, input: &str) {
        for (name, value) in form_urlencoded::parse(input.as_bytes()) {
            self.add(name.into_owned(), value.into_owned());
        }
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns every value for `name`, or an empty slice.
    #[must_use]
    pub fn get_all(&self, name: &str) -> &[String] {
        self.values
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Replaces all values for `name` with `value`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), vec![value.into()]);
    }

    /// Appends `value` to the values for `name`.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Removes all values for `name`.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.values.shift_remove(name)
    }

    /// Returns `true` if `name` has at least one entry.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterates over names and their values in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Iterates over the names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Returns the number of distinct names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Encodes the values with names sorted, each value in arrival order.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut names: Vec<&String> = self.values.keys().collect();
        names.sort_unstable();
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for name in names {
            for value in &self.values[name] {
                serializer.append_pair(name, value);
            }
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (name, value) in iter {
            values.add(name, value);
        }
        values
    }
}
