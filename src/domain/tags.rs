use std::collections::BTreeSet;
use std::fmt;

/// Deduplicated set of collector tags.
///
/// Backed by an ordered set so the joined header value is deterministic; the
/// ordering itself carries no meaning. Every inserted tag is split on `,`,
/// trimmed, and dropped when empty, so the header never carries blank or
/// repeated entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: BTreeSet<String>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Union of the call-supplied tags and the default tags.
    pub fn merge<I, S>(call_tags: I, defaults: &TagSet) -> TagSet
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut merged = defaults.clone();
        merged.extend(call_tags);
        merged
    }

    /// Returns `true` when at least one new tag was added.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        let mut added = false;
        for part in split_tag(&tag.into()) {
            added |= self.tags.insert(part);
        }
        added
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Comma-joined form used for the tag header. `None` when there are no tags.
    pub fn to_header_value(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.iter().collect::<Vec<_>>().join(","))
        }
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<S: Into<String>> Extend<S> for TagSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

fn split_tag(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_header_value().unwrap_or_default())
    }
}
