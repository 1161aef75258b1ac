//! Textual paths in the node's addressing scheme.

/// Namespace for paths rooted at an immutable content identifier.
pub const IPFS_NAMESPACE: &str = "ipfs";

/// Namespace for mutable names; recognized but never resolved here.
pub const IPNS_NAMESPACE: &str = "ipns";

/// Marker a directory enumeration appends to names of directory children.
pub const SEPARATOR: char = '/';

/// An opaque path such as `/ipfs/<cid>/docs/readme` or `<cid>/docs`.
///
/// Parsing never fails; whether the path means anything is up to the
/// resolver.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DagPath(String);

impl DagPath {
    pub fn from_string<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Non-empty components between separators.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|s| !s.is_empty())
    }

    /// The namespace when the path starts with `/<ns>/` and `<ns>` is a
    /// known namespace.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        match self.segments().next() {
            Some(ns @ (IPFS_NAMESPACE | IPNS_NAMESPACE)) => Some(ns),
            _ => None,
        }
    }

    #[must_use]
    pub fn basename(&self) -> String {
        basename(&self.0)
    }
}

impl std::fmt::Display for DagPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DagPath {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl From<String> for DagPath {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Last element of a slash-separated path, ignoring trailing separators.
///
/// An empty path yields `"."` and a path made only of separators yields
/// `"/"`.
pub fn basename<S: AsRef<str>>(path: S) -> String {
    let path = path.as_ref();
    if path.is_empty() {
        return ".".to_string();
    }
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        return SEPARATOR.to_string();
    }
    match trimmed.rfind(SEPARATOR) {
        Some(idx) => trimmed[idx + 1..].to_string(),
        None => trimmed.to_string(),
    }
}

/// True when an enumerated child name carries the directory marker.
pub fn has_dir_marker<S: AsRef<str>>(name: S) -> bool {
    name.as_ref().ends_with(SEPARATOR)
}
