//! Slash-delimited drive paths
//!
//! A [`DrivePath`] is a normalized sequence of non-empty segments. Parsing never
//! fails: empty segments are dropped, so `"//a///b/"` and `"a/b"` are the same
//! path, and anything that reduces to nothing is the root.

use std::fmt;

pub const SEPARATOR: char = '/';

/// Normalized segment sequence; the empty sequence is the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrivePath {
    segments: Vec<String>,
}

impl DrivePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Split on the separator, dropping empty segments
    pub fn parse(s: &str) -> Self {
        Self {
            segments: s
                .split(SEPARATOR)
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Build from raw segments, splitting any that contain the separator
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = Self::root();
        for segment in segments {
            path.segments.extend(
                segment
                    .as_ref()
                    .split(SEPARATOR)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string),
            );
        }
        path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Last segment, or empty for the root
    pub fn basename(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// All segments but the last
    pub fn dirname(&self) -> DrivePath {
        let keep = self.segments.len().saturating_sub(1);
        Self {
            segments: self.segments[..keep].to_vec(),
        }
    }

    pub fn join(&self, name: &str) -> DrivePath {
        let mut joined = self.clone();
        joined
            .segments
            .extend(name.split(SEPARATOR).filter(|s| !s.is_empty()).map(str::to_string));
        joined
    }

    /// True when `self` equals `other` or lies underneath it
    pub fn starts_with(&self, other: &DrivePath) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

/// Extension of a single segment including the dot, if any
pub fn extname(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}

impl fmt::Display for DrivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "{}", SEPARATOR)
        } else {
            write!(f, "{}", self.segments.join("/"))
        }
    }
}

impl From<&str> for DrivePath {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for DrivePath {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&String> for DrivePath {
    fn from(s: &String) -> Self {
        Self::parse(s)
    }
}

impl From<&DrivePath> for DrivePath {
    fn from(path: &DrivePath) -> Self {
        path.clone()
    }
}

impl From<Vec<String>> for DrivePath {
    fn from(segments: Vec<String>) -> Self {
        Self::from_segments(segments)
    }
}

impl From<&[&str]> for DrivePath {
    fn from(segments: &[&str]) -> Self {
        Self::from_segments(segments)
    }
}

impl<const N: usize> From<[&str; N]> for DrivePath {
    fn from(segments: [&str; N]) -> Self {
        Self::from_segments(segments)
    }
}
