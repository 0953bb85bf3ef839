use crate::error::{NisseError, Result};
use std::cmp::Ordering;
use std::fmt;

/// Qualifier marking a version as not yet released.
pub const SNAPSHOT: &str = "SNAPSHOT";

/// Semantic version with optional build number and qualifier.
///
/// Renders as `major.minor.patch[.buildNumber][-qualifier]`.
///
/// Ordering compares the numeric segments most-significant first (a missing
/// build number sorts below any present one). When all numeric segments are
/// equal, a version without qualifier is higher than one with a qualifier,
/// since the qualified version is a pre-release of the plain one. Two
/// qualifiers compare as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionInformation {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub build_number: Option<u32>,
    pub qualifier: Option<String>,
}

impl VersionInformation {
    /// Create a plain `major.minor.patch` version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        VersionInformation {
            major,
            minor,
            patch,
            build_number: None,
            qualifier: None,
        }
    }

    /// Parse a version string such as `1.2.3`, `1.2.3.7-SNAPSHOT` or `0.0.1-5`.
    ///
    /// Up to three leading numeric segments fill `major.minor.patch` (missing
    /// ones default to zero), an optional fourth numeric segment is the build
    /// number, and everything after the first `-` is the qualifier.
    pub fn parse(version: &str) -> Result<Self> {
        let trimmed = version.trim();
        let (numeric, qualifier) = match trimmed.split_once('-') {
            Some((numeric, qualifier)) => (numeric, Some(qualifier)),
            None => (trimmed, None),
        };

        if numeric.is_empty() {
            return Err(NisseError::version(format!(
                "'{}' has no numeric segments",
                version
            )));
        }

        let parts: Vec<&str> = numeric.split('.').collect();
        if parts.len() > 4 {
            return Err(NisseError::version(format!(
                "'{}' has more than four numeric segments",
                version
            )));
        }

        let mut segments = [0u32; 3];
        let mut build_number = None;
        for (index, part) in parts.iter().enumerate() {
            let value = part.parse::<u32>().map_err(|_| {
                NisseError::version(format!("Invalid segment '{}' in '{}'", part, version))
            })?;
            if index < 3 {
                segments[index] = value;
            } else {
                build_number = Some(value);
            }
        }

        let qualifier = match qualifier {
            Some("") => {
                return Err(NisseError::version(format!(
                    "'{}' has an empty qualifier",
                    version
                )))
            }
            Some(q) => Some(q.to_string()),
            None => None,
        };

        Ok(VersionInformation {
            major: segments[0],
            minor: segments[1],
            patch: segments[2],
            build_number,
            qualifier,
        })
    }

    pub fn set_patch(&mut self, patch: u32) {
        self.patch = patch;
    }

    pub fn set_build_number(&mut self, build_number: u32) {
        self.build_number = Some(build_number);
    }

    pub fn set_qualifier(&mut self, qualifier: impl Into<String>) {
        self.qualifier = Some(qualifier.into());
    }

    /// Marks the version as a snapshot.
    ///
    /// An existing qualifier is kept and `SNAPSHOT` is chained after it, so
    /// `0.0.1-5` becomes `0.0.1-5-SNAPSHOT`.
    pub fn mark_snapshot(&mut self) {
        self.qualifier = Some(match self.qualifier.take() {
            Some(existing) if existing == SNAPSHOT || existing.ends_with("-SNAPSHOT") => existing,
            Some(existing) => format!("{}-{}", existing, SNAPSHOT),
            None => SNAPSHOT.to_string(),
        });
    }

    /// Compares only `major.minor.patch`
    pub fn cmp_release(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch).cmp(&(other.major, other.minor, other.patch))
    }
}

impl Ord for VersionInformation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_release(other)
            .then_with(|| self.build_number.cmp(&other.build_number))
            .then_with(|| match (&self.qualifier, &other.qualifier) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for VersionInformation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for VersionInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(build_number) = self.build_number {
            write!(f, ".{}", build_number)?;
        }
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for VersionInformation {
    type Err = NisseError;

    fn from_str(s: &str) -> Result<Self> {
        VersionInformation::parse(s)
    }
}
