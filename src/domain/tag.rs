use crate::domain::version::VersionInformation;
use crate::error::{NisseError, Result};
use git2::Oid;
use regex::Regex;
use std::fmt;

/// Placeholder substituted with the version capture in tag templates
pub const VERSION_PLACEHOLDER: &str = "${version}";

const TAG_REF_PREFIX: &str = "refs/tags/";

/// Release tags: `refs/tags/1.2.3` or `refs/tags/v1.2.3`, anything may follow the triple.
const RELEASE_TAG_REGEX: &str = r"^refs/tags/v?((\d+)\.(\d+)\.(\d+)(.*))$";

const VERSION_CAPTURE: &str = r"(\d+)\.(\d+)\.(\d+)";

/// Version extracted from a tag name.
///
/// Orders by the numeric triple first, then by the free-form suffix as a
/// plain string, so the order is total over every matched tag.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TagVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub suffix: String,
}

impl TagVersion {
    /// Converts into a [VersionInformation], the suffix minus its leading
    /// separator becoming the qualifier.
    pub fn to_version_information(&self) -> VersionInformation {
        let mut version = VersionInformation::new(self.major, self.minor, self.patch);
        let qualifier = self.suffix.trim_start_matches(['-', '.']);
        if !qualifier.is_empty() {
            version.set_qualifier(qualifier);
        }
        version
    }
}

impl fmt::Display for TagVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}{}", self.major, self.minor, self.patch, self.suffix)
    }
}

/// A tag whose name carried a version, along with the commit it points at
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TagMatch {
    pub version: TagVersion,
    pub tag_name: String,
    pub target: Oid,
}

/// A tag as listed from the repository, already peeled to its commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRef {
    /// Full reference name, e.g. `refs/tags/v1.0.0`
    pub name: String,
    pub target: Oid,
}

impl TagRef {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        let name = name.into();
        let name = if name.starts_with(TAG_REF_PREFIX) {
            name
        } else {
            format!("{}{}", TAG_REF_PREFIX, name)
        };
        TagRef { name, target }
    }

    /// Tag name without the `refs/tags/` prefix
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix(TAG_REF_PREFIX).unwrap_or(&self.name)
    }
}

/// Tag naming pattern used to pull versions out of tags.
#[derive(Debug, Clone)]
pub struct TagPattern {
    regex: Regex,
    /// Matches against the full ref name instead of the short tag name
    full_ref: bool,
}

impl TagPattern {
    /// The pattern for release tags: `v?MAJOR.MINOR.PATCH<anything>`
    pub fn release() -> Result<Self> {
        let regex = Regex::new(RELEASE_TAG_REGEX)
            .map_err(|e| NisseError::pattern(format!("release tags: {}", e)))?;
        Ok(TagPattern {
            regex,
            full_ref: true,
        })
    }

    /// Build a pattern from a template containing exactly one `${version}`.
    ///
    /// Everything around the placeholder is matched literally, e.g.
    /// `${version}-SNAPSHOT` matches `1.5.0-SNAPSHOT` but not `1.5.0`.
    pub fn from_template(template: &str) -> Result<Self> {
        let parts: Vec<&str> = template.split(VERSION_PLACEHOLDER).collect();
        if parts.len() != 2 {
            return Err(NisseError::pattern(format!(
                "'{}' must contain {} exactly once",
                template, VERSION_PLACEHOLDER
            )));
        }

        let regex_pattern = format!(
            "^{}{}{}$",
            regex::escape(parts[0]),
            VERSION_CAPTURE,
            regex::escape(parts[1])
        );
        let regex = Regex::new(&regex_pattern)
            .map_err(|e| NisseError::pattern(format!("'{}': {}", template, e)))?;

        Ok(TagPattern {
            regex,
            full_ref: false,
        })
    }

    /// Extract the version carried by the tag, if the tag matches
    pub fn extract(&self, tag: &TagRef) -> Option<TagVersion> {
        let subject = if self.full_ref {
            tag.name.as_str()
        } else {
            tag.short_name()
        };
        let captures = self.regex.captures(subject)?;

        // The release regex nests the triple inside an outer group.
        let offset = if self.full_ref { 1 } else { 0 };
        let number = |index: usize| -> Option<u32> {
            captures.get(index + offset)?.as_str().parse().ok()
        };

        Some(TagVersion {
            major: number(1)?,
            minor: number(2)?,
            patch: number(3)?,
            suffix: if self.full_ref {
                captures.get(5).map_or("", |m| m.as_str()).to_string()
            } else {
                String::new()
            },
        })
    }

    /// Check whether the tag matches this pattern
    pub fn matches(&self, tag: &TagRef) -> bool {
        self.extract(tag).is_some()
    }

    /// Match the tag, keeping its name and target alongside the version
    pub fn match_tag(&self, tag: &TagRef) -> Option<TagMatch> {
        self.extract(tag).map(|version| TagMatch {
            version,
            tag_name: tag.short_name().to_string(),
            target: tag.target,
        })
    }
}

/// Pick the highest version among the matches
pub fn highest<I>(matches: I) -> Option<TagMatch>
where
    I: IntoIterator<Item = TagMatch>,
{
    matches.into_iter().max()
}
