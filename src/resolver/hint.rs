use crate::config::DynamicVersionSettings;
use crate::domain::{highest, TagMatch, TagPattern, TagRef, VersionInformation};
use crate::error::Result;
use crate::resolver::scanner::HistoryVersion;
use std::cmp::Ordering;
use tracing::debug;

/// Finds version hint tags and weighs them against the history-derived version.
///
/// Hint tags are looked up across every tag of the repository, not only the
/// ones reachable from HEAD.
pub struct VersionHintResolver {
    pattern: TagPattern,
    default_pattern: bool,
}

impl VersionHintResolver {
    pub fn new(settings: &DynamicVersionSettings) -> Result<Self> {
        Ok(VersionHintResolver {
            pattern: TagPattern::from_template(&settings.version_hint_pattern)?,
            default_pattern: settings.uses_default_hint_pattern(),
        })
    }

    /// The hint tag pattern, also used to keep hint tags out of release matching
    pub fn pattern(&self) -> &TagPattern {
        &self.pattern
    }

    /// The highest hint tag, if any
    pub fn candidate(&self, tags: &[TagRef]) -> Option<TagMatch> {
        highest(tags.iter().filter_map(|tag| self.pattern.match_tag(tag)))
    }

    /// Pick the version to report.
    ///
    /// With a custom hint pattern a hint always wins. With the default pattern
    /// a hint wins outright when no release tag was found, otherwise only when
    /// its `major.minor.patch` is higher than the history version.
    pub fn arbitrate(
        &self,
        history: &HistoryVersion,
        hint: Option<&TagMatch>,
        settings: &DynamicVersionSettings,
    ) -> String {
        let hint = match hint {
            Some(hint) => hint,
            None => return history.to_string(),
        };

        let mut hinted: VersionInformation = hint.version.to_version_information();
        if settings.append_snapshot {
            hinted.mark_snapshot();
        }

        let hint_wins = if !self.default_pattern {
            debug!("Custom hint pattern, hint tag {} wins", hint.tag_name);
            true
        } else if history.is_untagged() {
            debug!("No release tag found, hint tag {} wins", hint.tag_name);
            true
        } else {
            let ordering = hinted.cmp_release(&history.version);
            debug!(
                "Hint tag {} compared to {}: {:?}",
                hint.tag_name, history, ordering
            );
            ordering == Ordering::Greater
        };

        if hint_wins {
            hinted.to_string()
        } else {
            history.to_string()
        }
    }
}
