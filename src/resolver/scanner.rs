use crate::config::DynamicVersionSettings;
use crate::domain::{highest, TagMatch, TagPattern, TagRef, VersionInformation};
use crate::error::{NisseError, Result};
use crate::git::Repository;
use git2::Oid;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Where a history-derived version came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionOrigin {
    /// HEAD itself carries a release tag
    Released { tag: String },
    /// The nearest tagged ancestor, `distance` commits behind HEAD
    Ancestor { tag: String, distance: u32 },
    /// No release tag is reachable; `commits` is the length of the history
    Untagged { commits: u32 },
}

/// Version derived from the commit history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryVersion {
    pub version: VersionInformation,
    pub origin: VersionOrigin,
    /// Tag version text, kept when HEAD is released so it is reported untouched
    verbatim: Option<String>,
}

impl HistoryVersion {
    pub fn is_untagged(&self) -> bool {
        matches!(self.origin, VersionOrigin::Untagged { .. })
    }
}

impl fmt::Display for HistoryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.verbatim {
            Some(verbatim) => f.write_str(verbatim),
            None => write!(f, "{}", self.version),
        }
    }
}

/// Walks history from HEAD to the nearest release tag.
pub struct HistoryScanner<'a> {
    settings: &'a DynamicVersionSettings,
    release: TagPattern,
    excluded: Option<&'a TagPattern>,
}

impl<'a> HistoryScanner<'a> {
    pub fn new(settings: &'a DynamicVersionSettings) -> Result<Self> {
        Ok(HistoryScanner {
            settings,
            release: TagPattern::release()?,
            excluded: None,
        })
    }

    /// Ignore tags matching `pattern` even when they look like releases
    pub fn excluding(mut self, pattern: &'a TagPattern) -> Self {
        self.excluded = Some(pattern);
        self
    }

    /// Release tags grouped by the commit they point at
    fn release_tags(&self, tags: &[TagRef]) -> HashMap<Oid, Vec<TagMatch>> {
        let mut by_commit: HashMap<Oid, Vec<TagMatch>> = HashMap::new();
        for tag in tags {
            if self.excluded.map_or(false, |pattern| pattern.matches(tag)) {
                continue;
            }
            if let Some(matched) = self.release.match_tag(tag) {
                by_commit.entry(matched.target).or_default().push(matched);
            }
        }
        by_commit
    }

    pub fn scan<R: Repository + ?Sized>(&self, repo: &R) -> Result<HistoryVersion> {
        let head = repo.head()?.ok_or(NisseError::NoCommits)?;
        let by_commit = self.release_tags(&repo.tags()?);

        let mut distance: u32 = 0;
        for oid in repo.history(head)? {
            let oid = oid?;
            let best = by_commit
                .get(&oid)
                .and_then(|matches| highest(matches.iter().cloned()));

            if let Some(best) = best {
                return Ok(if distance == 0 {
                    debug!("HEAD {} is released as {}", oid, best.tag_name);
                    HistoryVersion {
                        version: best.version.to_version_information(),
                        origin: VersionOrigin::Released {
                            tag: best.tag_name,
                        },
                        verbatim: Some(best.version.to_string()),
                    }
                } else {
                    debug!(
                        "Nearest release tag {} is {} commits behind HEAD",
                        best.tag_name, distance
                    );
                    self.bump(best, distance)?
                });
            }

            debug!("commit #{} {} carries no release tag", distance, oid);
            distance += 1;
        }

        let mut version =
            VersionInformation::parse(&format!("{}-{}", self.settings.default_version, distance))?;
        if self.settings.append_snapshot {
            version.mark_snapshot();
        }
        debug!("No release tag in {} commits, using {}", distance, version);

        Ok(HistoryVersion {
            version,
            origin: VersionOrigin::Untagged { commits: distance },
            verbatim: None,
        })
    }

    fn bump(&self, tag: TagMatch, distance: u32) -> Result<HistoryVersion> {
        let mut version = tag.version.to_version_information();
        let patch = version.patch.checked_add(1).ok_or_else(|| {
            NisseError::version(format!("patch of tag {} cannot be incremented", tag.tag_name))
        })?;
        version.set_patch(patch);
        version.qualifier = None;
        if self.settings.append_build_number {
            version.set_build_number(distance);
        }
        if self.settings.append_snapshot {
            version.mark_snapshot();
        }

        Ok(HistoryVersion {
            version,
            origin: VersionOrigin::Ancestor {
                tag: tag.tag_name,
                distance,
            },
            verbatim: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;

    fn scan(repo: &MockRepository, settings: &DynamicVersionSettings) -> HistoryVersion {
        HistoryScanner::new(settings).unwrap().scan(repo).unwrap()
    }

    #[test]
    fn test_bump_of_max_patch_is_an_error() {
        let mut repo = MockRepository::with_commits(2);
        repo.tag_behind_head("v1.0.4294967295", 1);

        let result = HistoryScanner::new(&DynamicVersionSettings::default())
            .unwrap()
            .scan(&repo);
        assert!(matches!(result, Err(NisseError::InvalidVersionSpec(_))));
    }

    #[test]
    fn test_max_patch_on_head_is_reported() {
        let mut repo = MockRepository::with_commits(1);
        repo.tag_behind_head("v1.0.4294967295", 0);

        let version = scan(&repo, &DynamicVersionSettings::default());
        assert_eq!(version.to_string(), "1.0.4294967295");
    }

    #[test]
    fn test_ancestor_tag_is_bumped() {
        let mut repo = MockRepository::with_commits(5);
        repo.tag_behind_head("v1.0.0", 3);

        let version = scan(&repo, &DynamicVersionSettings::default());
        assert_eq!(version.to_string(), "1.0.1.3-SNAPSHOT");
        assert_eq!(
            version.origin,
            VersionOrigin::Ancestor {
                tag: "v1.0.0".to_string(),
                distance: 3
            }
        );
    }

    #[test]
    fn test_released_head_is_verbatim() {
        let mut repo = MockRepository::with_commits(3);
        repo.tag_behind_head("1.0.0", 2);
        repo.tag_behind_head("2.0.0", 0);

        let version = scan(&repo, &DynamicVersionSettings::default());
        assert_eq!(version.to_string(), "2.0.0");
        assert!(matches!(version.origin, VersionOrigin::Released { .. }));
    }

    #[test]
    fn test_released_head_keeps_suffix() {
        let mut repo = MockRepository::with_commits(1);
        repo.tag_behind_head("v3.0.0.Final", 0);

        let version = scan(&repo, &DynamicVersionSettings::default());
        assert_eq!(version.to_string(), "3.0.0.Final");
    }

    #[test]
    fn test_untagged_history_uses_default_base() {
        let repo = MockRepository::with_commits(5);
        let version = scan(&repo, &DynamicVersionSettings::default());
        assert_eq!(version.to_string(), "0.0.1-5-SNAPSHOT");
        assert!(version.is_untagged());
    }

    #[test]
    fn test_untagged_history_custom_base_without_snapshot() {
        let repo = MockRepository::with_commits(2);
        let settings = DynamicVersionSettings {
            default_version: "0.1.0".to_string(),
            append_snapshot: false,
            ..DynamicVersionSettings::default()
        };
        assert_eq!(scan(&repo, &settings).to_string(), "0.1.0-2");
    }

    #[test]
    fn test_flags_disable_build_number_and_snapshot() {
        let mut repo = MockRepository::with_commits(4);
        repo.tag_behind_head("v1.2.3", 2);

        let no_build = DynamicVersionSettings {
            append_build_number: false,
            ..DynamicVersionSettings::default()
        };
        assert_eq!(scan(&repo, &no_build).to_string(), "1.2.4-SNAPSHOT");

        let bare = DynamicVersionSettings {
            append_build_number: false,
            append_snapshot: false,
            ..DynamicVersionSettings::default()
        };
        assert_eq!(scan(&repo, &bare).to_string(), "1.2.4");
    }

    #[test]
    fn test_highest_tag_on_same_commit_wins() {
        let mut repo = MockRepository::with_commits(2);
        repo.tag_behind_head("v1.9.0", 1);
        repo.tag_behind_head("v1.10.0", 1);
        repo.tag_behind_head("v1.2.0", 1);

        assert_eq!(
            scan(&repo, &DynamicVersionSettings::default()).to_string(),
            "1.10.1.1-SNAPSHOT"
        );
    }

    #[test]
    fn test_nearest_tag_wins_over_higher_older_tag() {
        let mut repo = MockRepository::with_commits(6);
        repo.tag_behind_head("v5.0.0", 5);
        repo.tag_behind_head("v1.0.0", 2);

        assert_eq!(
            scan(&repo, &DynamicVersionSettings::default()).to_string(),
            "1.0.1.2-SNAPSHOT"
        );
    }

    #[test]
    fn test_ancestor_qualifier_is_replaced() {
        let mut repo = MockRepository::with_commits(2);
        repo.tag_behind_head("v1.0.0-rc1", 1);

        assert_eq!(
            scan(&repo, &DynamicVersionSettings::default()).to_string(),
            "1.0.1.1-SNAPSHOT"
        );
    }

    #[test]
    fn test_non_version_tags_are_ignored() {
        let mut repo = MockRepository::with_commits(3);
        repo.tag_behind_head("latest", 0);
        repo.tag_behind_head("release-1.0.0", 1);

        assert_eq!(
            scan(&repo, &DynamicVersionSettings::default()).to_string(),
            "0.0.1-3-SNAPSHOT"
        );
    }

    #[test]
    fn test_excluded_tags_are_skipped() {
        let mut repo = MockRepository::with_commits(3);
        repo.tag_behind_head("1.5.0-SNAPSHOT", 0);
        repo.tag_behind_head("v1.4.0", 2);

        let settings = DynamicVersionSettings::default();
        let hint = TagPattern::from_template("${version}-SNAPSHOT").unwrap();
        let version = HistoryScanner::new(&settings)
            .unwrap()
            .excluding(&hint)
            .scan(&repo)
            .unwrap();
        assert_eq!(version.to_string(), "1.4.1.2-SNAPSHOT");
    }

    #[test]
    fn test_empty_repository_fails() {
        let repo = MockRepository::new();
        let settings = DynamicVersionSettings::default();
        let result = HistoryScanner::new(&settings).unwrap().scan(&repo);
        assert!(matches!(result, Err(NisseError::NoCommits)));
    }

    #[test]
    fn test_invalid_default_base_fails() {
        let repo = MockRepository::with_commits(1);
        let settings = DynamicVersionSettings {
            default_version: "not-a-version".to_string(),
            ..DynamicVersionSettings::default()
        };
        let result = HistoryScanner::new(&settings).unwrap().scan(&repo);
        assert!(matches!(result, Err(NisseError::InvalidVersionSpec(_))));
    }
}
