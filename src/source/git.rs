use crate::config::NisseConfiguration;
use crate::error::{NisseError, Result};
use crate::git::{CommitInfo, Git2Repository, Repository};
use crate::resolver::resolve_dynamic_version;
use crate::source::PropertySource;
use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeMap;
use tracing::debug;

pub const COMMIT: &str = "commit";
pub const DATE: &str = "date";
pub const AUTHOR: &str = "author";
pub const COMMITTER: &str = "committer";
pub const DYNAMIC_VERSION: &str = "dynamicVersion";

/// `git log` style date, e.g. `Tue Mar 05 14:02:11 2024 +0100`
const DATE_FORMAT: &str = "%a %b %d %H:%M:%S %Y %z";

/// Publishes HEAD commit metadata and, when enabled, the dynamic version.
///
/// The repository is discovered upward from the current working directory.
/// Outside a git checkout the source publishes nothing.
pub struct GitPropertySource;

impl GitPropertySource {
    pub const NAME: &'static str = "jgit";

    /// Properties of an already opened repository
    pub fn properties_of<R: Repository + ?Sized>(
        &self,
        repo: &R,
        configuration: &NisseConfiguration,
    ) -> Result<BTreeMap<String, String>> {
        let mut result = BTreeMap::new();

        let head = repo.head()?.ok_or(NisseError::NoCommits)?;
        let info = repo.commit_info(head)?;
        debug!("HEAD is {} {}", info.id, info.summary);

        result.insert(COMMIT.to_string(), info.id.to_string());
        result.insert(DATE.to_string(), format_commit_date(&info));
        result.insert(AUTHOR.to_string(), info.author.clone());
        result.insert(COMMITTER.to_string(), info.committer.clone());

        let settings = configuration.dynamic_version_settings();
        if settings.enabled {
            result.insert(
                DYNAMIC_VERSION.to_string(),
                resolve_dynamic_version(repo, &settings)?,
            );
        }

        Ok(result)
    }
}

impl PropertySource for GitPropertySource {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn properties(&self, configuration: &NisseConfiguration) -> Result<BTreeMap<String, String>> {
        // Scoped: the repository is released when this function returns.
        match Git2Repository::discover(configuration.current_working_directory())? {
            Some(repo) => self.properties_of(&repo, configuration),
            None => {
                debug!(
                    "{} is not inside a git checkout",
                    configuration.current_working_directory().display()
                );
                Ok(BTreeMap::new())
            }
        }
    }
}

/// Render the commit time in the author's time zone
pub fn format_commit_date(info: &CommitInfo) -> String {
    let utc: DateTime<Utc> = match DateTime::from_timestamp(info.time, 0) {
        Some(utc) => utc,
        None => return info.time.to_string(),
    };
    match FixedOffset::east_opt(info.author_offset_minutes * 60) {
        Some(offset) => utc.with_timezone(&offset).format(DATE_FORMAT).to_string(),
        None => utc.format(DATE_FORMAT).to_string(),
    }
}
