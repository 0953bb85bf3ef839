//! Dynamic version resolution from git history and tags.
//!
//! The resolved version is, in order of precedence:
//! 1. the literal `nisse.source.jgit.useVersion`, without touching git;
//! 2. a version hint tag, when [VersionHintResolver::arbitrate] picks it;
//! 3. the version derived by [HistoryScanner] from the nearest release tag.

pub mod hint;
pub mod scanner;

pub use hint::VersionHintResolver;
pub use scanner::{HistoryScanner, HistoryVersion, VersionOrigin};

use crate::config::DynamicVersionSettings;
use crate::error::Result;
use crate::git::Repository;
use tracing::debug;

/// Resolve the dynamic version of the checkout behind `repo`
pub fn resolve_dynamic_version<R: Repository + ?Sized>(
    repo: &R,
    settings: &DynamicVersionSettings,
) -> Result<String> {
    if let Some(version) = &settings.use_version {
        debug!("Using configured version {}", version);
        return Ok(version.clone());
    }

    let hints = VersionHintResolver::new(settings)?;
    let history = HistoryScanner::new(settings)?
        .excluding(hints.pattern())
        .scan(repo)?;
    let tags = repo.tags()?;
    let candidate = hints.candidate(&tags);

    let version = hints.arbitrate(&history, candidate.as_ref(), settings);
    debug!("Dynamic version resolved to {}", version);
    Ok(version)
}
