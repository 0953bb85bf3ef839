//! Git access abstraction layer
//!
//! This module provides a trait-based abstraction over the few read-only Git
//! operations the version resolver and the git property source need, so the
//! resolver can run against a real repository or an in-memory mock.
//!
//! # Overview
//!
//! - [repository::Git2Repository]: real implementation using the `git2` crate
//! - [mock::MockRepository]: in-memory implementation for tests
//!
//! ```rust
//! # use nisse::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> nisse::Result<()> {
//! if let Some(head) = repo.head()? {
//!     for oid in repo.history(head)? {
//!         println!("{}", oid?);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::TagRef;
use crate::error::Result;
use git2::Oid;

/// Commit metadata published by the git property source
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit id
    pub id: Oid,
    /// Commit time, seconds since the epoch
    pub time: i64,
    /// UTC offset of the author's time zone, in minutes
    pub author_offset_minutes: i32,
    /// `Name <email>` of the author
    pub author: String,
    /// `Name <email>` of the committer
    pub committer: String,
    /// First line of the commit message
    pub summary: String,
}

/// Read-only git operations used to derive build metadata.
///
/// ## Tags
///
/// [Repository::tags] returns every tag already dereferenced to the commit it
/// ultimately points at. Annotated tags are peeled through the tag object,
/// lightweight tags point at the commit directly. Tags that do not resolve to
/// a commit are left out.
pub trait Repository {
    /// The commit HEAD points at, or `None` when the repository has no commits
    fn head(&self) -> Result<Option<Oid>>;

    /// First-parent history starting at `from`, newest first.
    ///
    /// The first item is always `from` itself.
    fn history(&self, from: Oid) -> Result<Box<dyn Iterator<Item = Result<Oid>> + '_>>;

    /// All tags in the repository, peeled to their commits
    fn tags(&self) -> Result<Vec<TagRef>>;

    /// Metadata of a single commit
    fn commit_info(&self, oid: Oid) -> Result<CommitInfo>;
}
