use crate::domain::TagRef;
use crate::error::{NisseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;

/// Mock repository with a linear history, for testing without actual git operations
pub struct MockRepository {
    /// Oldest first; the last entry is HEAD
    commits: Vec<CommitInfo>,
    tags: Vec<TagRef>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Create a repository with `count` commits and no tags
    pub fn with_commits(count: usize) -> Self {
        let mut repo = MockRepository::new();
        for i in 0..count {
            repo.commit(format!("commit {}", i));
        }
        repo
    }

    /// Add a commit on top of HEAD and return its id
    pub fn commit(&mut self, summary: impl Into<String>) -> Oid {
        let index = self.commits.len() + 1;
        let mut bytes = [0u8; 20];
        bytes[..8].copy_from_slice(&(index as u64).to_be_bytes());
        let id = Oid::from_bytes(&bytes).unwrap_or_else(|_| Oid::zero());

        self.commits.push(CommitInfo {
            id,
            time: 1_700_000_000 + index as i64 * 60,
            author_offset_minutes: 0,
            author: "Mock Author <author@example.com>".to_string(),
            committer: "Mock Committer <committer@example.com>".to_string(),
            summary: summary.into(),
        });
        id
    }

    /// Add a tag pointing to a commit
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.push(TagRef::new(name, oid));
    }

    /// Tag the commit `distance` commits behind HEAD
    pub fn tag_behind_head(&mut self, name: impl Into<String>, distance: usize) {
        let index = self.commits.len() - 1 - distance;
        let oid = self.commits[index].id;
        self.add_tag(name, oid);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head(&self) -> Result<Option<Oid>> {
        Ok(self.commits.last().map(|c| c.id))
    }

    fn history(&self, from: Oid) -> Result<Box<dyn Iterator<Item = Result<Oid>> + '_>> {
        let position = self
            .commits
            .iter()
            .position(|c| c.id == from)
            .ok_or_else(|| git2::Error::from_str(&format!("unknown commit {}", from)))?;

        Ok(Box::new(
            self.commits[..=position].iter().rev().map(|c| Ok::<Oid, NisseError>(c.id)),
        ))
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        self.commits
            .iter()
            .find(|c| c.id == oid)
            .cloned()
            .ok_or_else(|| NisseError::Git(git2::Error::from_str("commit not found")))
    }
}
