use crate::domain::TagRef;
use crate::error::{NisseError, Result};
use crate::git::CommitInfo;
use git2::{ErrorCode, ObjectType, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`, searching parent directories.
    ///
    /// Returns `Ok(None)` when `path` is not inside a git checkout.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match Git2Repo::discover(path) {
            Ok(repo) => Ok(Some(Git2Repository { repo })),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }
}

fn signature_string(signature: &git2::Signature<'_>) -> String {
    format!(
        "{} <{}>",
        signature.name().unwrap_or("unknown"),
        signature.email().unwrap_or("")
    )
}

impl super::Repository for Git2Repository {
    fn head(&self) -> Result<Option<Oid>> {
        let head = match self.repo.head() {
            Ok(head) => head,
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                return Ok(None)
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Some(head.peel_to_commit()?.id()))
    }

    fn history(&self, from: Oid) -> Result<Box<dyn Iterator<Item = Result<Oid>> + '_>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.simplify_first_parent()?;
        revwalk.push(from)?;

        Ok(Box::new(revwalk.map(|oid| oid.map_err(NisseError::from))))
    }

    fn tags(&self) -> Result<Vec<TagRef>> {
        let names = self.repo.tag_names(None)?;
        let mut tags = Vec::new();

        for tag_name in names.iter().flatten() {
            let reference = self.repo.find_reference(&format!("refs/tags/{}", tag_name))?;
            // Peel annotated tags through the tag object down to the commit.
            match reference.peel(ObjectType::Commit) {
                Ok(commit) => tags.push(TagRef::new(tag_name, commit.id())),
                Err(e) => debug!("Skipping tag {} not pointing at a commit: {}", tag_name, e),
            }
        }

        Ok(tags)
    }

    fn commit_info(&self, oid: Oid) -> Result<CommitInfo> {
        let commit = self.repo.find_commit(oid)?;
        let author = commit.author();
        let committer = commit.committer();

        let info = CommitInfo {
            id: commit.id(),
            time: commit.time().seconds(),
            author_offset_minutes: author.when().offset_minutes(),
            author: signature_string(&author),
            committer: signature_string(&committer),
            summary: commit.summary().unwrap_or("").to_string(),
        };
        Ok(info)
    }
}
