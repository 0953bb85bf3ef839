// Shared fixtures for tests that need a real git repository.
#![allow(dead_code)]

use git2::{Commit, Oid, Repository, Signature, Time};
use tempfile::TempDir;

pub struct TestRepo {
    pub dir: TempDir,
    pub repo: Repository,
    clock: i64,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        {
            let mut config = repo.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }
        TestRepo {
            dir,
            repo,
            clock: 1_700_000_000,
        }
    }

    fn signature(&mut self) -> Signature<'static> {
        self.clock += 60;
        Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0))
            .expect("Could not create signature")
    }

    fn empty_tree(&self) -> git2::Tree<'_> {
        let tree_id = self
            .repo
            .index()
            .expect("Could not get index")
            .write_tree()
            .expect("Could not write tree");
        self.repo.find_tree(tree_id).expect("Could not find tree")
    }

    /// Commit on top of HEAD and move HEAD
    pub fn commit(&mut self, message: &str) -> Oid {
        let parent = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.target());
        match parent {
            Some(parent) => self.commit_with_parents(Some("HEAD"), message, &[parent]),
            None => self.commit_with_parents(Some("HEAD"), message, &[]),
        }
    }

    pub fn commits(&mut self, count: usize) -> Oid {
        let mut last = None;
        for i in 0..count {
            last = Some(self.commit(&format!("commit {}", i + 1)));
        }
        last.expect("At least one commit")
    }

    /// Commit with explicit parents; `update_ref` None leaves HEAD alone
    pub fn commit_with_parents(
        &mut self,
        update_ref: Option<&str>,
        message: &str,
        parents: &[Oid],
    ) -> Oid {
        let signature = self.signature();
        let tree = self.empty_tree();
        let parents: Vec<Commit<'_>> = parents
            .iter()
            .map(|oid| self.repo.find_commit(*oid).expect("Could not find parent"))
            .collect();
        let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();
        self.repo
            .commit(update_ref, &signature, &signature, message, &tree, &parent_refs)
            .expect("Could not commit")
    }

    pub fn lightweight_tag(&self, name: &str, target: Oid) {
        let object = self
            .repo
            .find_object(target, None)
            .expect("Could not find object");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    pub fn annotated_tag(&mut self, name: &str, target: Oid) {
        let signature = self.signature();
        let object = self
            .repo
            .find_object(target, None)
            .expect("Could not find object");
        self.repo
            .tag(name, &object, &signature, &format!("Release {}", name), false)
            .expect("Could not create annotated tag");
    }
}
