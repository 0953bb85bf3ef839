//! Domain logic - version values and tag matching, independent of git access

pub mod tag;
pub mod version;

pub use tag::{highest, TagMatch, TagPattern, TagRef, TagVersion, VERSION_PLACEHOLDER};
pub use version::{VersionInformation, SNAPSHOT};
