pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manager;
pub mod naming;
pub mod properties;
pub mod resolver;
pub mod source;
pub mod ui;

pub use error::{NisseError, Result};
