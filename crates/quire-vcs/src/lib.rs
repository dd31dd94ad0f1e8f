//! Git access for Quire.
//!
//! The publisher talks to version control only through the [`GitClient`]
//! trait. [`CliGitClient`] implements it by running the `git` binary;
//! `MockGitClient` (behind the `mock` feature) records calls in memory for
//! tests.

mod cli;
mod client;
mod error;
#[cfg(feature = "mock")]
mod mock;

pub use cli::{CliGitClient, authenticated_url};
pub use client::{CommitIdentity, GitAuth, GitClient};
pub use error::GitError;
#[cfg(feature = "mock")]
pub use mock::{GitCall, GitOperation, MockGitClient};
