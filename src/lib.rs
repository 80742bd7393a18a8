//! Thank You Stars - star the GitHub repositories behind a PyPI package
//!
//! Walks a package's dependency tree through `pip show`, attributes each
//! package to a GitHub repository using PyPI metadata and GitHub search,
//! and stars the repositories the user has not starred yet.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod package;
pub mod registry;
pub mod resolve;
pub mod starred;
pub mod ui;
pub mod walk;

#[cfg(test)]
mod test_support;

pub use error::{StarsError, StarsResult};
