//! Locally installed package metadata
//!
//! `pip show` output is the only source of truth for the dependency graph:
//! the walk covers what is installed, not what the registry declares.

pub mod metadata;
pub mod show;
pub mod target;

pub use metadata::{MetadataReader, PackageMetadata};
pub use show::{PackageShow, PipShow};
pub use target::resolve_target;
