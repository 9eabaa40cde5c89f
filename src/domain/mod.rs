//! Core domain models for depaudit
//!
//! This module contains the fundamental types used throughout the application:
//! - Manifest kinds for the supported formats
//! - Dependency entries produced by manifest loaders
//! - Normalized versions and their comparison
//! - Repository references and per-dependency reports
//! - Summary and result structures

mod dependency;
mod manifest_kind;
mod repo;
mod report;
mod summary;
mod version;

pub use dependency::DependencyEntry;
pub use manifest_kind::ManifestKind;
pub use repo::{RepoRef, DEFAULT_HOST};
pub use report::{AuditStatus, DependencyReport, ABSENT};
pub use summary::{AuditSummary, ManifestAudit, ProjectInfo};
pub use version::{greatest_tag, NormalizedVersion, VersionOrdering, CANONICAL_PREFIX};
