//! depaudit - Dependency audit library
//!
//! This library reconciles declared dependency versions against their
//! upstream releases:
//! - Erlang (rebar.config, git-tag dependencies, via GitHub)
//! - Node.js (package.json, via the npm registry and GitHub)
//! - Plain repository lists (`owner/repo version`, via GitHub)

pub mod audit;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod registry;
