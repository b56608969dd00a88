//! gitana — mentor feedback for GitHub repositories.
//!
//! Fetches a repository's raw facts from the GitHub API, reduces them to a
//! fixed set of deterministic signals, and asks a language model for a
//! score, a summary, a roadmap and a maturity assessment. Completed
//! analyses can be kept per user.
//!
//! This library crate exposes all modules for integration testing.

pub mod config;
pub mod constants;
pub mod env;
pub mod gateway;
pub mod history;
pub mod insight;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod providers;
pub mod server;
pub mod signals;
