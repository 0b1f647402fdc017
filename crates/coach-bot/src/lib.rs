//! Wiring for the fitness coach binary.
//!
//! The `coach_bot` binary reads [`CoachConfig`] from the environment,
//! opens and migrates the store, builds an OpenAI-compatible model client,
//! starts the weekly reminder task, and serves `@user_id text` lines from
//! standard input.

mod config;

pub use config::{CoachConfig, DEFAULT_SQLITE_PATH};
