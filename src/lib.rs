//! PR reviewer assignment service.
//!
//! Tracks teams, users, pull requests and reviewer assignments in SQLite,
//! and automates reviewer selection on PR creation, the OPEN → MERGED
//! lifecycle, and constrained reviewer replacement.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod validate;
