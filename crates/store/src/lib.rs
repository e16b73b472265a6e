//! Local store shared with the Keymapp desktop application.
//!
//! The schema here is not ours: it mirrors what the desktop application
//! creates for itself, table for table and column for column, so that the
//! application finds a populated database on its next start without ever
//! having reached the network.
//!
//! # Tables
//! - **config**: key/value settings. Seeded with [`DEFAULT_CONFIG`], never
//!   updated by us afterwards.
//! - **metadata**: a single opaque document, written once.
//! - **revision**: layout revision data keyed on the revision identifier.
//! - **heatmap**, **smart_layer**, **auth**: created if missing, otherwise
//!   left to the desktop application.

mod db;
pub mod error;
mod models;
mod repo;

pub use crate::db::Database;
pub use crate::models::{ConfigEntry, DEFAULT_CONFIG, RevisionWrite};
pub use crate::repo::Repository;
