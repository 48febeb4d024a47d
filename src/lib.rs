//! # Maritime Query
//!
//! Rule-based question answering over a table of maritime vessel records.
//!
//! Free text is normalized, matched against an ordered list of keyword
//! triggers, reduced to a typed filter and answered from a SQLite record
//! store with a canned English reply. Results can be exported as CSV.
//! This is literal keyword matching, not language understanding.

pub mod cli;
pub mod config;
pub mod export;
pub mod loader;
pub mod query;
pub mod server;
pub mod storage;
pub mod vessel;

pub use config::AppConfig;
pub use query::{IntentRouter, QueryReply, VesselFilter};
pub use storage::{SqliteVesselStore, StoreError, VesselStore};
pub use vessel::{Position, VesselRecord};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
