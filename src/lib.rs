//! declutter - sort the files of a directory into category folders
//!
//! This library classifies files by extension, skips byte-identical
//! duplicates, moves files into per-category folders without ever overwriting,
//! parks category folders that stayed empty in a cleanup folder, and records
//! every action and error in append-only log files.

pub mod activity_log;
pub mod cli;
pub mod config;
pub mod content_hash;
pub mod duplicates;
pub mod file_category;
pub mod file_organizer;
pub mod organizer;
pub mod output;

pub use activity_log::ActivityLog;
pub use config::{ConfigError, EntryFilter, OrganizerConfig};
pub use content_hash::{ContentHash, hash_file};
pub use duplicates::{DuplicateCheck, DuplicateRegistry};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{FileOrganizer, OrganizeError, OrganizeResult, Relocation};
pub use organizer::{FileOutcome, Organizer, RunReport};

pub use cli::{RunOptions, run_organizer};
