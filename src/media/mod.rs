/// Local image plumbing
///
/// This module handles:
/// - Turning user-selected files into transport payloads (ingest.rs)
/// - Resolving and saving generated images (download.rs)

pub mod download;
pub mod ingest;

pub use ingest::{ingest_file, IngestedImage};
