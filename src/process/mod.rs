// src/process/mod.rs
// =============================================================================
// This module ties the line logic to the filesystem.
//
// Submodules:
// - file: Rewrites one file, downloading the assets it references
// - walk: Finds the files of a project and runs `file` on each of them
// =============================================================================

mod file;
mod walk;

pub use walk::{localize_tree, scan_tree, RunSummary, ScanReport};
