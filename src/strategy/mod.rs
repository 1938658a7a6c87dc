//! Processing Strategy Module
//!
//! Single documents are imported in place on the caller's thread. Batches
//! and corpus-wide discovery fan out over rayon (`parallel`).

pub mod parallel;

pub use parallel::{discover_corpus, import_batch};
