//! Persisted result store: predictions table, run metadata, top-models document

mod writer;

pub use writer::{ResultStoreWriter, RunMetadata, StorePaths};
